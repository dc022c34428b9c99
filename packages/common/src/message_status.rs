#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a single recipient message.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Committed to the outbox, not yet offered to the broker.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "pending"))]
    Pending,
    /// Accepted by the broker.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "queued"))]
    Queued,
    /// Accepted by the SMS gateway; awaiting a delivery receipt.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "sent"))]
    Sent,
    /// Gateway confirmed delivery to the recipient.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "delivered"))]
    Delivered,
    /// Gateway rejected the message or reported a delivery failure.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "failed"))]
    Failed,
}

impl MessageStatus {
    /// Returns true if no further transition is ever valid from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Failed)
    }

    /// Whether the status graph contains the edge `self -> next`.
    ///
    /// `Queued -> Pending` is the compensating edge used when a broker
    /// publish fails after the queued transition was already persisted.
    /// `Queued -> Failed` covers a hard gateway rejection.
    pub fn can_transition_to(&self, next: MessageStatus) -> bool {
        use MessageStatus::*;
        matches!(
            (*self, next),
            (Pending, Queued)
                | (Queued, Sent)
                | (Queued, Failed)
                | (Queued, Pending)
                | (Sent, Delivered)
                | (Sent, Failed)
        )
    }

    /// All possible status values.
    pub const ALL: &'static [MessageStatus] = &[
        Self::Pending,
        Self::Queued,
        Self::Sent,
        Self::Delivered,
        Self::Failed,
    ];

    /// The two terminal statuses.
    pub const TERMINAL: &'static [MessageStatus] = &[Self::Delivered, Self::Failed];

    /// Returns the string representation (lowercase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Queued => "queued",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for MessageStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    invalid: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid status '{}'. Valid values: {}",
            self.invalid,
            MessageStatus::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for MessageStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "queued" => Ok(Self::Queued),
            "sent" => Ok(Self::Sent),
            "delivered" => Ok(Self::Delivered),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_roundtrip() {
        for status in MessageStatus::ALL {
            let json = serde_json::to_string(status).unwrap();
            let parsed: MessageStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(*status, parsed);
        }
        assert_eq!(
            serde_json::to_string(&MessageStatus::Delivered).unwrap(),
            "\"delivered\""
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "queued".parse::<MessageStatus>().unwrap(),
            MessageStatus::Queued
        );
        assert!("Queued".parse::<MessageStatus>().is_err());
        assert!("invalid".parse::<MessageStatus>().is_err());
    }

    #[test]
    fn test_forward_edges() {
        use MessageStatus::*;
        assert!(Pending.can_transition_to(Queued));
        assert!(Queued.can_transition_to(Sent));
        assert!(Queued.can_transition_to(Failed));
        assert!(Sent.can_transition_to(Delivered));
        assert!(Sent.can_transition_to(Failed));
    }

    #[test]
    fn test_compensating_edge() {
        assert!(MessageStatus::Queued.can_transition_to(MessageStatus::Pending));
        assert!(!MessageStatus::Sent.can_transition_to(MessageStatus::Pending));
    }

    #[test]
    fn test_no_exit_from_terminal() {
        for terminal in MessageStatus::TERMINAL {
            assert!(terminal.is_terminal());
            for next in MessageStatus::ALL {
                assert!(!terminal.can_transition_to(*next));
            }
        }
    }

    #[test]
    fn test_no_skipping_states() {
        use MessageStatus::*;
        assert!(!Pending.can_transition_to(Sent));
        assert!(!Pending.can_transition_to(Delivered));
        assert!(!Pending.can_transition_to(Failed));
        assert!(!Queued.can_transition_to(Delivered));
    }
}
