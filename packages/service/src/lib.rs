mod error;
mod service;

pub use error::ServiceError;
pub use service::{BroadcastService, SendOutcome};
