pub mod dlr;
pub mod gateway;
pub mod message;
pub mod message_status;
pub mod mq;

pub use dlr::{DlrError, DlrPayload};
pub use gateway::{GatewayError, SendResult, SmsGateway};
pub use message::{Broadcast, SmsMessage};
pub use message_status::MessageStatus;
pub use mq::{Message, MessagePublisher, MqError};
