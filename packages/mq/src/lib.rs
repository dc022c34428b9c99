pub mod config;
pub mod models;
mod queue;

pub use config::MqConfig;
pub use models::{BroccoliError, BrokerMessage, handler_error};
pub use queue::SmsQueue;
