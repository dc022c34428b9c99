pub mod broadcast;
pub mod message;
