use serde::Deserialize;

/// Broker settings shared by every binary that touches the work queue.
#[derive(Debug, Deserialize, Clone)]
pub struct MqConfig {
    /// Broker connection URL. Default: "redis://localhost:6379".
    #[serde(default = "default_mq_url")]
    pub url: String,
    /// Connection pool size. Default: 5.
    #[serde(default = "default_mq_pool_size")]
    pub pool_size: u8,
    /// Queue the outbox publisher fills and the sender worker drains.
    /// Default: "sms.send".
    #[serde(default = "default_queue_name")]
    pub queue_name: String,
}

fn default_mq_url() -> String {
    "redis://localhost:6379".into()
}
fn default_mq_pool_size() -> u8 {
    5
}
fn default_queue_name() -> String {
    "sms.send".into()
}

impl Default for MqConfig {
    fn default() -> Self {
        Self {
            url: default_mq_url(),
            pool_size: default_mq_pool_size(),
            queue_name: default_queue_name(),
        }
    }
}
