//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Agent name for identification.
    pub name: String,
    /// Path the completed-order snapshot is written to (overwritten per order).
    pub order_path: PathBuf,
    /// Upper bound on a single persistence attempt. The write must never
    /// stall the conversational turn.
    pub persist_timeout: Duration,
    /// Additional persistence attempts after the first one fails.
    pub persist_retries: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "barista-assist".to_string(),
            order_path: PathBuf::from("order.json"),
            persist_timeout: Duration::from_secs(2),
            persist_retries: 1,
        }
    }
}
