use chrono::Duration;
use uuid::Uuid;

/// Knobs for dataset generation and paging.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Hard cap on items per page, whatever the caller asks for.
    pub max_page_size: usize,
    /// Backing sequence length = first requested page size * this factor.
    pub oversize_factor: usize,
    /// Age difference between consecutive conversation previews.
    pub preview_step: Duration,
    /// Time between consecutive generated chat messages.
    pub message_step: Duration,
    /// Makes generated datasets reproducible when set.
    pub seed: Option<u64>,
    /// Sender id stamped on outgoing messages.
    pub local_user_id: Uuid,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_page_size: 20,
            oversize_factor: 3,
            preview_step: Duration::minutes(30),
            message_step: Duration::minutes(2),
            seed: None,
            local_user_id: Uuid::new_v4(),
        }
    }
}
