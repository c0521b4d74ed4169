use async_trait::async_trait;
use tracing::info;

use crate::exchange::{AdapterError, ExchangeAdapter, ReduceRequest, StopUpdateRequest};

/// Log-only adapter: accepts every request, records it in memory, places no
/// real orders.
#[derive(Debug, Default)]
pub struct PaperAdapter {
    pub reductions: Vec<ReduceRequest>,
    pub stop_updates: Vec<StopUpdateRequest>,
}

impl PaperAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExchangeAdapter for PaperAdapter {
    async fn reduce_position(&mut self, req: &ReduceRequest) -> Result<(), AdapterError> {
        info!(
            "[PAPER] reduce_position {}",
            serde_json::to_string(req).unwrap_or_default()
        );
        self.reductions.push(req.clone());
        Ok(())
    }

    async fn update_stop(&mut self, req: &StopUpdateRequest) -> Result<(), AdapterError> {
        info!(
            "[PAPER] update_stop {}",
            serde_json::to_string(req).unwrap_or_default()
        );
        self.stop_updates.push(req.clone());
        Ok(())
    }
}
