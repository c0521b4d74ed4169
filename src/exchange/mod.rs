pub mod paper;

pub use paper::PaperAdapter;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::OrderSide;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("order rejected: {0}")]
    Rejected(String),
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReduceRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub qty: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopUpdateRequest {
    pub symbol: String,
    pub stop_price: f64,
    pub reason: String,
}

/// Order surface the executor drives. Implementations confirm a request
/// before the executor mutates local trade state.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    async fn reduce_position(&mut self, req: &ReduceRequest) -> Result<(), AdapterError>;
    async fn update_stop(&mut self, req: &StopUpdateRequest) -> Result<(), AdapterError>;
}
