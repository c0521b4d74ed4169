use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Direction;

/// One open position. `entry` and `initial_stop` are fixed at creation and
/// define the risk unit R = |entry - initial_stop|; `current_stop` and `size`
/// are updated by the executor as guardrail actions fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub symbol: String,
    pub side: Direction,
    pub entry: f64,
    pub initial_stop: f64,
    #[serde(default)]
    pub current_stop: Option<f64>,
    pub size: f64,
}

impl Trade {
    /// Risk unit in price terms. Not guaranteed positive; callers that need
    /// a valid unit must check.
    pub fn risk_unit(&self) -> f64 {
        (self.entry - self.initial_stop).abs()
    }
}

/// Last confirmed swing low (long) / swing high (short), fed to the runner
/// trail rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwingPoint {
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}
