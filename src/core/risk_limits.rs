use serde::{Deserialize, Serialize};

/// Account-level guardrails checked before a new position may open.
/// Percentages are whole percent, not fractions (0.5 = 0.5%).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskLimits {
    pub max_risk_per_trade_pct: f64,
    pub daily_loss_limit_pct: f64,
    pub max_concurrent_trades: usize,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_risk_per_trade_pct: 0.5,
            daily_loss_limit_pct: 1.5,
            max_concurrent_trades: 2,
        }
    }
}

impl RiskLimits {
    /// A new trade is allowed while the book has a free slot and the day's
    /// realized loss has not reached the limit. `daily_loss_pct` is positive
    /// for a losing day.
    pub fn allows_new_trade(&self, open_trades: usize, daily_loss_pct: f64) -> bool {
        if open_trades >= self.max_concurrent_trades {
            return false;
        }
        daily_loss_pct < self.daily_loss_limit_pct
    }

    /// Whether a single trade's risk stays within the per-trade cap.
    pub fn within_per_trade_risk(&self, risk_pct: f64) -> bool {
        risk_pct <= self.max_risk_per_trade_pct
    }
}
