use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::risk_limits::RiskLimits;
use crate::core::trade_management::TradeManagementParams;

pub type SharedConfig = Arc<RwLock<Config>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Exchange
    pub exchange: String,
    pub symbol: String,

    // Intel snapshot label ("sim" or "live")
    pub mode: String,

    // Sim loop
    pub tick_interval_ms: u64,

    // Volatility tracking
    pub vol_window: usize,

    // Guardrail policy
    pub tm: TradeManagementParams,

    // Account guardrails
    pub risk: RiskLimits,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };
        let env_f64 = |key: &str, default: f64| -> f64 {
            std::env::var(key)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default)
        };

        let defaults = TradeManagementParams::default();
        let tm = TradeManagementParams {
            tp1_r: env_f64("TP1_R", defaults.tp1_r),
            tp1_close_pct: env_f64("TP1_CLOSE_PCT", defaults.tp1_close_pct),
            be_trigger_r: env_f64("BE_TRIGGER_R", defaults.be_trigger_r),
            fee_buffer_r: env_f64("FEE_BUFFER_R", defaults.fee_buffer_r),
            be_plus_trigger_r: env_f64("BE_PLUS_TRIGGER_R", defaults.be_plus_trigger_r),
            be_plus_lock_r: env_f64("BE_PLUS_LOCK_R", defaults.be_plus_lock_r),
            runner_trail_buffer_r: env_f64("RUNNER_TRAIL_BUFFER_R", defaults.runner_trail_buffer_r),
        };

        let risk_defaults = RiskLimits::default();
        let risk = RiskLimits {
            max_risk_per_trade_pct: env_f64(
                "MAX_RISK_PER_TRADE_PCT",
                risk_defaults.max_risk_per_trade_pct,
            ),
            daily_loss_limit_pct: env_f64(
                "DAILY_LOSS_LIMIT_PCT",
                risk_defaults.daily_loss_limit_pct,
            ),
            max_concurrent_trades: env("MAX_CONCURRENT_TRADES", "2")
                .parse()
                .unwrap_or(risk_defaults.max_concurrent_trades),
        };

        Config {
            exchange: env("EXCHANGE", "paper"),
            symbol: env("SYMBOL", "BTC-USD"),
            mode: env("MODE", "sim"),
            tick_interval_ms: env("TICK_INTERVAL_MS", "250")
                .parse()
                .unwrap_or(250),
            vol_window: env("VOL_WINDOW", "14").parse().unwrap_or(14),
            tm,
            risk,
            log_level: env("LOG_LEVEL", "INFO"),
        }
    }

    pub fn shared(self) -> SharedConfig {
        Arc::new(RwLock::new(self))
    }
}
