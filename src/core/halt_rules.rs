use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HaltReason {
    DailyLossLimit,
    InsufficientBalance,
    RateLimit,
    AuthError,
    ManualHalt,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::DailyLossLimit => write!(f, "daily-loss-limit"),
            HaltReason::InsufficientBalance => write!(f, "insufficient-balance"),
            HaltReason::RateLimit => write!(f, "rate-limit"),
            HaltReason::AuthError => write!(f, "auth-error"),
            HaltReason::ManualHalt => write!(f, "manual-halt"),
        }
    }
}

/// Latched halt flag. Once engaged the bot stops opening trades until an
/// operator clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HaltState {
    pub halted: bool,
    pub reason: Option<HaltReason>,
    pub ts: Option<DateTime<Utc>>,
}

impl HaltState {
    pub fn engage(reason: HaltReason) -> Self {
        Self {
            halted: true,
            reason: Some(reason),
            ts: Some(Utc::now()),
        }
    }

    pub fn clear() -> Self {
        Self::default()
    }
}
