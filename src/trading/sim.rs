use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Direction, SwingPoint, Trade};

/// One simulated tick: a mark price, optionally a confirmed swing point for
/// the runner trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkStep {
    pub price: f64,
    pub swing: Option<SwingPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub trade: Trade,
    pub marks: Vec<MarkStep>,
}

/// Signed unrealized profit in R at a mark price; 0 when the risk unit is
/// degenerate.
pub fn profit_r(trade: &Trade, mark: f64) -> f64 {
    let r = trade.risk_unit();
    if !r.is_finite() || r <= 0.0 {
        return 0.0;
    }
    match trade.side {
        Direction::Long => (mark - trade.entry) / r,
        Direction::Short => (trade.entry - mark) / r,
    }
}

fn base_time() -> DateTime<Utc> {
    // Fixed origin keeps scenario runs reproducible
    DateTime::parse_from_rfc3339("2024-06-03T12:00:00Z")
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn step(price: f64) -> MarkStep {
    MarkStep { price, swing: None }
}

fn step_with_swing(price: f64, swing_price: f64) -> MarkStep {
    MarkStep {
        price,
        swing: Some(SwingPoint {
            price: swing_price,
            timestamp: base_time(),
        }),
    }
}

/// Deterministic scenarios for the sim runner: a slow grind that walks the
/// whole guardrail ladder, and a short that mirrors it.
pub fn build_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "long ladder".to_string(),
            trade: Trade {
                id: "t1".to_string(),
                symbol: "EUR-USDT".to_string(),
                side: Direction::Long,
                entry: 100.0,
                initial_stop: 98.0,
                current_stop: Some(98.0),
                size: 1.0,
            },
            marks: vec![
                step(100.0),
                step(100.5),
                step(101.0),
                step(101.5),
                step(102.0),
                step_with_swing(103.2, 102.6),
                step_with_swing(104.0, 103.4),
            ],
        },
        Scenario {
            name: "short ladder".to_string(),
            trade: Trade {
                id: "t2".to_string(),
                symbol: "BTC-USD".to_string(),
                side: Direction::Short,
                entry: 50_000.0,
                initial_stop: 50_500.0,
                current_stop: Some(50_500.0),
                size: 0.4,
            },
            marks: vec![
                step(50_000.0),
                step(49_600.0),
                step(49_250.0),
                step_with_swing(48_900.0, 49_150.0),
            ],
        },
    ]
}
