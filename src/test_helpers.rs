use chrono::{DateTime, Utc};

use crate::models::{Direction, SwingPoint, Trade};

/// Trade with size 1 and no current stop beyond the initial one.
pub fn make_trade(side: Direction, entry: f64, initial_stop: f64) -> Trade {
    Trade {
        id: "t1".to_string(),
        symbol: "TEST".to_string(),
        side,
        entry,
        initial_stop,
        current_stop: Some(initial_stop),
        size: 1.0,
    }
}

pub fn make_swing(price: f64) -> SwingPoint {
    SwingPoint {
        price,
        timestamp: fixed_time(),
    }
}

pub fn fixed_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-06-03T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}
