use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

const VOL_WINDOW_MIN: usize = 5;
const VOL_WINDOW_MAX: usize = 200;
const VOL_WINDOW_DEFAULT: usize = 14;
const PRICE_FLOOR: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    Idle,
    Running,
    Paused,
    Halted,
}

impl fmt::Display for BotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotMode::Idle => write!(f, "idle"),
            BotMode::Running => write!(f, "running"),
            BotMode::Paused => write!(f, "paused"),
            BotMode::Halted => write!(f, "halted"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeLifecycle {
    Idle,
    Armed,
    Entered,
    Managing,
    Exiting,
    Closed,
}

impl fmt::Display for TradeLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeLifecycle::Idle => write!(f, "idle"),
            TradeLifecycle::Armed => write!(f, "armed"),
            TradeLifecycle::Entered => write!(f, "entered"),
            TradeLifecycle::Managing => write!(f, "managing"),
            TradeLifecycle::Exiting => write!(f, "exiting"),
            TradeLifecycle::Closed => write!(f, "closed"),
        }
    }
}

impl TradeLifecycle {
    /// Whether a position is on the book in this phase.
    pub fn has_position(&self) -> bool {
        matches!(
            self,
            TradeLifecycle::Entered | TradeLifecycle::Managing | TradeLifecycle::Exiting
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolBand {
    Low,
    Normal,
    High,
    Extreme,
}

impl fmt::Display for VolBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolBand::Low => write!(f, "low"),
            VolBand::Normal => write!(f, "normal"),
            VolBand::High => write!(f, "high"),
            VolBand::Extreme => write!(f, "extreme"),
        }
    }
}

/// Rolling volatility estimate over the last `window` true-range samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolState {
    pub window: usize,
    pub atr: f64,
    pub atr_pct: f64,
    pub band: VolBand,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntelState {
    pub bot: BotMode,
    pub trade: TradeLifecycle,
    pub position_open: bool,
    pub vol: VolState,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntelSnapshot {
    pub timestamp: DateTime<Utc>,
    pub tick_count: u64,
    pub mode: String,
    pub exchange: String,
    pub state: IntelState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade: Option<serde_json::Value>,
}

/// One true-range sample for `Intel::update_vol`.
#[derive(Debug, Clone, Copy)]
pub struct VolUpdate {
    pub tr: f64,
    pub price: f64,
    /// Overrides the rolling window for this and later samples; clamped to
    /// [5, 200]. A shrink truncates to the most recent samples.
    pub window: Option<usize>,
}

fn band_from_atr_pct(atr_pct: f64) -> VolBand {
    if atr_pct < 0.0010 {
        VolBand::Low
    } else if atr_pct < 0.0030 {
        VolBand::Normal
    } else if atr_pct < 0.0060 {
        VolBand::High
    } else {
        VolBand::Extreme
    }
}

/// Market/lifecycle intelligence tracker. Single writer per instance: the
/// driving loop calls the mutators, everything else reads snapshots.
pub struct Intel {
    mode: String,
    exchange: String,
    ticks: u64,
    state: IntelState,
    tr_buf: VecDeque<f64>,
    last_trade: Option<serde_json::Value>,
}

impl Intel {
    pub fn new(mode: impl Into<String>, exchange: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            exchange: exchange.into(),
            ticks: 0,
            state: IntelState {
                bot: BotMode::Idle,
                trade: TradeLifecycle::Idle,
                position_open: false,
                vol: VolState {
                    window: VOL_WINDOW_DEFAULT,
                    atr: 0.0,
                    atr_pct: 0.0,
                    band: VolBand::Normal,
                },
            },
            tr_buf: VecDeque::with_capacity(VOL_WINDOW_DEFAULT),
            last_trade: None,
        }
    }

    /// Diagnostic counter; no effect on volatility or lifecycle.
    pub fn tick(&mut self) -> u64 {
        self.ticks += 1;
        self.ticks
    }

    pub fn set_bot(&mut self, bot: BotMode) {
        self.state.bot = bot;
    }

    /// `position_open` is derived from the lifecycle phase unless the caller
    /// overrides it explicitly.
    pub fn set_trade(&mut self, trade: TradeLifecycle, position_open: Option<bool>) {
        self.state.trade = trade;
        self.state.position_open = position_open.unwrap_or_else(|| trade.has_position());
    }

    /// Append a true-range sample and recompute the rolling ATR, ATR as a
    /// fraction of price, and the volatility band.
    pub fn update_vol(&mut self, update: &VolUpdate) -> VolState {
        let window = update
            .window
            .unwrap_or(self.state.vol.window)
            .clamp(VOL_WINDOW_MIN, VOL_WINDOW_MAX);

        self.tr_buf.push_back(update.tr);
        while self.tr_buf.len() > window {
            self.tr_buf.pop_front();
        }

        let atr = self.tr_buf.iter().sum::<f64>() / self.tr_buf.len() as f64;
        let atr_pct = atr / update.price.max(PRICE_FLOOR);

        let vol = VolState {
            window,
            atr,
            atr_pct,
            band: band_from_atr_pct(atr_pct),
        };
        self.state.vol = vol;
        vol
    }

    /// Point-in-time view of current conditions. A supplied trade payload is
    /// retained for later snapshots that omit one.
    pub fn snapshot(&mut self, trade: Option<serde_json::Value>) -> IntelSnapshot {
        if let Some(t) = trade {
            self.last_trade = Some(t);
        }
        IntelSnapshot {
            timestamp: Utc::now(),
            tick_count: self.ticks,
            mode: self.mode.clone(),
            exchange: self.exchange.clone(),
            state: self.state,
            trade: self.last_trade.clone(),
        }
    }

    pub fn state(&self) -> &IntelState {
        &self.state
    }
}
