use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Direction, SwingPoint, Trade};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionReason {
    Tp1Partial,
    Be,
    BePlus,
    RunnerTrail,
}

impl fmt::Display for ActionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionReason::Tp1Partial => write!(f, "tp1_partial"),
            ActionReason::Be => write!(f, "be"),
            ActionReason::BePlus => write!(f, "be_plus"),
            ActionReason::RunnerTrail => write!(f, "runner_trail"),
        }
    }
}

/// Per-trade progress flags, carried across ticks by the caller. Each flag is
/// monotonic for the life of the trade: once set, its rule block is skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeManagementState {
    pub tp1_done: bool,
    pub be_applied: bool,
    pub be_plus_applied: bool,
    pub runner_active: bool,
}

/// Policy constants, all in units of R or as a fraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeManagementParams {
    /// Profit (in R) that triggers the TP1 partial close.
    pub tp1_r: f64,
    /// Fraction of the position closed at TP1.
    pub tp1_close_pct: f64,
    /// Profit (in R) that arms the break-even move.
    pub be_trigger_r: f64,
    /// Offset (in R) past entry so the BE stop covers fees.
    pub fee_buffer_r: f64,
    /// Profit (in R) that arms the BE+ lock.
    pub be_plus_trigger_r: f64,
    /// Profit (in R) locked in by the BE+ stop, on top of the fee buffer.
    pub be_plus_lock_r: f64,
    /// Distance (in R) the runner stop trails behind the swing point.
    pub runner_trail_buffer_r: f64,
}

impl Default for TradeManagementParams {
    fn default() -> Self {
        Self {
            tp1_r: 1.0,
            tp1_close_pct: 0.5,
            be_trigger_r: 1.0,
            fee_buffer_r: 0.05,
            be_plus_trigger_r: 1.5,
            be_plus_lock_r: 0.25,
            runner_trail_buffer_r: 0.5,
        }
    }
}

/// A single risk-reduction proposal. Exactly one of `new_stop`/`close_pct`
/// is set: tp1_partial carries `close_pct`, the stop moves carry `new_stop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MgmtAction {
    pub reason: ActionReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_stop: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_pct: Option<f64>,
    pub profit_r: f64,
    pub old_stop: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub next_state: TradeManagementState,
    pub actions: Vec<MgmtAction>,
    pub profit_r: f64,
    pub r: f64,
}

/// A stop may only move to reduce risk. `None` baseline accepts anything;
/// otherwise the proposal must strictly improve protection for the side.
pub fn stop_tightens(side: Direction, baseline: Option<f64>, proposed: f64) -> bool {
    match baseline {
        None => true,
        Some(b) => match side {
            Direction::Long => proposed > b,
            Direction::Short => proposed < b,
        },
    }
}

fn stop_from_entry(entry: f64, r: f64, side: Direction, offset_r: f64) -> f64 {
    match side {
        Direction::Long => entry + offset_r * r,
        Direction::Short => entry - offset_r * r,
    }
}

/// Evaluate the guardrail ladder for one price tick.
///
/// Pure: never mutates the trade, never performs an action, never panics on
/// type-valid input. Rules run in fixed order (tp1 -> be -> be_plus ->
/// runner_trail), each gated by its own flag, so a single tick can emit
/// several actions. The tighten baseline chains through proposals emitted
/// earlier in the same call, so a BE+ move never backslides behind a BE move
/// just proposed.
///
/// An invalid risk unit (R <= 0 or non-finite) is the defined no-op path:
/// the input state comes back unchanged with no actions.
pub fn evaluate(
    trade: &Trade,
    state: TradeManagementState,
    price: f64,
    params: &TradeManagementParams,
    swing: Option<&SwingPoint>,
) -> Evaluation {
    let r = trade.risk_unit();
    if !r.is_finite() || r <= 0.0 {
        return Evaluation {
            next_state: state,
            actions: Vec::new(),
            profit_r: 0.0,
            r,
        };
    }

    let profit_r = match trade.side {
        Direction::Long => (price - trade.entry) / r,
        Direction::Short => (trade.entry - price) / r,
    };

    let mut next = state;
    let mut actions: Vec<MgmtAction> = Vec::new();
    // Tighten baseline; advances as proposals are emitted within this call.
    let mut latest_stop = trade.current_stop;

    // 1. TP1 partial close
    if !next.tp1_done && profit_r >= params.tp1_r {
        actions.push(MgmtAction {
            reason: ActionReason::Tp1Partial,
            new_stop: None,
            close_pct: Some(params.tp1_close_pct.clamp(0.0, 1.0)),
            profit_r,
            old_stop: latest_stop,
        });
        next.tp1_done = true;
        next.runner_active = true;
    }

    // 2. Break-even: entry +/- fee buffer. A rejected tighten leaves the
    // flag clear so the rule retries on a later tick.
    if !next.be_applied && profit_r >= params.be_trigger_r {
        let proposed = stop_from_entry(trade.entry, r, trade.side, params.fee_buffer_r);
        if stop_tightens(trade.side, latest_stop, proposed) {
            actions.push(MgmtAction {
                reason: ActionReason::Be,
                new_stop: Some(proposed),
                close_pct: None,
                profit_r,
                old_stop: latest_stop,
            });
            latest_stop = Some(proposed);
            next.be_applied = true;
        }
    }

    // 3. Break-even-plus: lock profit past the fee buffer.
    if !next.be_plus_applied && profit_r >= params.be_plus_trigger_r {
        let proposed = stop_from_entry(
            trade.entry,
            r,
            trade.side,
            params.be_plus_lock_r + params.fee_buffer_r,
        );
        if stop_tightens(trade.side, latest_stop, proposed) {
            actions.push(MgmtAction {
                reason: ActionReason::BePlus,
                new_stop: Some(proposed),
                close_pct: None,
                profit_r,
                old_stop: latest_stop,
            });
            latest_stop = Some(proposed);
            next.be_plus_applied = true;
        }
    }

    // 4. Runner trail: stop trails the supplied swing point by a buffer.
    // No flag gates repetition; fires on every tick that tightens.
    if next.runner_active && profit_r >= params.be_plus_trigger_r {
        if let Some(sw) = swing {
            let proposed = match trade.side {
                Direction::Long => sw.price - params.runner_trail_buffer_r * r,
                Direction::Short => sw.price + params.runner_trail_buffer_r * r,
            };
            if stop_tightens(trade.side, latest_stop, proposed) {
                actions.push(MgmtAction {
                    reason: ActionReason::RunnerTrail,
                    new_stop: Some(proposed),
                    close_pct: None,
                    profit_r,
                    old_stop: latest_stop,
                });
            }
        }
    }

    Evaluation {
        next_state: next,
        actions,
        profit_r,
        r,
    }
}
