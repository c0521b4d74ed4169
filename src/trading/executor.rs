use anyhow::{Context, Result};
use tracing::info;

use crate::core::trade_management::MgmtAction;
use crate::exchange::{ExchangeAdapter, ReduceRequest, StopUpdateRequest};
use crate::models::Trade;

/// Apply an evaluation's actions in order through the adapter, keeping the
/// local trade in sync so the next evaluation sees the updated stop and size.
/// An adapter rejection propagates to the caller; it never feeds back into
/// evaluator state.
pub async fn apply_trade_management(
    adapter: &mut dyn ExchangeAdapter,
    trade: &mut Trade,
    actions: &[MgmtAction],
) -> Result<()> {
    for action in actions {
        if let Some(pct) = action.close_pct {
            if pct > 0.0 {
                let qty = round_qty(trade.size * pct);
                if qty > 0.0 {
                    adapter
                        .reduce_position(&ReduceRequest {
                            symbol: trade.symbol.clone(),
                            side: trade.side.reduce_side(),
                            qty,
                            reason: action.reason.to_string(),
                        })
                        .await
                        .with_context(|| {
                            format!("reduce_position failed for {}", trade.symbol)
                        })?;
                    trade.size = round_qty(trade.size - qty);
                    info!(
                        "{} {} closed {} ({}), remaining {}",
                        trade.symbol, trade.side, qty, action.reason, trade.size
                    );
                }
            }
        }

        if let Some(stop) = action.new_stop {
            if stop.is_finite() {
                adapter
                    .update_stop(&StopUpdateRequest {
                        symbol: trade.symbol.clone(),
                        stop_price: stop,
                        reason: action.reason.to_string(),
                    })
                    .await
                    .with_context(|| format!("update_stop failed for {}", trade.symbol))?;
                trade.current_stop = Some(stop);
                info!(
                    "{} {} stop -> {} ({}) at +{:.2}R",
                    trade.symbol, trade.side, stop, action.reason, action.profit_r
                );
            }
        }
    }

    Ok(())
}

fn round_qty(q: f64) -> f64 {
    // TODO: use per-symbol step sizes once an adapter exposes them
    let r = (q * 1000.0).floor() / 1000.0;
    if r > 0.0 {
        r
    } else {
        0.0
    }
}
