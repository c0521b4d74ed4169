mod common;

use guardrail_bot::config::Config;
use guardrail_bot::core::halt_rules::{HaltReason, HaltState};
use guardrail_bot::core::intel::{BotMode, Intel, TradeLifecycle, VolBand, VolUpdate};
use guardrail_bot::core::trade_management::{evaluate, ActionReason, TradeManagementState};
use guardrail_bot::exchange::PaperAdapter;
use guardrail_bot::models::{Direction, OrderSide};
use guardrail_bot::trading::executor::apply_trade_management;

use common::{make_swing, make_trade};

/// Walks the reference ladder through the full pipeline: tracker update,
/// evaluation, and executor application against the paper adapter, carrying
/// the management state across ticks the way the driving loop does.
#[tokio::test]
async fn full_pipeline_long_ladder() {
    let cfg = Config::from_env();
    let mut intel = Intel::new(cfg.mode.clone(), cfg.exchange.clone());
    let mut adapter = PaperAdapter::new();

    let mut trade = make_trade(Direction::Long, 100.0, 90.0);
    let mut tm = TradeManagementState::default();

    intel.set_bot(BotMode::Running);
    intel.set_trade(TradeLifecycle::Entered, None);
    assert!(intel.state().position_open);

    // Tick 1: +1R. TP1 partial plus the break-even move.
    intel.update_vol(&VolUpdate {
        tr: 10.0,
        price: 110.0,
        window: None,
    });
    intel.tick();
    let eval = evaluate(&trade, tm, 110.0, &cfg.tm, None);
    let reasons: Vec<ActionReason> = eval.actions.iter().map(|a| a.reason).collect();
    assert_eq!(reasons, vec![ActionReason::Tp1Partial, ActionReason::Be]);
    apply_trade_management(&mut adapter, &mut trade, &eval.actions)
        .await
        .unwrap();
    tm = eval.next_state;

    assert_eq!(trade.current_stop, Some(100.5));
    assert!((trade.size - 0.5).abs() < 1e-12);
    assert_eq!(adapter.reductions[0].side, OrderSide::Sell);
    intel.set_trade(TradeLifecycle::Managing, None);

    // Tick 2: +1.5R. BE+ chains off the freshly applied 100.5 stop.
    intel.update_vol(&VolUpdate {
        tr: 5.0,
        price: 115.0,
        window: None,
    });
    intel.tick();
    let eval = evaluate(&trade, tm, 115.0, &cfg.tm, None);
    assert_eq!(eval.actions.len(), 1);
    assert_eq!(eval.actions[0].reason, ActionReason::BePlus);
    assert_eq!(eval.actions[0].old_stop, Some(100.5));
    apply_trade_management(&mut adapter, &mut trade, &eval.actions)
        .await
        .unwrap();
    tm = eval.next_state;
    assert_eq!(trade.current_stop, Some(103.0));

    // Tick 3: +1.8R with a confirmed swing low. Runner trail tightens to 110.
    intel.update_vol(&VolUpdate {
        tr: 3.0,
        price: 118.0,
        window: None,
    });
    intel.tick();
    let swing = make_swing(115.0);
    let eval = evaluate(&trade, tm, 118.0, &cfg.tm, Some(&swing));
    assert_eq!(eval.actions.len(), 1);
    assert_eq!(eval.actions[0].reason, ActionReason::RunnerTrail);
    assert_eq!(eval.actions[0].new_stop, Some(110.0));
    apply_trade_management(&mut adapter, &mut trade, &eval.actions)
        .await
        .unwrap();
    tm = eval.next_state;
    assert_eq!(trade.current_stop, Some(110.0));

    // Flags are all latched; a repeat tick emits nothing new without a
    // fresh swing
    assert!(tm.tp1_done && tm.be_applied && tm.be_plus_applied && tm.runner_active);
    let eval = evaluate(&trade, tm, 118.0, &cfg.tm, Some(&swing));
    assert!(eval.actions.is_empty());

    // Tracker saw every tick and the trade payload sticks to snapshots
    let snap = intel.snapshot(Some(serde_json::to_value(&trade).unwrap()));
    assert_eq!(snap.tick_count, 3);
    assert_eq!(snap.trade.as_ref().unwrap()["current_stop"], 110.0);
    let snap = intel.snapshot(None);
    assert_eq!(snap.trade.as_ref().unwrap()["id"], "t1");

    intel.set_trade(TradeLifecycle::Closed, None);
    assert!(!intel.state().position_open);
}

#[tokio::test]
async fn short_pipeline_mirrors_long() {
    let cfg = Config::from_env();
    let mut adapter = PaperAdapter::new();
    let mut trade = make_trade(Direction::Short, 100.0, 110.0);
    let tm = TradeManagementState::default();

    // +1.5R for a short at price 85: tp1, be (99.5), be_plus (97.0)
    let eval = evaluate(&trade, tm, 85.0, &cfg.tm, None);
    apply_trade_management(&mut adapter, &mut trade, &eval.actions)
        .await
        .unwrap();

    assert_eq!(trade.current_stop, Some(97.0));
    assert_eq!(adapter.reductions[0].side, OrderSide::Buy);
    assert_eq!(adapter.stop_updates.len(), 2);

    // Runner trail above a swing high, chained off 97.0
    let swing = make_swing(90.0);
    let eval = evaluate(&trade, eval.next_state, 84.0, &cfg.tm, Some(&swing));
    assert_eq!(eval.actions.len(), 1);
    assert_eq!(eval.actions[0].reason, ActionReason::RunnerTrail);
    assert_eq!(eval.actions[0].new_stop, Some(95.0));
    assert_eq!(eval.actions[0].old_stop, Some(97.0));
}

#[tokio::test]
async fn volatility_bands_classify_the_tape() {
    let mut intel = Intel::new("sim", "paper");

    // Quiet tape: 0.05% of price
    for _ in 0..14 {
        intel.update_vol(&VolUpdate {
            tr: 25.0,
            price: 50_000.0,
            window: None,
        });
    }
    assert_eq!(intel.state().vol.band, VolBand::Low);

    // Violent tape: 1% of price swamps the window average within a window
    let mut last = intel.state().vol;
    for _ in 0..14 {
        last = intel.update_vol(&VolUpdate {
            tr: 500.0,
            price: 50_000.0,
            window: None,
        });
    }
    assert!((last.atr - 500.0).abs() < 1e-9);
    assert_eq!(last.band, VolBand::Extreme);
}

#[tokio::test]
async fn risk_gate_halts_the_bot() {
    let cfg = Config::from_env();

    // Book full
    assert!(!cfg.risk.allows_new_trade(cfg.risk.max_concurrent_trades, 0.0));
    // Day's loss at the limit
    assert!(!cfg
        .risk
        .allows_new_trade(0, cfg.risk.daily_loss_limit_pct));

    let halt = HaltState::engage(HaltReason::DailyLossLimit);
    assert!(halt.halted);
    assert_eq!(halt.reason, Some(HaltReason::DailyLossLimit));
}
