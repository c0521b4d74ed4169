use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info, warn};

use guardrail_bot::config::{Config, SharedConfig};
use guardrail_bot::core::halt_rules::{HaltReason, HaltState};
use guardrail_bot::core::intel::{BotMode, Intel, TradeLifecycle, VolUpdate};
use guardrail_bot::core::trade_management::{evaluate, TradeManagementState};
use guardrail_bot::exchange::ExchangeAdapter;
use guardrail_bot::trading::executor::apply_trade_management;
use guardrail_bot::trading::sim::{build_scenarios, Scenario};

pub struct GuardrailBot {
    config: SharedConfig,
    adapter: Box<dyn ExchangeAdapter>,
    intel: Intel,
    halt: HaltState,
    open_trades: usize,
    daily_loss_pct: f64,
}

impl GuardrailBot {
    pub async fn new(config: SharedConfig, adapter: Box<dyn ExchangeAdapter>) -> Self {
        let cfg = config.read().await;

        info!("{}", "=".repeat(60));
        info!("Guardrail bot starting up");
        info!(
            "Mode: {} | Exchange: {} | Symbol: {}",
            cfg.mode, cfg.exchange, cfg.symbol
        );
        info!(
            "TP1: +{}R closes {:.0}%",
            cfg.tm.tp1_r,
            cfg.tm.tp1_close_pct * 100.0
        );
        info!(
            "BE: +{}R (fee buffer {}R) | BE+: +{}R locks {}R | trail buffer {}R",
            cfg.tm.be_trigger_r,
            cfg.tm.fee_buffer_r,
            cfg.tm.be_plus_trigger_r,
            cfg.tm.be_plus_lock_r,
            cfg.tm.runner_trail_buffer_r
        );
        info!("{}", "=".repeat(60));

        let intel = Intel::new(cfg.mode.clone(), cfg.exchange.clone());
        drop(cfg);

        Self {
            config,
            adapter,
            intel,
            halt: HaltState::clear(),
            open_trades: 0,
            daily_loss_pct: 0.0,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("Bot is now running. Press Ctrl+C to stop.");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                self.shutdown();
            }
            res = self.run_scenarios() => {
                res?;
            }
        }

        Ok(())
    }

    async fn run_scenarios(&mut self) -> Result<()> {
        self.intel.set_bot(BotMode::Running);

        for scenario in build_scenarios() {
            let cfg = self.config.read().await.clone();

            if !cfg
                .risk
                .allows_new_trade(self.open_trades, self.daily_loss_pct)
            {
                self.halt = HaltState::engage(HaltReason::DailyLossLimit);
                self.intel.set_bot(BotMode::Halted);
                warn!(
                    "risk limits block new trades ({} open, {:.2}% daily loss), halting",
                    self.open_trades, self.daily_loss_pct
                );
                break;
            }

            self.run_scenario(&cfg, scenario).await?;
        }

        if !self.halt.halted {
            self.intel.set_bot(BotMode::Idle);
        }
        let snap = self.intel.snapshot(None);
        info!(
            "Sim done after {} ticks, vol band {}. Exiting.",
            snap.tick_count, snap.state.vol.band
        );

        Ok(())
    }

    async fn run_scenario(&mut self, cfg: &Config, scenario: Scenario) -> Result<()> {
        info!("=== scenario: {} ===", scenario.name);

        let mut trade = scenario.trade;
        let mut tm = TradeManagementState::default();
        self.open_trades += 1;
        self.intel.set_trade(TradeLifecycle::Entered, None);

        let mut last_mark = trade.entry;
        for step in &scenario.marks {
            // Candle-less loop: mark-to-mark delta is the degenerate true range
            let tr = (step.price - last_mark).abs();
            last_mark = step.price;

            self.intel.update_vol(&VolUpdate {
                tr,
                price: step.price,
                window: Some(cfg.vol_window),
            });
            self.intel.tick();

            let eval = evaluate(&trade, tm, step.price, &cfg.tm, step.swing.as_ref());
            info!(
                "tick mark={} profitR={:.2} stop={:?} actions={}",
                step.price,
                eval.profit_r,
                trade.current_stop,
                eval.actions.len()
            );

            if !eval.actions.is_empty() {
                self.intel.set_trade(TradeLifecycle::Managing, None);
            }
            apply_trade_management(self.adapter.as_mut(), &mut trade, &eval.actions).await?;
            tm = eval.next_state;

            let snap = self.intel.snapshot(Some(serde_json::to_value(&trade)?));
            debug!("snapshot: {}", serde_json::to_string(&snap)?);

            tokio::time::sleep(Duration::from_millis(cfg.tick_interval_ms)).await;
        }

        self.intel.set_trade(TradeLifecycle::Closed, None);
        self.open_trades -= 1;
        info!(
            "scenario {} finished: final stop {:?}, remaining size {}",
            scenario.name, trade.current_stop, trade.size
        );

        Ok(())
    }

    fn shutdown(&mut self) {
        self.intel.set_bot(BotMode::Idle);
        let snap = self.intel.snapshot(None);
        info!(
            "Shutting down after {} ticks (bot {}, trade {})",
            snap.tick_count, snap.state.bot, snap.state.trade
        );
    }
}
