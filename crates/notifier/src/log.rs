//! Log-only notifier for dry runs.

use arb_core::{Notifier, Opportunity};
use async_trait::async_trait;
use common::Result;
use tracing::info;

/// Prints qualifying opportunities instead of sending SMS.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    pub min_profit_threshold: f64,
}

impl LogNotifier {
    pub fn new(min_profit_threshold: f64) -> Self {
        Self { min_profit_threshold }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    fn min_profit_threshold(&self) -> f64 {
        self.min_profit_threshold
    }

    async fn notify(&self, opportunity: &Opportunity) -> Result<()> {
        info!(
            event = %opportunity.event_a,
            market = %opportunity.market,
            outcomes = %format!("{} / {}", opportunity.outcome_a, opportunity.outcome_b),
            odds_a = opportunity.odds_a,
            odds_b = opportunity.odds_b,
            profit_ratio = opportunity.profit_ratio,
            arbitrage = opportunity.is_arbitrage,
            "dry-run notification"
        );
        Ok(())
    }
}
