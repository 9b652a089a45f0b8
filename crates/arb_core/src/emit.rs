//! Opportunity emission through a pluggable notifier port.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::evaluate::Opportunity;

/// Outbound alert channel. Implementations decide the transport; the
/// engine only decides what crosses the threshold.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Minimum profit ratio (min odds / max odds) worth alerting on.
    fn min_profit_threshold(&self) -> f64;

    async fn notify(&self, opportunity: &Opportunity) -> common::Result<()>;
}

/// Push every opportunity at or above the notifier's threshold.
///
/// A failed send is logged and skipped; one flaky delivery must not
/// suppress the remaining alerts. Returns how many alerts went out.
pub async fn emit(opportunities: &[Opportunity], notifier: &dyn Notifier) -> usize {
    let mut sent = 0usize;
    for opp in opportunities {
        if opp.profit_ratio < notifier.min_profit_threshold() {
            continue;
        }
        info!(
            event = %opp.event_a,
            market = %opp.market,
            profit_ratio = opp.profit_ratio,
            arbitrage = opp.is_arbitrage,
            "emitting opportunity"
        );
        match notifier.notify(opp).await {
            Ok(()) => sent += 1,
            Err(e) => warn!(event = %opp.event_a, error = %e, "notification failed"),
        }
    }
    sent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::MarketFamily;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingNotifier {
        threshold: f64,
        sent: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        fn min_profit_threshold(&self) -> f64 {
            self.threshold
        }

        async fn notify(&self, _opportunity: &Opportunity) -> common::Result<()> {
            if self.fail {
                return Err(common::Error::Notify("delivery refused".into()));
            }
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn make_opportunity(profit_ratio: f64) -> Opportunity {
        Opportunity {
            sport: "football".into(),
            family: MarketFamily::OverUnder,
            event_a: "Ajax vs PSV".into(),
            event_b: "Ajax vs PSV".into(),
            market: "goals, line 2.5".into(),
            start_time: Utc.with_ymd_and_hms(2025, 3, 1, 20, 0, 0).unwrap(),
            outcome_a: "Over".into(),
            outcome_b: "Under".into(),
            odds_a: 2.0,
            odds_b: 2.0,
            arbitrage_percentage: 100.0,
            is_arbitrage: false,
            stake_a: 0.0,
            stake_b: 0.0,
            profit_ratio,
            confidence: 95.0,
        }
    }

    #[tokio::test]
    async fn test_only_threshold_clearing_opportunities_emit() {
        let notifier = CountingNotifier {
            threshold: 0.95,
            sent: AtomicUsize::new(0),
            fail: false,
        };
        let opps = vec![make_opportunity(0.9), make_opportunity(0.96), make_opportunity(1.0)];
        let sent = emit(&opps, &notifier).await;
        assert_eq!(sent, 2);
        assert_eq!(notifier.sent.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_delivery_does_not_stop_the_batch() {
        let notifier = CountingNotifier {
            threshold: 0.0,
            sent: AtomicUsize::new(0),
            fail: true,
        };
        let opps = vec![make_opportunity(1.0), make_opportunity(1.0)];
        let sent = emit(&opps, &notifier).await;
        assert_eq!(sent, 0);
    }
}
