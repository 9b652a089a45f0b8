//! Arbitrage evaluation over aligned outcome pairs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::align::OutcomePair;
use crate::classify::{MarketFamily, TaggedQuote, Timeframe};

/// One fully evaluated cross-catalog opportunity. Serialized as-is into
/// the results journal and the notification text.
#[derive(Debug, Clone, Serialize)]
pub struct Opportunity {
    pub sport: String,
    pub family: MarketFamily,
    pub event_a: String,
    pub event_b: String,
    pub market: String,
    pub start_time: DateTime<Utc>,
    pub outcome_a: String,
    pub outcome_b: String,
    pub odds_a: f64,
    pub odds_b: f64,
    /// (1/odds_a + 1/odds_b) * 100; below 100 means guaranteed margin.
    pub arbitrage_percentage: f64,
    pub is_arbitrage: bool,
    /// Bankroll split proportional to implied probability; zero when the
    /// pair is not an arbitrage.
    pub stake_a: f64,
    pub stake_b: f64,
    /// min(odds) / max(odds), the closeness signal used for alerting.
    pub profit_ratio: f64,
    /// Event-match confidence.
    pub confidence: f64,
}

/// Human-readable market description from one leg's tag.
fn describe(t: &TaggedQuote) -> String {
    let mut s = t.tag.kind.to_string();
    if t.tag.timeframe != Timeframe::FullTime {
        s.push_str(&format!(", {}", t.tag.timeframe));
    }
    if let Some(line) = t.line {
        s.push_str(&format!(", line {}", line));
    }
    if let Some(subject) = &t.tag.subject {
        s.push_str(&format!(" ({})", subject));
    }
    s
}

/// Evaluate one aligned pair against a bankroll.
pub fn evaluate(pair: &OutcomePair, bankroll: f64, sport: &str) -> Opportunity {
    let a = &pair.quote_a;
    let b = &pair.quote_b;

    let implied_sum = 1.0 / a.quote.odds + 1.0 / b.quote.odds;
    let arbitrage_percentage = implied_sum * 100.0;
    let is_arbitrage = arbitrage_percentage < 100.0;

    let (stake_a, stake_b) = if is_arbitrage {
        (
            (1.0 / a.quote.odds) / implied_sum * bankroll,
            (1.0 / b.quote.odds) / implied_sum * bankroll,
        )
    } else {
        (0.0, 0.0)
    };

    let profit_ratio =
        a.quote.odds.min(b.quote.odds) / a.quote.odds.max(b.quote.odds);

    Opportunity {
        sport: sport.to_string(),
        family: a.tag.family,
        event_a: a.quote.event_name.clone(),
        event_b: b.quote.event_name.clone(),
        market: describe(a),
        start_time: a.quote.start_time,
        outcome_a: a.outcome.clone(),
        outcome_b: b.outcome.clone(),
        odds_a: a.quote.odds,
        odds_b: b.quote.odds,
        arbitrage_percentage,
        is_arbitrage,
        stake_a,
        stake_b,
        profit_ratio,
        confidence: pair.confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::OutcomePair;
    use crate::classify::{MarketTag, Side};
    use crate::normalize::Quote;
    use chrono::TimeZone;
    use common::{Category, Source};

    fn make_pair(odds_a: f64, odds_b: f64) -> OutcomePair {
        let quote = |source, outcome: &str, odds| TaggedQuote {
            quote: Quote {
                source,
                event_id: "e".into(),
                event_name: "Ajax vs PSV".into(),
                team1: Some("Ajax".into()),
                team2: Some("PSV".into()),
                start_time: Utc.with_ymd_and_hms(2025, 3, 1, 20, 0, 0).unwrap(),
                category: Category::Men,
                market_label: "Doelpunten Over/Under 2.5".into(),
                market_side_label: "Doelpunten Over/Under 2.5".into(),
                outcome_label: outcome.into(),
                outcome_english: None,
                outcome_type: None,
                pick: None,
                odds,
                line: Some(2.5),
                subject: None,
            },
            tag: MarketTag {
                family: MarketFamily::OverUnder,
                kind: "goals",
                timeframe: Timeframe::FullTime,
                side: Side::Combined,
                subject: None,
            },
            line: Some(2.5),
            outcome: outcome.into(),
        };
        OutcomePair {
            quote_a: quote(Source::Toto, "Over", odds_a),
            quote_b: quote(Source::Kambi, "Under", odds_b),
            confidence: 95.0,
        }
    }

    #[test]
    fn test_arbitrage_detected_below_100_percent() {
        // 1/2.2 + 1/2.2 = 90.9%, a genuine arbitrage.
        let opp = evaluate(&make_pair(2.2, 2.2), 1000.0, "football");
        assert!(opp.is_arbitrage);
        assert!(opp.arbitrage_percentage < 100.0);
        assert!((opp.stake_a - 500.0).abs() < 1e-6);
        assert!((opp.stake_b - 500.0).abs() < 1e-6);
        assert_eq!(opp.profit_ratio, 1.0);
    }

    #[test]
    fn test_no_arbitrage_zeroes_stakes() {
        // 1/1.8 + 1/1.9 = 108.2%, no margin.
        let opp = evaluate(&make_pair(1.8, 1.9), 1000.0, "football");
        assert!(!opp.is_arbitrage);
        assert_eq!(opp.stake_a, 0.0);
        assert_eq!(opp.stake_b, 0.0);
    }

    #[test]
    fn test_stakes_split_proportional_to_implied_probability() {
        // 1/2.1 + 1/2.5 = 87.6%; the shorter leg gets the bigger stake.
        let opp = evaluate(&make_pair(2.1, 2.5), 1000.0, "football");
        assert!(opp.is_arbitrage);
        assert!(opp.stake_a > opp.stake_b);
        assert!((opp.stake_a + opp.stake_b - 1000.0).abs() < 1e-6);
        let expected_a = (1.0 / 2.1) / (1.0 / 2.1 + 1.0 / 2.5) * 1000.0;
        assert!((opp.stake_a - expected_a).abs() < 1e-6);
    }

    #[test]
    fn test_arbitrage_stakes_equalize_payout() {
        // 1/2.10 + 1/2.05 = 96.4%; both legs must pay out the same.
        let opp = evaluate(&make_pair(2.10, 2.05), 1000.0, "football");
        assert!(opp.is_arbitrage);
        assert!((opp.stake_a + opp.stake_b - 1000.0).abs() < 1e-6);
        let payout_a = opp.stake_a * opp.odds_a;
        let payout_b = opp.stake_b * opp.odds_b;
        assert!((payout_a - payout_b).abs() < 1e-6);
        assert!(payout_a > 1000.0);
    }

    #[test]
    fn test_implied_sum_is_symmetric_in_the_legs() {
        let ab = evaluate(&make_pair(2.1, 2.5), 1000.0, "football");
        let ba = evaluate(&make_pair(2.5, 2.1), 1000.0, "football");
        assert!((ab.arbitrage_percentage - ba.arbitrage_percentage).abs() < 1e-9);
        assert!((ab.profit_ratio - ba.profit_ratio).abs() < 1e-9);
    }

    #[test]
    fn test_profit_ratio_is_min_over_max() {
        let opp = evaluate(&make_pair(2.0, 2.5), 1000.0, "football");
        assert!((opp.profit_ratio - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_market_description_names_kind_and_line() {
        let opp = evaluate(&make_pair(2.0, 2.5), 1000.0, "football");
        assert_eq!(opp.market, "goals, line 2.5");
    }
}
