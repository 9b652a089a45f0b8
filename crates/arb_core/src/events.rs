//! Cross-catalog event matching.
//!
//! Team names are compared pairwise (home against home, away against away)
//! when both event names split cleanly; otherwise the whole names are
//! compared. Candidate ties resolve deterministically: highest confidence,
//! then nearest start time, then lexically smallest counterpart name.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use common::Category;
use tracing::debug;

use crate::normalize::Quote;
use crate::similarity::token_set_ratio;

/// One distinct event as seen by a single source.
#[derive(Debug, Clone)]
pub struct EventEntry {
    pub event_name: String,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub start_time: DateTime<Utc>,
    pub category: Category,
}

/// An accepted cross-catalog event pairing.
#[derive(Debug, Clone)]
pub struct EventMatch {
    pub event_a: String,
    pub event_b: String,
    pub confidence: f64,
}

/// Distinct events from one side's quotes, ordered by name.
pub fn distinct_events(quotes: &[Quote]) -> Vec<EventEntry> {
    let mut by_name: BTreeMap<&str, EventEntry> = BTreeMap::new();
    for q in quotes {
        by_name.entry(&q.event_name).or_insert_with(|| EventEntry {
            event_name: q.event_name.clone(),
            team1: q.team1.clone(),
            team2: q.team2.clone(),
            start_time: q.start_time,
            category: q.category,
        });
    }
    by_name.into_values().collect()
}

/// Pairwise confidence between two events, or `None` below the threshold.
///
/// Per-team comparison keeps "Real Madrid vs Barcelona" away from
/// "Real Madrid vs Real Sociedad"; a whole-name comparison would let the
/// shared half dominate.
fn confidence(a: &EventEntry, b: &EventEntry, threshold: f64) -> Option<f64> {
    match (&a.team1, &a.team2, &b.team1, &b.team2) {
        (Some(a1), Some(a2), Some(b1), Some(b2)) => {
            let s1 = token_set_ratio(a1, b1);
            let s2 = token_set_ratio(a2, b2);
            if s1 >= threshold && s2 >= threshold {
                Some((s1 + s2) / 2.0)
            } else {
                None
            }
        }
        _ => {
            let s = token_set_ratio(&a.event_name, &b.event_name);
            (s >= threshold).then_some(s)
        }
    }
}

/// Match each side-A event to at most one side-B event.
///
/// Candidates must agree on category; start times are compared only as a
/// tie-break here because the outcome-alignment join enforces start-time
/// equality anyway.
pub fn match_events(
    events_a: &[EventEntry],
    events_b: &[EventEntry],
    threshold: f64,
) -> Vec<EventMatch> {
    let mut matches = Vec::new();

    for a in events_a {
        let mut best: Option<(f64, &EventEntry)> = None;
        for b in events_b {
            if a.category != b.category {
                continue;
            }
            let Some(score) = confidence(a, b, threshold) else {
                continue;
            };
            let better = match best {
                None => true,
                Some((best_score, best_b)) => {
                    if score != best_score {
                        score > best_score
                    } else {
                        let gap = |e: &EventEntry| {
                            (e.start_time - a.start_time).num_seconds().abs()
                        };
                        match gap(b).cmp(&gap(best_b)) {
                            std::cmp::Ordering::Less => true,
                            std::cmp::Ordering::Greater => false,
                            std::cmp::Ordering::Equal => b.event_name < best_b.event_name,
                        }
                    }
                }
            };
            if better {
                best = Some((score, b));
            }
        }

        if let Some((score, b)) = best {
            debug!(
                event_a = %a.event_name,
                event_b = %b.event_name,
                confidence = score,
                "event matched"
            );
            matches.push(EventMatch {
                event_a: a.event_name.clone(),
                event_b: b.event_name.clone(),
                confidence: score,
            });
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_event(name: &str, hour: u32) -> EventEntry {
        let (team1, team2) = match name.split_once(" vs ") {
            Some((a, b)) => (Some(a.to_string()), Some(b.to_string())),
            None => (None, None),
        };
        EventEntry {
            event_name: name.to_string(),
            team1,
            team2,
            start_time: Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap(),
            category: Category::Men,
        }
    }

    #[test]
    fn test_abbreviated_names_match() {
        let a = [make_event("Real Madrid vs Barcelona", 20)];
        let b = [make_event("R. Madrid vs FC Barcelona", 20)];
        let matches = match_events(&a, &b, 65.0);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].event_b, "R. Madrid vs FC Barcelona");
    }

    #[test]
    fn test_shared_half_does_not_pair_different_fixtures() {
        let a = [make_event("Real Madrid vs Barcelona", 20)];
        let b = [make_event("Real Madrid vs Real Sociedad", 20)];
        assert!(match_events(&a, &b, 65.0).is_empty());
    }

    #[test]
    fn test_category_must_agree() {
        let a = [make_event("Ajax vs PSV", 20)];
        let mut b = make_event("Ajax vs PSV", 20);
        b.category = Category::Women;
        assert!(match_events(&a, &[b], 65.0).is_empty());
    }

    #[test]
    fn test_tie_breaks_on_nearest_start_time() {
        // Both candidates score 100 on the token-set comparison; only the
        // start-time gap separates them.
        let a = [make_event("Ajax vs PSV", 20)];
        let far = make_event("PSV Ajax", 12);
        let near = make_event("Ajax PSV", 20);
        let matches = match_events(&a, &[far, near], 65.0);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].event_b, "Ajax PSV");
    }

    #[test]
    fn test_best_of_several_candidates_wins() {
        let a = [make_event("FC Utrecht vs AZ", 20)];
        let b = [
            make_event("FC Utrecht vs AZ Alkmaar", 20),
            make_event("FC Volendam vs AZ Alkmaar", 20),
        ];
        let matches = match_events(&a, &b, 65.0);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].event_b, "FC Utrecht vs AZ Alkmaar");
    }

    #[test]
    fn test_matching_is_idempotent() {
        let a = [
            make_event("Real Madrid vs Barcelona", 20),
            make_event("Ajax vs PSV", 18),
        ];
        let b = [
            make_event("R. Madrid vs FC Barcelona", 20),
            make_event("Ajax Amsterdam vs PSV Eindhoven", 18),
        ];
        let first = match_events(&a, &b, 65.0);
        let second = match_events(&a, &b, 65.0);
        assert_eq!(first.len(), second.len());
        for (x, y) in first.iter().zip(second.iter()) {
            assert_eq!(x.event_a, y.event_a);
            assert_eq!(x.event_b, y.event_b);
            assert_eq!(x.confidence, y.confidence);
        }
    }

    #[test]
    fn test_distinct_events_deduplicates_by_name() {
        let q = |name: &str| Quote {
            source: common::Source::Toto,
            event_id: "e".into(),
            event_name: name.into(),
            team1: None,
            team2: None,
            start_time: Utc.with_ymd_and_hms(2025, 3, 1, 20, 0, 0).unwrap(),
            category: Category::Men,
            market_label: "Draw No Bet".into(),
            market_side_label: "Draw No Bet".into(),
            outcome_label: "1".into(),
            outcome_english: None,
            outcome_type: None,
            pick: None,
            odds: 2.0,
            line: None,
            subject: None,
        };
        let quotes = vec![q("Ajax vs PSV"), q("Ajax vs PSV"), q("AZ vs Feyenoord")];
        let events = distinct_events(&quotes);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_name, "AZ vs Feyenoord");
    }
}
