//! Outcome alignment: pair opposite legs of the same market across the
//! two catalogs.
//!
//! Alignment is an exact join on (matched event, kind, timeframe, side,
//! subject, line, category, start time), then an opposite-outcome check
//! on the canonical labels. Player subjects are reconciled fuzzily first,
//! within start-time cohorts, so the join can stay literal.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::Category;
use tracing::debug;

use crate::classify::{Side, TaggedQuote, Timeframe};
use crate::events::EventMatch;
use crate::similarity::token_set_ratio;

/// Two opposite legs of one market, ready for evaluation.
#[derive(Debug, Clone)]
pub struct OutcomePair {
    pub quote_a: TaggedQuote,
    pub quote_b: TaggedQuote,
    /// Event-match confidence carried through from the event matcher.
    pub confidence: f64,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct JoinKey {
    event_name: String,
    kind: &'static str,
    timeframe: Timeframe,
    side: Side,
    subject: Option<String>,
    line_milli: Option<i64>,
    category: Category,
    start_time: DateTime<Utc>,
}

impl JoinKey {
    fn for_quote(t: &TaggedQuote, event_name: &str) -> Self {
        JoinKey {
            event_name: event_name.to_string(),
            kind: t.tag.kind,
            timeframe: t.tag.timeframe.clone(),
            side: t.tag.side,
            subject: t.tag.subject.clone(),
            line_milli: t.line_milli(),
            category: t.quote.category,
            start_time: t.quote.start_time,
        }
    }
}

/// Rewrite side-A player subjects to side-B spelling when a fuzzy match
/// within the same start-time cohort clears the threshold.
///
/// The two catalogs abbreviate player names differently ("Lang" vs
/// "N. Lang"); without this the literal subject join would drop nearly
/// every player market.
fn reconcile_subjects(tagged_a: &mut [TaggedQuote], tagged_b: &[TaggedQuote], threshold: f64) {
    let mut cohorts: HashMap<DateTime<Utc>, Vec<&str>> = HashMap::new();
    for t in tagged_b {
        if t.tag.side == Side::Player {
            if let Some(subject) = t.tag.subject.as_deref() {
                cohorts.entry(t.quote.start_time).or_default().push(subject);
            }
        }
    }

    for t in tagged_a.iter_mut() {
        if t.tag.side != Side::Player {
            continue;
        }
        let Some(subject) = t.tag.subject.as_deref() else {
            continue;
        };
        let Some(candidates) = cohorts.get(&t.quote.start_time) else {
            continue;
        };
        let mut best: Option<(f64, &str)> = None;
        for &candidate in candidates {
            let score = token_set_ratio(subject, candidate);
            let better = match best {
                None => score >= threshold,
                Some((best_score, best_name)) => {
                    score > best_score
                        || (score == best_score && candidate < best_name)
                }
            };
            if better && score >= threshold {
                best = Some((score, candidate));
            }
        }
        if let Some((score, name)) = best {
            debug!(from = subject, to = name, score, "subject reconciled");
            t.tag.subject = Some(name.to_string());
        }
    }
}

/// Pair each side-A quote with at most one opposite-outcome side-B quote,
/// taking the best-priced counterpart when a key holds several. Side-B
/// quotes may back several side-A quotes; only the A side is consumed.
pub fn align(
    mut tagged_a: Vec<TaggedQuote>,
    tagged_b: Vec<TaggedQuote>,
    matches: &[EventMatch],
    subject_threshold: f64,
) -> Vec<OutcomePair> {
    reconcile_subjects(&mut tagged_a, &tagged_b, subject_threshold);

    let match_map: HashMap<&str, &EventMatch> = matches
        .iter()
        .map(|m| (m.event_a.as_str(), m))
        .collect();

    let mut by_key: HashMap<JoinKey, Vec<&TaggedQuote>> = HashMap::new();
    for t in &tagged_b {
        let event_name = t.quote.event_name.clone();
        by_key
            .entry(JoinKey::for_quote(t, &event_name))
            .or_default()
            .push(t);
    }

    let mut pairs = Vec::new();
    for a in tagged_a {
        let Some(m) = match_map.get(a.quote.event_name.as_str()) else {
            continue;
        };
        let key = JoinKey::for_quote(&a, &m.event_b);
        let Some(candidates) = by_key.get(&key) else {
            continue;
        };
        let best = candidates
            .iter()
            .filter(|b| b.outcome != a.outcome)
            .max_by(|x, y| x.quote.odds.total_cmp(&y.quote.odds));
        if let Some(b) = best {
            pairs.push(OutcomePair {
                quote_a: a,
                quote_b: (*b).clone(),
                confidence: m.confidence,
            });
        }
    }

    pairs
}
