//! Quote normalizer — turns one source's raw snapshot rows into canonical
//! quotes.
//!
//! Per-row problems (missing odds, missing event name, odds below 1.0 after
//! rescaling) drop the row and never abort the batch. Rows outside the
//! sport or market-kind allow-list are discarded silently; that is the
//! expected common case, not an error.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use common::{Category, RawQuoteRow, Source};
use tracing::debug;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::sport::SportProfile;

/// One normalized priced outcome. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Quote {
    pub source: Source,
    pub event_id: String,
    pub event_name: String,
    /// Left side of the "vs" split, when the event name has one.
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub start_time: DateTime<Utc>,
    pub category: Category,
    pub market_label: String,
    /// English market label when the source provides one; falls back to
    /// `market_label`. Used for literal team-name side detection.
    pub market_side_label: String,
    pub outcome_label: String,
    pub outcome_english: Option<String>,
    pub outcome_type: Option<String>,
    /// Winner-pick code with "H"/"A" remapped to "1"/"2".
    pub pick: Option<String>,
    pub odds: f64,
    pub line: Option<f64>,
    pub subject: Option<String>,
}

/// Row-drop accounting for one normalization pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct NormalizeStats {
    pub input_rows: usize,
    pub kept: usize,
    pub dropped_other_sport: usize,
    pub dropped_kind_filter: usize,
    pub dropped_missing_field: usize,
    pub dropped_bad_odds: usize,
    pub dropped_duplicate: usize,
}

/// Strip diacritics (NFKD, combining marks removed) and turn hyphens into
/// spaces so "Saint-Gilloise" and "São Paulo" compare cleanly.
pub fn clean_text(s: &str) -> String {
    s.replace('-', " ")
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

fn clean_opt(s: &Option<String>) -> Option<String> {
    s.as_deref().map(clean_text)
}

fn map_pick(code: &str) -> String {
    match code {
        "H" => "1".to_string(),
        "A" => "2".to_string(),
        other => other.to_string(),
    }
}

/// Key for collapsing exact duplicate quotes from one source.
fn dedup_key(q: &Quote) -> (String, String, String, Option<i64>, i64) {
    (
        q.event_name.clone(),
        q.market_label.clone(),
        q.outcome_label.clone(),
        q.line.map(|l| (l * 1000.0).round() as i64),
        (q.odds * 1000.0).round() as i64,
    )
}

/// Normalize one source's raw rows against a sport profile.
pub fn normalize(
    rows: &[RawQuoteRow],
    source: Source,
    profile: &SportProfile,
) -> (Vec<Quote>, NormalizeStats) {
    let mut stats = NormalizeStats {
        input_rows: rows.len(),
        ..Default::default()
    };

    let sport_tag = profile.sport_tag(source);
    let kind_allow = profile.kind_allow(source);
    let women = profile.women_competitions(source);
    let scaled = source == Source::Kambi;

    let mut seen: HashSet<(String, String, String, Option<i64>, i64)> = HashSet::new();
    let mut quotes = Vec::new();

    for row in rows {
        if row.sport != sport_tag {
            stats.dropped_other_sport += 1;
            continue;
        }

        if !kind_allow.is_empty() {
            let kind_ok = row
                .outcome_type
                .as_deref()
                .is_some_and(|t| kind_allow.contains(&t));
            if !kind_ok {
                stats.dropped_kind_filter += 1;
                continue;
            }
        }

        let (event_name, outcome_label, odds) =
            match (&row.event_name, &row.outcome_label, row.odds) {
                (Some(e), Some(o), Some(odds)) => (e, o, odds),
                _ => {
                    stats.dropped_missing_field += 1;
                    debug!(event_id = %row.event_id, "row missing odds/name, dropped");
                    continue;
                }
            };

        let odds = if scaled { odds / 1000.0 } else { odds };
        if odds < 1.0 {
            stats.dropped_bad_odds += 1;
            debug!(event_id = %row.event_id, odds, "odds below 1.0, dropped");
            continue;
        }
        let line = row.line.map(|l| if scaled { l / 1000.0 } else { l });

        let category = match &row.competition {
            Some(c) if women.contains(&c.as_str()) => Category::Women,
            _ => Category::Men,
        };

        let event_name = clean_text(event_name);
        let (team1, team2) = match event_name.split_once(profile.separator) {
            Some((t1, t2)) => (
                Some(t1.trim().to_string()),
                Some(t2.trim().to_string()),
            ),
            None => (None, None),
        };

        let market_label = clean_text(&row.market_label);
        let market_side_label = clean_opt(&row.market_english_label)
            .unwrap_or_else(|| market_label.clone());

        let quote = Quote {
            source,
            event_id: row.event_id.clone(),
            event_name,
            team1,
            team2,
            start_time: row.start_time,
            category,
            market_label,
            market_side_label,
            outcome_label: clean_text(outcome_label),
            outcome_english: clean_opt(&row.outcome_english_label),
            outcome_type: row.outcome_type.clone(),
            pick: row.outcome_sub_type.as_deref().map(map_pick),
            odds,
            line,
            subject: clean_opt(&row.participant),
        };

        if !seen.insert(dedup_key(&quote)) {
            stats.dropped_duplicate += 1;
            continue;
        }

        quotes.push(quote);
    }

    stats.kept = quotes.len();
    (quotes, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sport::SportProfile;
    use chrono::TimeZone;

    pub(crate) fn make_row(
        event: &str,
        market: &str,
        outcome: &str,
        odds: f64,
    ) -> RawQuoteRow {
        RawQuoteRow {
            event_id: "evt-1".into(),
            event_name: Some(event.into()),
            sport: "Voetbal".into(),
            competition: Some("Eredivisie".into()),
            market_label: market.into(),
            market_english_label: None,
            outcome_label: Some(outcome.into()),
            outcome_english_label: None,
            outcome_type: None,
            outcome_sub_type: None,
            odds: Some(odds),
            line: None,
            participant: None,
            start_time: Utc.with_ymd_and_hms(2025, 3, 1, 20, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_scaled_odds_rescale() {
        let profile = SportProfile::football();
        let mut row = make_row("Ajax vs PSV", "Draw No Bet", "1", 1850.0);
        row.sport = "FOOTBALL".into();
        row.line = Some(2500.0);
        let (quotes, _) = normalize(&[row], Source::Kambi, &profile);
        assert_eq!(quotes.len(), 1);
        assert!((quotes[0].odds - 1.85).abs() < 1e-9);
        assert_eq!(quotes[0].line, Some(2.5));
    }

    #[test]
    fn test_missing_odds_dropped_not_fatal() {
        let profile = SportProfile::football();
        let mut bad = make_row("Ajax vs PSV", "Draw No Bet", "1", 2.0);
        bad.odds = None;
        let good = make_row("Ajax vs PSV", "Draw No Bet", "2", 2.1);
        let (quotes, stats) = normalize(&[bad, good], Source::Toto, &profile);
        assert_eq!(quotes.len(), 1);
        assert_eq!(stats.dropped_missing_field, 1);
    }

    #[test]
    fn test_sub_unit_odds_dropped() {
        let profile = SportProfile::football();
        let row = make_row("Ajax vs PSV", "Draw No Bet", "1", 0.5);
        let (quotes, stats) = normalize(&[row], Source::Toto, &profile);
        assert!(quotes.is_empty());
        assert_eq!(stats.dropped_bad_odds, 1);
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let profile = SportProfile::football();
        let rows = vec![
            make_row("Ajax vs PSV", "Draw No Bet", "1", 2.0),
            make_row("Ajax vs PSV", "Draw No Bet", "1", 2.0),
        ];
        let (quotes, stats) = normalize(&rows, Source::Toto, &profile);
        assert_eq!(quotes.len(), 1);
        assert_eq!(stats.dropped_duplicate, 1);
    }

    #[test]
    fn test_diacritics_and_hyphens_cleaned() {
        let profile = SportProfile::football();
        let row = make_row("Union Saint-Gilloise vs Beşiktaş", "Draw No Bet", "1", 2.0);
        let (quotes, _) = normalize(&[row], Source::Toto, &profile);
        assert_eq!(quotes[0].event_name, "Union Saint Gilloise vs Besiktas");
        assert_eq!(quotes[0].team1.as_deref(), Some("Union Saint Gilloise"));
        assert_eq!(quotes[0].team2.as_deref(), Some("Besiktas"));
    }

    #[test]
    fn test_women_allow_list_tags_category() {
        let profile = SportProfile::football();
        let mut row = make_row("Ajax vs PSV", "Draw No Bet", "1", 2.0);
        row.competition = Some("Nederland Eredivisie Vrouwen".into());
        let (quotes, _) = normalize(&[row], Source::Toto, &profile);
        assert_eq!(quotes[0].category, Category::Women);
    }

    #[test]
    fn test_other_sport_filtered() {
        let profile = SportProfile::football();
        let mut row = make_row("Ajax vs PSV", "Draw No Bet", "1", 2.0);
        row.sport = "Tennis".into();
        let (quotes, stats) = normalize(&[row], Source::Toto, &profile);
        assert!(quotes.is_empty());
        assert_eq!(stats.dropped_other_sport, 1);
    }

    #[test]
    fn test_pick_codes_remapped() {
        let profile = SportProfile::football();
        let mut row = make_row("Ajax vs PSV", "Draw No Bet", "Ajax", 2.0);
        row.outcome_sub_type = Some("H".into());
        let (quotes, _) = normalize(&[row], Source::Toto, &profile);
        assert_eq!(quotes[0].pick.as_deref(), Some("1"));
    }
}
