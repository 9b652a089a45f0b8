//! Market classification: label text in, structured market tags out.
//!
//! Classification is an ordered rule table per source, first match wins.
//! A quote whose label matches no rule (or an exclusion rule) is a
//! classification miss, counted but otherwise silent.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::normalize::Quote;
use crate::sport::{FamilySpec, MarketRule, SidePolicy};

/// Broad market family; alignment keys and thresholds are per-family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketFamily {
    MatchWinner,
    OverUnder,
    YesNo,
    Other,
}

impl std::fmt::Display for MarketFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MarketFamily::MatchWinner => "winner",
            MarketFamily::OverUnder => "over/under",
            MarketFamily::YesNo => "yes/no",
            MarketFamily::Other => "other",
        };
        f.write_str(s)
    }
}

impl MarketFamily {
    /// Filesystem-safe label, used in per-family export names.
    pub fn slug(self) -> &'static str {
        match self {
            MarketFamily::MatchWinner => "winner",
            MarketFamily::OverUnder => "over-under",
            MarketFamily::YesNo => "yes-no",
            MarketFamily::Other => "other",
        }
    }
}

/// Scope of a market within the event timeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    FullTime,
    FirstHalf,
    SecondHalf,
    Set(u8),
    /// Explicit clock window, canonical form "00:00 09:59".
    Window(String),
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timeframe::FullTime => f.write_str("Full Time"),
            Timeframe::FirstHalf => f.write_str("1e Helft"),
            Timeframe::SecondHalf => f.write_str("2e Helft"),
            Timeframe::Set(n) => write!(f, "Set {}", n),
            Timeframe::Window(w) => f.write_str(w),
        }
    }
}

/// Which participant a market is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Team1,
    Team2,
    Combined,
    Player,
}

/// Structured classification of one quote's market.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketTag {
    pub family: MarketFamily,
    /// Canonical market-kind name from the rule table ("goals",
    /// "player shots on target", ...). Alignment joins on it literally.
    pub kind: &'static str,
    pub timeframe: Timeframe,
    pub side: Side,
    /// Player name for player-scoped markets.
    pub subject: Option<String>,
}

/// A quote plus its tag, resolved line and canonical outcome label.
#[derive(Debug, Clone)]
pub struct TaggedQuote {
    pub quote: Quote,
    pub tag: MarketTag,
    /// Half-point threshold; inclusive "N of meer"/"N+" phrasings are
    /// already shifted down by 0.5 here.
    pub line: Option<f64>,
    /// Canonical outcome label used for the opposite-side comparison.
    pub outcome: String,
}

impl TaggedQuote {
    /// Line in integer milli-units, usable as a hash/join key.
    pub fn line_milli(&self) -> Option<i64> {
        self.line.map(|l| (l * 1000.0).round() as i64)
    }
}

// ── Label parsing ─────────────────────────────────────────────────────

fn window_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d{1,2}:\d{2} \d{1,2}:\d{2}\b").unwrap())
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(\.\d+)?").unwrap())
}

fn inclusive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(\.\d+)?\+|\b\d{1,2} of meer\b").unwrap())
}

/// Timeframe from a market label. Halves and fixed windows for football,
/// numbered sets for tennis; everything else is full time.
pub fn parse_timeframe(label: &str) -> Timeframe {
    let lower = label.to_lowercase();
    if lower.contains("1e helft") {
        return Timeframe::FirstHalf;
    }
    if lower.contains("2e helft") {
        return Timeframe::SecondHalf;
    }
    if lower.contains("eerste 10 minuten") {
        return Timeframe::Window("00:00 09:59".to_string());
    }
    if let Some(m) = window_re().find(label) {
        return Timeframe::Window(m.as_str().to_string());
    }
    for n in 1..=5u8 {
        if lower.contains(&format!("set {}", n)) {
            return Timeframe::Set(n);
        }
    }
    Timeframe::FullTime
}

/// True when the outcome is phrased as an inclusive lower bound
/// ("3 of meer", "2+") rather than a strict over.
pub fn is_inclusive_bound(outcome: &str) -> bool {
    inclusive_re().is_match(outcome)
}

fn first_number(s: &str) -> Option<f64> {
    number_re().find(s).and_then(|m| m.as_str().parse().ok())
}

/// Resolve the over/under threshold for one quote: the structured line
/// field first, then an "Over/Under N" market suffix, then a number in the
/// outcome label (shifted down 0.5 for inclusive phrasings).
fn resolve_line(q: &Quote, rule: &MarketRule) -> Option<f64> {
    if let Some(l) = q.line {
        return Some(l);
    }
    if let Some(rest) = q.market_label.split("Over/Under ").nth(1) {
        if let Some(v) = first_number(rest) {
            return Some(v);
        }
    }
    if rule.line_from_outcome {
        if let Some(v) = first_number(&q.outcome_label) {
            return if is_inclusive_bound(&q.outcome_label) {
                Some(v - 0.5)
            } else {
                Some(v)
            };
        }
    }
    None
}

fn resolve_side(q: &Quote, rule: &MarketRule) -> (Side, Option<String>) {
    let team_side = |haystack: &str| {
        if q.team1.as_deref().is_some_and(|t| haystack.contains(t)) {
            Side::Team1
        } else if q.team2.as_deref().is_some_and(|t| haystack.contains(t)) {
            Side::Team2
        } else {
            Side::Combined
        }
    };
    match rule.side {
        SidePolicy::Combined => (Side::Combined, None),
        SidePolicy::TeamInMarket => (team_side(&q.market_side_label), None),
        SidePolicy::TeamInOutcome => (team_side(&q.outcome_label), None),
        SidePolicy::Subject { strip_markers } => {
            let subject = q.subject.clone().or_else(|| {
                let lower = q.market_label.to_lowercase();
                strip_markers.iter().find_map(|marker| {
                    let idx = lower.find(marker)?;
                    // Lowercasing can shift byte offsets for non-ASCII
                    // labels; fall back to the whole label if it does.
                    let prefix = q.market_label.get(..idx).unwrap_or(&q.market_label);
                    Some(prefix.trim().to_string())
                })
            });
            (Side::Player, subject)
        }
    }
}

fn canonical_outcome(q: &Quote, family: MarketFamily) -> String {
    match family {
        MarketFamily::MatchWinner => q
            .pick
            .clone()
            .unwrap_or_else(|| q.outcome_label.clone()),
        MarketFamily::OverUnder => {
            if is_inclusive_bound(&q.outcome_label) {
                return "Over".to_string();
            }
            q.outcome_english
                .clone()
                .unwrap_or_else(|| q.outcome_label.clone())
        }
        MarketFamily::YesNo => {
            let label = q
                .outcome_english
                .as_deref()
                .unwrap_or(&q.outcome_label);
            match label {
                "Ja" => "Yes".to_string(),
                "Nee" => "No".to_string(),
                other => other.to_string(),
            }
        }
        MarketFamily::Other => q.outcome_label.clone(),
    }
}

// ── Classification pass ───────────────────────────────────────────────

/// Classify one source's quotes against a family's selector and rule
/// table. Returns the tagged survivors and the miss count.
pub fn classify(quotes: &[Quote], spec: &FamilySpec) -> (Vec<TaggedQuote>, usize) {
    let mut tagged = Vec::new();
    let mut misses = 0usize;

    for q in quotes {
        let selector = spec.selector(q.source);
        if !selector.selects(q) {
            continue;
        }

        let rule = spec
            .rules(q.source)
            .iter()
            .find(|r| r.matches(&q.market_label));
        let rule = match rule {
            Some(r) if !r.exclude => r,
            _ => {
                misses += 1;
                continue;
            }
        };

        let timeframe = parse_timeframe(&q.market_label);
        let (side, subject) = resolve_side(q, rule);
        let line = resolve_line(q, rule);
        // An over/under quote without a resolvable line must not join on
        // "no line" against another lineless quote.
        if spec.family == MarketFamily::OverUnder && line.is_none() {
            misses += 1;
            continue;
        }
        let outcome = canonical_outcome(q, spec.family);

        tagged.push(TaggedQuote {
            quote: q.clone(),
            tag: MarketTag {
                family: spec.family,
                kind: rule.kind,
                timeframe,
                side,
                subject,
            },
            line,
            outcome,
        });
    }

    (tagged, misses)
}
