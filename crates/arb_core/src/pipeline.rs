//! One-shot pipeline over a pair of raw snapshots.
//!
//! Each market family runs independently: classify both sides, match
//! events at the family's threshold, align outcomes, evaluate. The
//! family tables are then stacked into one combined, deterministically
//! ordered result.

use common::{RawQuoteRow, Source};
use tracing::info;

use crate::align::align;
use crate::classify::{classify, MarketFamily};
use crate::config::EngineConfig;
use crate::evaluate::{evaluate, Opportunity};
use crate::events::{distinct_events, match_events};
use crate::normalize::{normalize, NormalizeStats};
use crate::sport::SportProfile;

/// Per-run accounting, logged at the end of each sport pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats {
    pub toto: NormalizeStats,
    pub kambi: NormalizeStats,
    pub event_matches: usize,
    pub classify_misses: usize,
    pub aligned_pairs: usize,
    pub opportunities: usize,
    pub arbitrages: usize,
}

/// Opportunities for one market family.
#[derive(Debug, Clone)]
pub struct FamilyTable {
    pub family: MarketFamily,
    pub opportunities: Vec<Opportunity>,
}

/// Result of one sport pass.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub sport: &'static str,
    pub families: Vec<FamilyTable>,
    /// All family tables stacked, best profit ratio first.
    pub opportunities: Vec<Opportunity>,
    pub stats: RunStats,
}

/// Run the full pipeline for one sport over two raw snapshots.
pub fn run(
    rows_toto: &[RawQuoteRow],
    rows_kambi: &[RawQuoteRow],
    profile: &SportProfile,
    config: &EngineConfig,
) -> RunResult {
    let (quotes_toto, stats_toto) = normalize(rows_toto, Source::Toto, profile);
    let (quotes_kambi, stats_kambi) = normalize(rows_kambi, Source::Kambi, profile);
    let mut stats = RunStats {
        toto: stats_toto,
        kambi: stats_kambi,
        ..Default::default()
    };

    let mut families = Vec::new();
    for spec in &profile.families {
        let (tagged_toto, misses_toto) = classify(&quotes_toto, spec);
        let (tagged_kambi, misses_kambi) = classify(&quotes_kambi, spec);
        stats.classify_misses += misses_toto + misses_kambi;

        let events_toto: Vec<_> = tagged_toto.iter().map(|t| t.quote.clone()).collect();
        let events_kambi: Vec<_> = tagged_kambi.iter().map(|t| t.quote.clone()).collect();
        let matches = match_events(
            &distinct_events(&events_toto),
            &distinct_events(&events_kambi),
            config.team_threshold(spec.family),
        );
        stats.event_matches += matches.len();

        let pairs = align(tagged_toto, tagged_kambi, &matches, config.subject_threshold);
        stats.aligned_pairs += pairs.len();

        let opportunities: Vec<Opportunity> = pairs
            .iter()
            .map(|p| evaluate(p, config.bankroll, profile.name))
            .collect();

        info!(
            sport = profile.name,
            family = %spec.family,
            matches = matches.len(),
            pairs = pairs.len(),
            opportunities = opportunities.len(),
            "family pass complete"
        );

        families.push(FamilyTable {
            family: spec.family,
            opportunities,
        });
    }

    let mut combined: Vec<Opportunity> = families
        .iter()
        .flat_map(|f| f.opportunities.iter().cloned())
        .collect();
    combined.sort_by(|a, b| {
        b.profit_ratio
            .partial_cmp(&a.profit_ratio)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.event_a.cmp(&b.event_a))
            .then_with(|| a.market.cmp(&b.market))
    });

    stats.opportunities = combined.len();
    stats.arbitrages = combined.iter().filter(|o| o.is_arbitrage).count();

    info!(
        sport = profile.name,
        opportunities = stats.opportunities,
        arbitrages = stats.arbitrages,
        "sport pass complete"
    );

    RunResult {
        sport: profile.name,
        families,
        opportunities: combined,
        stats,
    }
}
