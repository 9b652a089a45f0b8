//! Configuration structs for the matching engine.

use serde::{Deserialize, Serialize};

/// Engine thresholds and stake sizing.
///
/// The per-family similarity thresholds are deliberately configuration, not
/// constants: the useful values depend on how heavily each catalog
/// abbreviates names and should be tuned against labeled data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Notional bankroll split across the two legs of an arbitrage.
    #[serde(default = "default_bankroll")]
    pub bankroll: f64,

    /// Per-team similarity threshold for the match-winner family, where
    /// abbreviation noise ("R. Madrid") is common.
    #[serde(default = "default_winner_threshold")]
    pub winner_team_threshold: f64,

    /// Per-team similarity threshold for the over/under family.
    #[serde(default = "default_overunder_threshold")]
    pub overunder_team_threshold: f64,

    /// Per-team similarity threshold for the yes/no family.
    #[serde(default = "default_yesno_threshold")]
    pub yesno_team_threshold: f64,

    /// Similarity threshold for reconciling player-subject strings within
    /// a time-matched candidate set.
    #[serde(default = "default_subject_threshold")]
    pub subject_threshold: f64,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_bankroll() -> f64 {
    1000.0
}
fn default_winner_threshold() -> f64 {
    65.0
}
fn default_overunder_threshold() -> f64 {
    90.0
}
fn default_yesno_threshold() -> f64 {
    90.0
}
fn default_subject_threshold() -> f64 {
    90.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bankroll: default_bankroll(),
            winner_team_threshold: default_winner_threshold(),
            overunder_team_threshold: default_overunder_threshold(),
            yesno_team_threshold: default_yesno_threshold(),
            subject_threshold: default_subject_threshold(),
        }
    }
}

impl EngineConfig {
    /// Team-similarity threshold for a market family.
    pub fn team_threshold(&self, family: crate::classify::MarketFamily) -> f64 {
        use crate::classify::MarketFamily;
        match family {
            MarketFamily::MatchWinner => self.winner_team_threshold,
            MarketFamily::OverUnder => self.overunder_team_threshold,
            MarketFamily::YesNo => self.yesno_team_threshold,
            MarketFamily::Other => self.overunder_team_threshold,
        }
    }
}
