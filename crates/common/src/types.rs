//! Raw snapshot row shapes shared between the store and the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bookmaker source identifier.
///
/// Toto publishes decimal odds directly; Kambi encodes odds and lines as
/// integers scaled by 1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Toto,
    Kambi,
}

impl Source {
    /// Snapshot file prefix for this source.
    pub fn prefix(&self) -> &'static str {
        match self {
            Source::Toto => "toto",
            Source::Kambi => "kambi",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Competition category, derived from a women's-competition allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Men,
    Women,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Men => f.write_str("M"),
            Category::Women => f.write_str("W"),
        }
    }
}

/// One raw priced outcome as scraped from a bookmaker catalog.
///
/// This is the pre-filter shape both snapshot feeds deliver; the engine's
/// normalizer turns it into a `Quote` or drops it. Field names differ per
/// source upstream (Toto's "Market Name" vs Kambi's "criterion_label"); the
/// scrape collaborators map both into this one schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawQuoteRow {
    /// Source-local event identifier.
    pub event_id: String,

    /// Free-text "Team1 vs Team2" event name.
    pub event_name: Option<String>,

    /// Sport tag as the source spells it ("Voetbal" vs "FOOTBALL").
    pub sport: String,

    /// Competition / group name, used for the women's allow-list.
    #[serde(default)]
    pub competition: Option<String>,

    /// Market label ("Market Name" / "criterion_label").
    pub market_label: String,

    /// English market label when the source provides one
    /// (Kambi's "criterion_english_label"); used for side detection.
    #[serde(default)]
    pub market_english_label: Option<String>,

    /// Outcome label ("Outcome Name" / "outcome_label").
    pub outcome_label: Option<String>,

    /// English outcome label when available ("outcome_english_label").
    #[serde(default)]
    pub outcome_english_label: Option<String>,

    /// Market-kind code ("Outcome Type" / "bet_offer_type_english_name").
    #[serde(default)]
    pub outcome_type: Option<String>,

    /// Outcome sub-type code (Toto's "H"/"A"/"1"/"2"/"X").
    #[serde(default)]
    pub outcome_sub_type: Option<String>,

    /// Decimal odds; Kambi delivers these scaled by 1000.
    pub odds: Option<f64>,

    /// Over/under threshold; Kambi delivers these scaled by 1000.
    #[serde(default)]
    pub line: Option<f64>,

    /// Player/participant the proposition is about, when the source
    /// exposes it as a structured field.
    #[serde(default)]
    pub participant: Option<String>,

    /// Scheduled kickoff / first serve.
    pub start_time: DateTime<Utc>,
}
