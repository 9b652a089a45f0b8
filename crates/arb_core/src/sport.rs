//! Sport profiles: the per-sport, per-source vocabulary the generic
//! pipeline is parameterized by.
//!
//! A profile bundles the source-specific sport tags, market-kind
//! allow-lists, women's-competition allow-lists and the family rule
//! tables. Rule patterns are matched case-insensitively against cleaned
//! labels, so they are written in lowercase here.

use common::Source;

use crate::classify::{is_inclusive_bound, MarketFamily};
use crate::normalize::Quote;

/// How a rule resolves which participant a market is scoped to.
#[derive(Debug, Clone, Copy)]
pub enum SidePolicy {
    /// Market covers both participants.
    Combined,
    /// Look for a literal team name in the (English) market label.
    TeamInMarket,
    /// Look for a literal team name in the outcome label.
    TeamInOutcome,
    /// Player market: subject from the participant field, else the market
    /// label prefix before the first marker.
    Subject {
        strip_markers: &'static [&'static str],
    },
}

/// One ordered classification rule. All patterns are lowercase
/// substrings; `all_of` must all hit, `any_of` (when non-empty) needs one
/// hit, `none_of` must all miss.
#[derive(Debug, Clone, Copy)]
pub struct MarketRule {
    pub kind: &'static str,
    pub any_of: &'static [&'static str],
    pub all_of: &'static [&'static str],
    pub none_of: &'static [&'static str],
    pub side: SidePolicy,
    /// Parse the line from the outcome label when no structured line or
    /// "Over/Under N" market suffix exists.
    pub line_from_outcome: bool,
    /// Matching quotes are classification misses (combo markets).
    pub exclude: bool,
}

impl MarketRule {
    pub fn matches(&self, market_label: &str) -> bool {
        let label = market_label.to_lowercase();
        if !self.all_of.iter().all(|p| label.contains(p)) {
            return false;
        }
        if !self.any_of.is_empty() && !self.any_of.iter().any(|p| label.contains(p)) {
            return false;
        }
        self.none_of.iter().all(|p| !label.contains(p))
    }
}

const fn rule(kind: &'static str, all_of: &'static [&'static str], side: SidePolicy) -> MarketRule {
    MarketRule {
        kind,
        any_of: &[],
        all_of,
        none_of: &[],
        side,
        line_from_outcome: false,
        exclude: false,
    }
}

/// Combo markets ("Dubbele Kans en ...") cannot be aligned leg-for-leg
/// and are excluded up front.
const EXCLUDE_COMBOS: MarketRule = MarketRule {
    kind: "combo",
    any_of: &["dubbele kans", " en ", " & "],
    all_of: &[],
    none_of: &[],
    side: SidePolicy::Combined,
    line_from_outcome: false,
    exclude: true,
};

/// Family selection predicate, applied before the rule table.
#[derive(Debug, Clone, Copy)]
pub struct Selector {
    pub market_any: &'static [&'static str],
    pub outcome_any: &'static [&'static str],
    pub outcome_type_any: &'static [&'static str],
    /// Also select inclusive "N of meer" / "N+" outcomes.
    pub inclusive_outcomes: bool,
}

const EMPTY_SELECTOR: Selector = Selector {
    market_any: &[],
    outcome_any: &[],
    outcome_type_any: &[],
    inclusive_outcomes: false,
};

impl Selector {
    pub fn selects(&self, q: &Quote) -> bool {
        let market = q.market_label.to_lowercase();
        if self.market_any.iter().any(|p| market.contains(p)) {
            return true;
        }
        let outcome = q.outcome_label.to_lowercase();
        let english = q.outcome_english.as_deref().map(str::to_lowercase);
        let outcome_hit = self.outcome_any.iter().any(|p| {
            outcome.contains(p) || english.as_deref().is_some_and(|e| e.contains(p))
        });
        if outcome_hit {
            return true;
        }
        if let Some(t) = q.outcome_type.as_deref() {
            let t = t.to_lowercase();
            if self.outcome_type_any.iter().any(|p| t.contains(p)) {
                return true;
            }
        }
        self.inclusive_outcomes && is_inclusive_bound(&q.outcome_label)
    }
}

/// One market family's selectors and rule tables, per source.
#[derive(Debug, Clone)]
pub struct FamilySpec {
    pub family: MarketFamily,
    pub selector_toto: Selector,
    pub selector_kambi: Selector,
    pub rules_toto: &'static [MarketRule],
    pub rules_kambi: &'static [MarketRule],
}

impl FamilySpec {
    pub fn selector(&self, source: Source) -> &Selector {
        match source {
            Source::Toto => &self.selector_toto,
            Source::Kambi => &self.selector_kambi,
        }
    }

    pub fn rules(&self, source: Source) -> &'static [MarketRule] {
        match source {
            Source::Toto => self.rules_toto,
            Source::Kambi => self.rules_kambi,
        }
    }
}

/// Everything the pipeline needs to know about one sport.
#[derive(Debug, Clone)]
pub struct SportProfile {
    pub name: &'static str,
    pub sport_tag_toto: &'static str,
    pub sport_tag_kambi: &'static str,
    /// Event-name separator between the two participants.
    pub separator: &'static str,
    /// Market-kind codes admitted per source; empty admits all.
    pub kind_allow_toto: &'static [&'static str],
    pub kind_allow_kambi: &'static [&'static str],
    pub women_competitions_toto: &'static [&'static str],
    pub women_competitions_kambi: &'static [&'static str],
    pub families: Vec<FamilySpec>,
}

impl SportProfile {
    pub fn sport_tag(&self, source: Source) -> &'static str {
        match source {
            Source::Toto => self.sport_tag_toto,
            Source::Kambi => self.sport_tag_kambi,
        }
    }

    pub fn kind_allow(&self, source: Source) -> &'static [&'static str] {
        match source {
            Source::Toto => self.kind_allow_toto,
            Source::Kambi => self.kind_allow_kambi,
        }
    }

    pub fn women_competitions(&self, source: Source) -> &'static [&'static str] {
        match source {
            Source::Toto => self.women_competitions_toto,
            Source::Kambi => self.women_competitions_kambi,
        }
    }
}

// ── Football ──────────────────────────────────────────────────────────

static FOOTBALL_WINNER_RULES: &[MarketRule] = &[rule(
    "draw no bet",
    &["draw no bet"],
    SidePolicy::Combined,
)];

static FOOTBALL_OVERUNDER_TOTO: &[MarketRule] = &[
    EXCLUDE_COMBOS,
    MarketRule {
        kind: "goals",
        any_of: &["goals", "doelpunten"],
        all_of: &[],
        none_of: &["resultaat", "doelpuntenmaker"],
        side: SidePolicy::TeamInMarket,
        line_from_outcome: false,
        exclude: false,
    },
    rule(
        "match shots on target",
        &["wedstrijd schoten op doel"],
        SidePolicy::Combined,
    ),
    MarketRule {
        kind: "team shots on target",
        any_of: &[],
        all_of: &["team schoten op doel"],
        none_of: &[],
        side: SidePolicy::TeamInOutcome,
        line_from_outcome: true,
        exclude: false,
    },
    MarketRule {
        kind: "player shots on target",
        any_of: &["aantal schoten op doel", "speler schoten op doel"],
        all_of: &[],
        none_of: &[],
        side: SidePolicy::Subject {
            strip_markers: &["aantal schoten"],
        },
        line_from_outcome: true,
        exclude: false,
    },
    MarketRule {
        kind: "player shots",
        any_of: &["aantal schoten", "speler schoten"],
        all_of: &[],
        none_of: &[],
        side: SidePolicy::Subject {
            strip_markers: &["aantal schoten"],
        },
        line_from_outcome: true,
        exclude: false,
    },
];

static FOOTBALL_OVERUNDER_KAMBI: &[MarketRule] = &[
    EXCLUDE_COMBOS,
    MarketRule {
        kind: "goals",
        any_of: &[],
        all_of: &["doelpunten"],
        none_of: &["resultaat", "doelpuntenmaker"],
        side: SidePolicy::TeamInMarket,
        line_from_outcome: false,
        exclude: false,
    },
    rule(
        "team shots on target",
        &["totaal aantal schoten op doel door"],
        SidePolicy::TeamInMarket,
    ),
    rule(
        "match shots on target",
        &["totaal aantal schoten op doel"],
        SidePolicy::TeamInMarket,
    ),
    rule(
        "team shots",
        &["totaal aantal schoten door"],
        SidePolicy::TeamInMarket,
    ),
    rule(
        "match shots",
        &["totaal aantal schoten"],
        SidePolicy::TeamInMarket,
    ),
    rule(
        "player shots on target",
        &["schoten van speler op doel"],
        SidePolicy::Subject { strip_markers: &[] },
    ),
    rule(
        "player shots",
        &["schoten van speler"],
        SidePolicy::Subject { strip_markers: &[] },
    ),
];

impl SportProfile {
    /// Football: winner (draw no bet) and over/under families.
    pub fn football() -> Self {
        SportProfile {
            name: "football",
            sport_tag_toto: "Voetbal",
            sport_tag_kambi: "FOOTBALL",
            separator: " vs ",
            kind_allow_toto: &[],
            kind_allow_kambi: &[],
            women_competitions_toto: &[
                "Nederland Eredivisie Vrouwen",
                "UEFA Womens Champions League",
            ],
            women_competitions_kambi: &[
                "Eredivisie Vrouwen",
                "Champions League Vrouwen",
            ],
            families: vec![
                FamilySpec {
                    family: MarketFamily::MatchWinner,
                    selector_toto: Selector {
                        market_any: &["draw no bet"],
                        ..EMPTY_SELECTOR
                    },
                    selector_kambi: Selector {
                        market_any: &["draw no bet"],
                        ..EMPTY_SELECTOR
                    },
                    rules_toto: FOOTBALL_WINNER_RULES,
                    rules_kambi: FOOTBALL_WINNER_RULES,
                },
                FamilySpec {
                    family: MarketFamily::OverUnder,
                    selector_toto: Selector {
                        outcome_any: &["over", "under"],
                        inclusive_outcomes: true,
                        ..EMPTY_SELECTOR
                    },
                    selector_kambi: Selector {
                        outcome_any: &["over", "under"],
                        ..EMPTY_SELECTOR
                    },
                    rules_toto: FOOTBALL_OVERUNDER_TOTO,
                    rules_kambi: FOOTBALL_OVERUNDER_KAMBI,
                },
            ],
        }
    }
}

// ── Tennis ────────────────────────────────────────────────────────────

static TENNIS_WINNER_RULES: &[MarketRule] = &[MarketRule {
    kind: "match odds",
    any_of: &["wedstrijdnotering", "wedstrijd"],
    all_of: &[],
    none_of: &[],
    side: SidePolicy::Combined,
    line_from_outcome: false,
    exclude: false,
}];

static TENNIS_OVERUNDER_RULES: &[MarketRule] = &[
    MarketRule {
        kind: "sets",
        any_of: &[],
        all_of: &["sets"],
        none_of: &["games"],
        side: SidePolicy::TeamInMarket,
        line_from_outcome: false,
        exclude: false,
    },
    rule("games in set", &["games", "set"], SidePolicy::TeamInMarket),
    rule("games", &["games"], SidePolicy::TeamInMarket),
    rule("points", &["punten"], SidePolicy::TeamInMarket),
];

static TENNIS_YESNO_RULES: &[MarketRule] = &[MarketRule {
    kind: "set win",
    any_of: &["wint minstens een set", "wint een set"],
    all_of: &[],
    none_of: &[],
    side: SidePolicy::TeamInMarket,
    line_from_outcome: false,
    exclude: false,
}];

impl SportProfile {
    /// Tennis: winner, over/under (sets/games/points) and yes/no
    /// (wins-a-set) families. Both catalogs carry many exotic tennis
    /// offers, so raw rows are pre-filtered to a market-kind allow-list.
    pub fn tennis() -> Self {
        SportProfile {
            name: "tennis",
            sport_tag_toto: "Tennis",
            sport_tag_kambi: "TENNIS",
            separator: " vs ",
            kind_allow_toto: &[
                "Match",
                "Odd/Even",
                "Player Occurrence Line",
                "Asian Over/Under",
                "Over/Under",
                "Handicap",
                "Asian Handicap",
                "Yes/No",
                "Head to Head",
            ],
            kind_allow_kambi: &[],
            women_competitions_toto: &["WTA"],
            women_competitions_kambi: &["WTA"],
            families: vec![
                FamilySpec {
                    family: MarketFamily::MatchWinner,
                    selector_toto: Selector {
                        market_any: &["wedstrijd"],
                        ..EMPTY_SELECTOR
                    },
                    selector_kambi: Selector {
                        market_any: &["wedstrijdnotering"],
                        ..EMPTY_SELECTOR
                    },
                    rules_toto: TENNIS_WINNER_RULES,
                    rules_kambi: TENNIS_WINNER_RULES,
                },
                FamilySpec {
                    family: MarketFamily::OverUnder,
                    selector_toto: Selector {
                        outcome_any: &["over", "under"],
                        ..EMPTY_SELECTOR
                    },
                    selector_kambi: Selector {
                        outcome_type_any: &["over"],
                        ..EMPTY_SELECTOR
                    },
                    rules_toto: TENNIS_OVERUNDER_RULES,
                    rules_kambi: TENNIS_OVERUNDER_RULES,
                },
                FamilySpec {
                    family: MarketFamily::YesNo,
                    selector_toto: Selector {
                        outcome_any: &["ja", "nee"],
                        ..EMPTY_SELECTOR
                    },
                    selector_kambi: Selector {
                        outcome_type_any: &["ja/nee"],
                        ..EMPTY_SELECTOR
                    },
                    rules_toto: TENNIS_YESNO_RULES,
                    rules_kambi: TENNIS_YESNO_RULES,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order_resolves_most_specific_first() {
        let label = "Totaal Aantal Schoten op Doel door Ajax";
        let rule = FOOTBALL_OVERUNDER_KAMBI
            .iter()
            .find(|r| r.matches(label))
            .unwrap();
        assert_eq!(rule.kind, "team shots on target");

        let label = "Totaal Aantal Schoten op Doel";
        let rule = FOOTBALL_OVERUNDER_KAMBI
            .iter()
            .find(|r| r.matches(label))
            .unwrap();
        assert_eq!(rule.kind, "match shots on target");
    }

    #[test]
    fn test_combo_markets_excluded() {
        let rule = FOOTBALL_OVERUNDER_KAMBI
            .iter()
            .find(|r| r.matches("Dubbele Kans & Over/Under"))
            .unwrap();
        assert!(rule.exclude);
    }

    #[test]
    fn test_tennis_rules_distinguish_games_in_set() {
        let rule = TENNIS_OVERUNDER_RULES
            .iter()
            .find(|r| r.matches("Totaal Aantal Games in Set 2"))
            .unwrap();
        assert_eq!(rule.kind, "games in set");

        let rule = TENNIS_OVERUNDER_RULES
            .iter()
            .find(|r| r.matches("Totaal Aantal Games"))
            .unwrap();
        assert_eq!(rule.kind, "games");

        let rule = TENNIS_OVERUNDER_RULES
            .iter()
            .find(|r| r.matches("Totaal Aantal Sets"))
            .unwrap();
        assert_eq!(rule.kind, "sets");
    }

    #[test]
    fn test_profiles_expose_expected_families() {
        let football = SportProfile::football();
        assert_eq!(football.families.len(), 2);
        let tennis = SportProfile::tennis();
        assert_eq!(tennis.families.len(), 3);
        assert!(tennis
            .families
            .iter()
            .any(|f| f.family == MarketFamily::YesNo));
    }
}
