use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four league tables the widget displays.
///
/// Assigned by the extractor from which tab the data came from, never read
/// out of the sheet itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ALeague,
    Development,
    ALeaguePrimes,
    DevelopmentPrimes,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 4] = [
        Category::ALeague,
        Category::Development,
        Category::ALeaguePrimes,
        Category::DevelopmentPrimes,
    ];

    /// Human-readable section title.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::ALeague => "A League",
            Category::Development => "Development League",
            Category::ALeaguePrimes => "A League Primes",
            Category::DevelopmentPrimes => "Development Primes",
        }
    }

    /// Default number of entries shown for this category.
    pub fn default_limit(&self) -> usize {
        match self {
            Category::ALeague | Category::Development => 10,
            Category::ALeaguePrimes | Category::DevelopmentPrimes => 5,
        }
    }

    /// Whether a tab name belongs to this category.
    ///
    /// Matching is case-insensitive substring matching against a small set of
    /// known name patterns. The prime tables share their league's name, so
    /// the league categories explicitly reject tabs mentioning primes.
    pub fn matches_tab(&self, tab_name: &str) -> bool {
        let name = tab_name.trim().to_lowercase();
        let is_prime = name.contains("prime");
        match self {
            Category::ALeague => !is_prime && (name.contains("a league") || name.contains("a-league")),
            Category::Development => {
                !is_prime && (name.contains("development") || name.contains("dev league"))
            }
            Category::ALeaguePrimes => {
                is_prime && (name.contains("a league") || name.contains("a-league"))
            }
            Category::DevelopmentPrimes => {
                is_prime && (name.contains("development") || name.contains("dev"))
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Bounds applied when deciding whether an extracted entry is usable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationLimits {
    /// Lowest score still considered valid.
    pub score_floor: f64,
    /// Highest accepted externally-supplied position. Zero means absent and
    /// is always accepted.
    pub rank_hint_max: i64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            score_floor: 0.0,
            rank_hint_max: 1000,
        }
    }
}

/// One ranked rider, built fresh from a single data row on every extraction
/// pass and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Rider name, joined from first/last columns or taken from a single
    /// name column. Always trimmed.
    pub name: String,
    /// Externally-supplied position from the sheet, 0 when absent.
    #[serde(default)]
    pub rank_hint: i64,
    /// Primary ranking metric.
    pub score: f64,
    /// Free-text club/team grouping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    /// Which table the entry belongs to.
    pub category: Category,
}

impl Entry {
    /// Check the entry invariants: non-empty name, finite score at or above
    /// the floor, and a rank hint that is either absent (0) or in bounds.
    pub fn is_valid(&self, limits: &ValidationLimits) -> bool {
        if self.name.trim().is_empty() {
            return false;
        }
        if !self.score.is_finite() || self.score < limits.score_floor {
            return false;
        }
        self.rank_hint == 0 || (1..=limits.rank_hint_max).contains(&self.rank_hint)
    }
}

/// The complete output of one refresh cycle: four ordered, truncated entry
/// lists plus the time the set was computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub a_league: Vec<Entry>,
    pub development: Vec<Entry>,
    pub a_league_primes: Vec<Entry>,
    pub development_primes: Vec<Entry>,
    pub computed_at: DateTime<Utc>,
}

impl ResultSet {
    /// Create an empty result set stamped with the given time.
    pub fn new(computed_at: DateTime<Utc>) -> Self {
        Self {
            a_league: Vec::new(),
            development: Vec::new(),
            a_league_primes: Vec::new(),
            development_primes: Vec::new(),
            computed_at,
        }
    }

    /// Get the entries for a category.
    pub fn category(&self, category: Category) -> &[Entry] {
        match category {
            Category::ALeague => &self.a_league,
            Category::Development => &self.development,
            Category::ALeaguePrimes => &self.a_league_primes,
            Category::DevelopmentPrimes => &self.development_primes,
        }
    }

    /// Replace the entries for a category.
    pub fn set_category(&mut self, category: Category, entries: Vec<Entry>) {
        match category {
            Category::ALeague => self.a_league = entries,
            Category::Development => self.development = entries,
            Category::ALeaguePrimes => self.a_league_primes = entries,
            Category::DevelopmentPrimes => self.development_primes = entries,
        }
    }

    /// True when no category holds any entries.
    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.category(*c).is_empty())
    }

    /// Total number of entries across all categories.
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.category(*c).len()).sum()
    }
}
