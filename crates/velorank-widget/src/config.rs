use std::time::Duration;

use velorank_core::{Category, ValidationLimits};
use velorank_source::{default_tabs, TabConfig};

/// Default published sharing link of the league sheet.
pub const DEFAULT_SOURCE_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vS2Bi0VWUtBxL7yQ27ctm5CQlky2rRAlZzxhKI0M0G-oDUnHnaA-fdQjmEdRF5wbbycP5bJHWL_-POp/pubhtml";

/// How many entries each category shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryLimits {
    pub a_league: usize,
    pub development: usize,
    pub a_league_primes: usize,
    pub development_primes: usize,
}

impl Default for CategoryLimits {
    fn default() -> Self {
        Self {
            a_league: Category::ALeague.default_limit(),
            development: Category::Development.default_limit(),
            a_league_primes: Category::ALeaguePrimes.default_limit(),
            development_primes: Category::DevelopmentPrimes.default_limit(),
        }
    }
}

impl CategoryLimits {
    pub fn for_category(&self, category: Category) -> usize {
        match category {
            Category::ALeague => self.a_league,
            Category::Development => self.development,
            Category::ALeaguePrimes => self.a_league_primes,
            Category::DevelopmentPrimes => self.development_primes,
        }
    }
}

/// Widget configuration. Every field has a deployment default.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    /// Shareable URL of the source spreadsheet.
    pub source_url: String,
    /// The tabs to fetch each refresh.
    pub tabs: Vec<TabConfig>,
    /// Automatic refresh period.
    pub refresh_interval: Duration,
    /// Whether to keep a fallback copy of the last good result set.
    pub cache_enabled: bool,
    /// How long a cached result set stays servable.
    pub cache_ttl: Duration,
    /// Per-category top-N limits.
    pub limits: CategoryLimits,
    /// Bounded wait per tab fetch.
    pub fetch_timeout: Duration,
    /// Settle time before a visibility/connectivity signal triggers a
    /// refresh, so a burst of signals causes one fetch.
    pub debounce: Duration,
    /// Period of the proactive cache sweep.
    pub sweep_interval: Duration,
    /// Entry invariant bounds.
    pub validation: ValidationLimits,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            tabs: default_tabs(),
            refresh_interval: Duration::from_millis(300_000),
            cache_enabled: true,
            cache_ttl: Duration::from_millis(600_000),
            limits: CategoryLimits::default(),
            fetch_timeout: Duration::from_millis(10_000),
            debounce: Duration::from_millis(1_500),
            sweep_interval: Duration::from_secs(60),
            validation: ValidationLimits::default(),
        }
    }
}
