use std::future::Future;
use std::time::Duration;

use futures::future::join_all;

use crate::error::SourceError;
use crate::url::SheetRef;

/// One named tab of the source spreadsheet and its export sub-identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabConfig {
    /// Display name, also used to match the tab to a category.
    pub name: String,
    /// The `gid` query parameter of the tab's CSV export.
    pub gid: String,
}

impl TabConfig {
    pub fn new(name: impl Into<String>, gid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gid: gid.into(),
        }
    }
}

/// The four tabs of the default deployment: two league tables and their
/// prime (bonus sprint) tables.
pub fn default_tabs() -> Vec<TabConfig> {
    vec![
        TabConfig::new("A League", "0"),
        TabConfig::new("Development League", "538648361"),
        TabConfig::new("A League Primes", "1268374159"),
        TabConfig::new("Development Primes", "907551972"),
    ]
}

/// Raw CSV text fetched for one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabText {
    pub name: String,
    pub raw: String,
}

/// Source of tab text for the pipeline. The orchestrator is generic over
/// this so tests can drive it without a network.
pub trait TabFetch {
    /// Fetch every tab that can be fetched. Individual failures are
    /// absorbed; an error is returned only when nothing succeeded.
    fn fetch_all_tabs(
        &self,
        tabs: &[TabConfig],
    ) -> impl Future<Output = Result<Vec<TabText>, SourceError>> + Send;
}

/// Fetches published-spreadsheet tabs as CSV over HTTP with a bounded wait
/// per request. Does nothing besides network I/O.
#[derive(Debug, Clone)]
pub struct SheetSource {
    sheet: SheetRef,
    client: reqwest::Client,
}

impl SheetSource {
    /// Build a source for `sheet` whose requests give up after `timeout`.
    pub fn new(sheet: SheetRef, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;
        Ok(Self { sheet, client })
    }

    /// Fetch one tab's CSV text.
    pub async fn fetch_tab(&self, tab: &TabConfig) -> Result<String, SourceError> {
        let url = self.sheet.csv_url(&tab.gid);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| classify(&tab.name, e))?;
        response.text().await.map_err(|e| classify(&tab.name, e))
    }

    /// Fetch all tabs concurrently. Per-tab failures are logged and skipped;
    /// results keep the order of `tabs`, so completion order never matters.
    pub async fn fetch_all(&self, tabs: &[TabConfig]) -> Result<Vec<TabText>, SourceError> {
        let fetches = tabs.iter().map(|tab| async move {
            let outcome = self.fetch_tab(tab).await;
            (tab.name.clone(), outcome)
        });

        let mut fetched = Vec::new();
        for (name, outcome) in join_all(fetches).await {
            match outcome {
                Ok(raw) => fetched.push(TabText { name, raw }),
                Err(err) => {
                    tracing::warn!(tab = %name, error = %err, "tab fetch failed, skipping");
                }
            }
        }

        if fetched.is_empty() {
            return Err(SourceError::NoData);
        }
        Ok(fetched)
    }
}

fn classify(tab: &str, err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::Timeout {
            tab: tab.to_string(),
        }
    } else {
        SourceError::Transport {
            tab: tab.to_string(),
            reason: err.to_string(),
        }
    }
}

impl TabFetch for SheetSource {
    fn fetch_all_tabs(
        &self,
        tabs: &[TabConfig],
    ) -> impl Future<Output = Result<Vec<TabText>, SourceError>> + Send {
        self.fetch_all(tabs)
    }
}
