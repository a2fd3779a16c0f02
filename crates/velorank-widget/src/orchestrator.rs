use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};

use velorank_cache::{KeyValueStore, ResultCache};
use velorank_core::{parse_rows, top_n, try_extract_category, Category, ExtractError, ResultSet};
use velorank_source::TabFetch;

use crate::config::WidgetConfig;
use crate::error::WidgetError;
use crate::presenter::Presenter;

/// Widget lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Idle,
    Loading,
    Rendered,
    Error,
}

/// External events the control loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The user pressed the retry/refresh affordance.
    Retry,
    /// The page became visible again after being hidden.
    VisibilityRegained,
    /// Network connectivity came back.
    NetworkOnline,
    /// Tear the widget down.
    Shutdown,
}

/// Wires source, parser, extractor, ranking, cache and presenter into the
/// load → fallback-to-cache → render → schedule-refresh loop.
///
/// Runs on a single logical task: refreshes never overlap (in-flight guard)
/// and a destroyed widget ignores further refreshes.
pub struct Orchestrator<F, S, P>
where
    F: TabFetch,
    S: KeyValueStore,
    P: Presenter,
{
    config: WidgetConfig,
    fetcher: F,
    cache: Option<ResultCache<S>>,
    presenter: Option<P>,
    state: WidgetState,
    in_flight: bool,
    destroyed: bool,
}

impl<F, S, P> Orchestrator<F, S, P>
where
    F: TabFetch,
    S: KeyValueStore,
    P: Presenter,
{
    pub fn new(
        config: WidgetConfig,
        fetcher: F,
        cache: Option<ResultCache<S>>,
        presenter: Option<P>,
    ) -> Self {
        Self {
            config,
            fetcher,
            cache,
            presenter,
            state: WidgetState::Idle,
            in_flight: false,
            destroyed: false,
        }
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn presenter(&self) -> Option<&P> {
        self.presenter.as_ref()
    }

    /// Bind to the display target and perform the first refresh. A missing
    /// target is a configuration error and propagates.
    pub async fn initialize(&mut self) -> Result<(), WidgetError> {
        if self.presenter.is_none() {
            return Err(WidgetError::MissingTarget);
        }
        tracing::info!("top riders widget initializing");
        self.refresh().await;
        Ok(())
    }

    /// One refresh cycle. A no-op while another refresh is in flight.
    pub async fn refresh(&mut self) {
        if self.destroyed {
            return;
        }
        if self.in_flight {
            tracing::debug!("refresh already in flight, ignoring");
            return;
        }

        self.in_flight = true;
        self.state = WidgetState::Loading;
        if let Some(p) = self.presenter.as_mut() {
            p.show_loading();
        }

        let outcome = self.run_pipeline().await;
        self.in_flight = false;

        match outcome {
            Ok(results) => self.render_fresh(results),
            Err(err) => self.fall_back(err),
        }
    }

    /// Live pipeline: fetch → parse → extract → rank → assemble.
    async fn run_pipeline(&self) -> Result<ResultSet, WidgetError> {
        let tabs = self.fetcher.fetch_all_tabs(&self.config.tabs).await?;
        let grids: Vec<(String, Vec<Vec<String>>)> = tabs
            .into_iter()
            .map(|tab| (tab.name, parse_rows(&tab.raw)))
            .collect();

        let mut results = ResultSet::new(Utc::now());
        let mut bad_structure = false;
        for category in Category::ALL {
            match try_extract_category(&grids, category, &self.config.validation) {
                Ok(entries) => {
                    let limit = self.config.limits.for_category(category);
                    results.set_category(category, top_n(&entries, limit, &self.config.validation));
                }
                Err(err) => {
                    if matches!(err, ExtractError::InvalidHeader(_)) {
                        bad_structure = true;
                    }
                    tracing::warn!(category = %category, error = %err, "category extraction failed");
                }
            }
        }

        if results.is_empty() {
            return Err(if bad_structure {
                WidgetError::InvalidStructure
            } else {
                WidgetError::NoData
            });
        }
        Ok(results)
    }

    fn render_fresh(&mut self, results: ResultSet) {
        let Some(presenter) = self.presenter.as_mut() else {
            return;
        };
        match presenter.show_results(&results) {
            Ok(()) => {
                self.state = WidgetState::Rendered;
                if let Some(cache) = &self.cache {
                    cache.set(&results);
                }
                tracing::info!(entries = results.len(), "standings rendered");
            }
            Err(err) => {
                // The data was fine, only display failed: no cache fallback
                // and no re-fetch, just a generic message.
                let err = WidgetError::Render(err.to_string());
                tracing::error!(error = %err, "render failure");
                self.state = WidgetState::Error;
                presenter.show_error(err.user_message());
            }
        }
    }

    /// The live pipeline failed: serve the cached result set when one is
    /// still fresh, otherwise surface a classified error with a retry
    /// affordance.
    fn fall_back(&mut self, err: WidgetError) {
        tracing::warn!(error = %err, "live refresh failed, trying cache");

        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get()) {
            if let Some(presenter) = self.presenter.as_mut() {
                match presenter.show_results(&cached) {
                    Ok(()) => {
                        self.state = WidgetState::Rendered;
                        tracing::info!("served cached standings");
                    }
                    Err(render_err) => {
                        let render_err = WidgetError::Render(render_err.to_string());
                        self.state = WidgetState::Error;
                        presenter.show_error(render_err.user_message());
                    }
                }
                return;
            }
        }

        self.state = WidgetState::Error;
        if let Some(presenter) = self.presenter.as_mut() {
            presenter.show_error(err.user_message());
        }
    }

    /// Drive the widget until shutdown: auto-refresh on a timer, proactive
    /// cache sweeps, and debounced reactive refreshes on visibility and
    /// connectivity signals.
    pub async fn run(mut self, mut signals: mpsc::Receiver<Signal>) {
        let mut refresh_timer = interval(self.config.refresh_interval);
        refresh_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut sweep_timer = interval(self.config.sweep_interval);
        sweep_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of an interval fires immediately; initialize()
        // already refreshed, so consume both.
        refresh_timer.tick().await;
        sweep_timer.tick().await;

        let mut pending_refresh: Option<Instant> = None;

        loop {
            tokio::select! {
                _ = refresh_timer.tick() => {
                    self.refresh().await;
                }
                _ = sweep_timer.tick() => {
                    if let Some(cache) = &self.cache {
                        cache.sweep();
                    }
                }
                _ = async {
                    match pending_refresh {
                        Some(deadline) => sleep_until(deadline).await,
                        None => std::future::pending().await,
                    }
                } => {
                    pending_refresh = None;
                    self.refresh().await;
                }
                signal = signals.recv() => match signal {
                    None | Some(Signal::Shutdown) => break,
                    Some(Signal::Retry) => {
                        self.refresh().await;
                    }
                    Some(Signal::VisibilityRegained) | Some(Signal::NetworkOnline) => {
                        // Debounce: a burst of signals right at the
                        // transition collapses into one refresh.
                        pending_refresh = Some(Instant::now() + self.config.debounce);
                    }
                },
            }
            if self.destroyed {
                break;
            }
        }

        self.destroy();
    }

    /// Release the display target and stop reacting. Safe to call more than
    /// once.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.presenter = None;
        self.state = WidgetState::Idle;
        tracing::info!("top riders widget destroyed");
    }
}
