pub mod config;
pub mod error;
pub mod orchestrator;
pub mod presenter;

pub use config::{CategoryLimits, WidgetConfig};
pub use error::WidgetError;
pub use orchestrator::{Orchestrator, Signal, WidgetState};
pub use presenter::{build_view, HtmlPresenter, Presenter, RenderError, RenderedView};

use velorank_cache::{MemoryStore, ResultCache};
use velorank_source::{SheetRef, SheetSource};

/// Wire up a widget against the live spreadsheet source with an in-memory
/// cache store. The caller still has to [`initialize`](Orchestrator::initialize)
/// and [`run`](Orchestrator::run) it.
pub fn build_widget<P: Presenter>(
    config: WidgetConfig,
    presenter: P,
) -> anyhow::Result<Orchestrator<SheetSource, MemoryStore, P>> {
    let sheet = SheetRef::parse(&config.source_url)?;
    let source = SheetSource::new(sheet, config.fetch_timeout)?;
    let cache = config
        .cache_enabled
        .then(|| ResultCache::new(MemoryStore::new(), config.cache_ttl));
    Ok(Orchestrator::new(config, source, cache, Some(presenter)))
}
