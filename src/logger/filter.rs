//! Per-layer filter that consults the level cell on every event.

use tracing::subscriber::Interest;
use tracing::Metadata;
use tracing_subscriber::layer::{Context, Filter};

use crate::level::Level;
use crate::logger::cell::LevelCell;

pub(crate) struct ThresholdFilter {
    cell: LevelCell,
}

impl ThresholdFilter {
    pub(crate) fn new(cell: LevelCell) -> Self {
        Self { cell }
    }

    // `fatal!` records are `ERROR`, the highest threshold, so they always pass.
    fn allows(&self, meta: &Metadata<'_>) -> bool {
        Level::from_tracing(meta.level()).is_some_and(|level| self.cell.allows(level))
    }
}

impl<S> Filter<S> for ThresholdFilter {
    fn enabled(&self, meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        self.allows(meta)
    }

    // The threshold moves at runtime, so callsites must never be cached as
    // always/never enabled.
    fn callsite_enabled(&self, _meta: &'static Metadata<'static>) -> Interest {
        Interest::sometimes()
    }
}
