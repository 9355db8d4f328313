//! Shared application state for the statdeck gateway.
//!
//! The counter store is single-writer by contract, so every handler and the
//! housekeeping task reach it through one mutex. Nothing inside the store
//! suspends, so a blocking `std::sync::Mutex` held for the duration of a call
//! never crosses an `.await`.

use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use statdeck_core::error::Result;
use statdeck_core::{render_chart, ChartLayout, ChartRenderer, CounterStore, Timestamp};

use crate::config::GatewayConfig;
use crate::render::SvgRenderer;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    layout: ChartLayout,
    renderer: Arc<dyn ChartRenderer>,
    store: Mutex<CounterStore>,
}

impl AppState {
    /// Build application state with the built-in SVG renderer.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        Self::with_renderer(cfg, Arc::new(SvgRenderer::new()))
    }

    /// Build application state.
    /// Runs the store startup seed, then registers the configured series.
    pub fn with_renderer(cfg: GatewayConfig, renderer: Arc<dyn ChartRenderer>) -> Result<Self> {
        let mut store = CounterStore::started(cfg.stats.store_config(), Timestamp::now())?;

        for s in &cfg.series {
            store.register(&s.name, &s.module_type, s.color.clone(), s.mode);
        }
        tracing::info!(series = store.len(), "counter store ready");

        let layout = cfg.chart.layout();
        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                layout,
                renderer,
                store: Mutex::new(store),
            }),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn content_type(&self) -> &'static str {
        self.inner.renderer.content_type()
    }

    /// Lock the store. A poisoned lock is recovered: the store is plain data
    /// and every mutation leaves it consistent.
    fn lock(&self) -> MutexGuard<'_, CounterStore> {
        self.inner
            .store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` with exclusive access to the store.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut CounterStore) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    /// Sweep buckets outside the retention horizon.
    pub fn house_keeping(&self, now: Timestamp) {
        self.with_store(|s| s.house_keeping_at(now));
    }

    /// Build and render a chart; `None` means no image was produced.
    pub fn render_chart(&self, selectors: &[String], now: Timestamp) -> Option<Bytes> {
        let renderer = Arc::clone(&self.inner.renderer);
        self.with_store(|s| {
            render_chart(s, renderer.as_ref(), &self.inner.layout, selectors, now)
        })
    }
}
