use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    plans_total: AtomicU64,
    generation_fallback_total: AtomicU64,
    optimization_failure_total: AtomicU64,
    geocode_miss_total: AtomicU64,
    advisory_hits_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub plans_total: u64,
    pub generation_fallback_total: u64,
    pub optimization_failure_total: u64,
    pub geocode_miss_total: u64,
    pub advisory_hits_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_plan(&self) {
        self.plans_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_generation_fallback(&self) {
        self.generation_fallback_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_optimization_failure(&self) {
        self.optimization_failure_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_geocode_misses(&self, misses: usize) {
        self.geocode_miss_total
            .fetch_add(misses as u64, Ordering::Relaxed);
    }

    pub fn add_advisory_hits(&self, hits: usize) {
        self.advisory_hits_total
            .fetch_add(hits as u64, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let plans = self.plans_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            plans_total: plans,
            generation_fallback_total: self.generation_fallback_total.load(Ordering::Relaxed),
            optimization_failure_total: self.optimization_failure_total.load(Ordering::Relaxed),
            geocode_miss_total: self.geocode_miss_total.load(Ordering::Relaxed),
            advisory_hits_total: self.advisory_hits_total.load(Ordering::Relaxed),
            avg_latency_millis: if plans == 0 {
                0.0
            } else {
                latency as f64 / plans as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,daytour_api=info,daytour_agents=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
