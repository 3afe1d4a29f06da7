//! Congestion tax HTTP server runtime.
//!
//! [`ServerHandle`] owns the server lifecycle: metrics recorder, city rule
//! repository, REST API and graceful shutdown.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{error, info, warn};

use crate::application::TaxService;
use crate::config::AppConfig;
use crate::domain::CityRuleRepository;
use crate::infrastructure::{CachedCityRuleRepository, CityCache, FileCityRuleRepository};
use crate::interfaces::http::create_api_router;
use crate::interfaces::http::modules::health::HealthState;
use crate::support::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running congestion tax server.
///
/// ```rust,no_run
/// use congestion_tax::config::AppConfig;
/// use congestion_tax::server::ServerHandle;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(AppConfig::default()).await?;
///     handle.install_signal_handler();
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub tax_service: Arc<TaxService>,
    /// Present when `rules.cache_enabled` is set
    pub city_cache: Option<Arc<CityCache>>,
    pub config: AppConfig,
    /// Address the API listener is bound to
    pub local_addr: std::net::SocketAddr,

    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(app_cfg: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Starting congestion tax service...");

        let prometheus_handle = prometheus_handle()?;
        info!("📊 Prometheus metrics recorder ready");

        // ── City rules ─────────────────────────────────────────
        let file_repo = Arc::new(FileCityRuleRepository::new(&app_cfg.rules.cities_dir));
        info!("City rule files: {}", app_cfg.rules.cities_dir.display());
        if !app_cfg.rules.cities_dir.is_dir() {
            warn!(
                "City rule directory {} does not exist; city endpoints will answer 404",
                app_cfg.rules.cities_dir.display()
            );
        }

        let city_cache = app_cfg.rules.cache_enabled.then(|| {
            info!("🗂️  City rule cache enabled");
            Arc::new(CityCache::new())
        });
        let cities: Arc<dyn CityRuleRepository> = match &city_cache {
            Some(cache) => Arc::new(CachedCityRuleRepository::new(file_repo, cache.clone())),
            None => file_repo,
        };

        let tax_service = Arc::new(TaxService::new(cities));

        // ── REST API server ────────────────────────────────────
        let health_state = HealthState {
            started_at: Arc::new(Instant::now()),
            cities_dir: app_cfg.rules.cities_dir.clone(),
            city_cache: city_cache.clone(),
        };
        let api_router = create_api_router(
            tax_service.clone(),
            health_state,
            prometheus_handle,
            Duration::from_secs(app_cfg.server.request_timeout_secs),
        );

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let api_shutdown = shutdown.signal();

        let api_addr = app_cfg.api_address();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Congestion tax service started");

        Ok(Self {
            tax_service,
            city_cache,
            config: app_cfg,
            local_addr,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait until shutdown is triggered, then give in-flight requests
    /// `server.shutdown_timeout` seconds to finish.
    pub async fn wait(self) {
        let signal = self.shutdown.signal();
        let grace = Duration::from_secs(self.shutdown.timeout_secs());
        let mut api_task = self.api_task;

        tokio::select! {
            result = &mut api_task => {
                report_api_exit(result);
                info!("👋 Congestion tax service stopped");
                return;
            }
            _ = signal.wait() => {}
        }

        info!("⏳ Waiting up to {}s for in-flight requests...", grace.as_secs());
        match tokio::time::timeout(grace, &mut api_task).await {
            Ok(result) => report_api_exit(result),
            Err(_) => {
                warn!("Shutdown grace period elapsed; aborting remaining requests");
                api_task.abort();
            }
        }

        info!("👋 Congestion tax service shutdown complete");
    }

    pub async fn shutdown(self) {
        info!("🛑 Shutting down congestion tax service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

fn report_api_exit(result: Result<(), tokio::task::JoinError>) {
    match result {
        Ok(()) => info!("REST API server stopped"),
        Err(e) => error!("REST API server task panicked: {}", e),
    }
}

/// The global recorder can only be installed once per process; a restart
/// within the same process reuses it.
fn prometheus_handle() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    static PROM_HANDLE: Mutex<Option<PrometheusHandle>> = Mutex::new(None);

    let mut slot = PROM_HANDLE.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(handle) = slot.as_ref() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("📊 Prometheus metrics recorder installed");
    *slot = Some(handle.clone());
    Ok(handle)
}

/// Initialize tracing from the application config. `RUST_LOG` overrides
/// `logging.level`.
///
/// Call once at process startup, before [`ServerHandle::start`].
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────
