//! Reusable court booking server runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! data directory and court seeding, availability cache and its sweeper,
//! REST API, metrics, and graceful shutdown.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{error, info};

use crate::application::{
    AvailabilityCache, AvailabilityService, JournalService, MemberService, PaymentService,
    ReservationService,
};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::JsonRepositoryProvider;
use crate::interfaces::{create_api_router, ApiServices};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the booking service.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Install the process-wide Prometheus recorder and mount `/metrics`.
    pub enable_metrics: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            enable_metrics: true,
        }
    }
}

/// The global metrics recorder can only be installed once per process.
/// On restart (stop + start within the same process) it is reused.
fn prometheus_handle() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = PROM_HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics recorder installed");
    Ok(PROM_HANDLE.get_or_init(|| handle).clone())
}

// ── Components ─────────────────────────────────────────────────────

/// Every long-lived component, wired explicitly from the config.
///
/// Separate from [`ServerHandle`] so tests can drive the router without
/// binding a socket.
pub struct AppComponents {
    pub repos: Arc<dyn RepositoryProvider>,
    pub cache: Arc<AvailabilityCache>,
    pub api: ApiServices,
}

impl AppComponents {
    /// Build repositories, cache and services, and seed `courts.json` from
    /// `facility.courts` if it does not exist yet.
    pub async fn build(
        config: &AppConfig,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        config.validate()?;
        let hours = config.facility.opening_hours()?;

        let data_dir = config.storage.data_dir.clone();
        tokio::fs::create_dir_all(&data_dir).await?;
        info!("Data directory: {}", data_dir.display());

        let repos: Arc<dyn RepositoryProvider> = Arc::new(JsonRepositoryProvider::new(
            data_dir.clone(),
            config.storage.lock_options(),
        ));

        if repos.courts().seed(config.facility.court_seeds()).await? {
            info!(
                count = config.facility.courts.len(),
                "Seeded courts from configuration"
            );
        }

        let cache = Arc::new(AvailabilityCache::new(Duration::from_secs(
            config.cache.default_ttl_secs,
        )));

        let api = ApiServices {
            repos: repos.clone(),
            reservations: Arc::new(ReservationService::new(repos.clone(), cache.clone(), hours)),
            availability: Arc::new(AvailabilityService::new(repos.clone(), cache.clone(), hours)),
            members: Arc::new(MemberService::new(repos.clone())),
            journal: Arc::new(JournalService::new(repos.clone())),
            payments: Arc::new(PaymentService::new(repos.clone())),
            jwt_config: JwtConfig::from(&config.security),
            data_dir,
            metrics,
        };

        Ok(Self { repos, cache, api })
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running booking service.
///
/// # Examples
///
/// ```rust,no_run
/// use court_booking::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     // ... wait for shutdown signal ...
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Repository provider for data access.
    pub repos: Arc<dyn RepositoryProvider>,
    /// Availability cache shared by the services.
    pub cache: Arc<AvailabilityCache>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the REST API is bound to (the real port when 0 was requested).
    pub local_addr: SocketAddr,

    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
    sweeper_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the booking service with the given options.
    ///
    /// This will:
    /// 1. Install the Prometheus metrics recorder (if enabled)
    /// 2. Create the data directory and seed courts
    /// 3. Start the cache sweeper
    /// 4. Start the REST API server (with Swagger UI)
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!("Starting court booking service...");

        let metrics = if opts.enable_metrics {
            Some(prometheus_handle()?)
        } else {
            None
        };

        let components = AppComponents::build(&app_cfg, metrics).await?;

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        // ── Background tasks ───────────────────────────────────
        let sweeper_task = components.cache.clone().spawn_sweeper(
            Duration::from_secs(app_cfg.cache.sweep_interval_secs.max(1)),
            shutdown_signal.clone(),
        );

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(components.api);

        let api_addr = app_cfg.server.address();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos: components.repos,
            cache: components.cache,
            config: app_cfg,
            local_addr,
            shutdown,
            api_task,
            sweeper_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to fully stop after shutdown has been triggered.
    ///
    /// In-flight requests get `server.shutdown_timeout` seconds to finish.
    pub async fn wait(self) {
        info!("Waiting for server tasks to complete...");

        let Self {
            shutdown,
            api_task,
            sweeper_task,
            ..
        } = self;

        let finished = shutdown
            .run_cleanup(async move {
                match api_task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API server task panicked: {}", e),
                }
                if let Err(e) = sweeper_task.await {
                    error!("Cache sweeper task panicked: {}", e);
                }
            })
            .await;

        if finished {
            info!("Court booking service shutdown complete");
        }
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down court booking service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    /// Check if the server is still running.
    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Initialize tracing (logging) from the application config.
///
/// `RUST_LOG` wins over `logging.level`. Call this once at process startup
/// (before [`ServerHandle::start`]).
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
