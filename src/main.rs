use anyhow::Result;
use login_history::application::{
    ports::{
        directory::UserDirectory, geo::GeoLocator, security::TokenManager,
        session::SessionPointerStore, settings::SettingsStore, time::Clock,
    },
    services::{ApplicationServices, ServiceOptions},
};
use login_history::config::AppConfig;
use login_history::domain::login::LoginRecordRepository;
use login_history::infrastructure::{
    database,
    geo::{HttpGeoLocator, NoopGeoLocator},
    repositories::{PostgresLoginRecordRepository, PostgresSettingsStore, PostgresUserDirectory},
    security::{
        redis_session_store::RedisSessionPointerStore, session_store::InMemorySessionPointerStore,
        token::BiscuitTokenManager,
    },
    time::SystemClock,
};
use login_history::presentation::http::{routes::build_router, state::HttpState};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let pool = database::init_pool(config.database_url()).await?;
    database::run_migrations(&pool).await?;

    let login_repo: Arc<dyn LoginRecordRepository> =
        Arc::new(PostgresLoginRecordRepository::new(pool.clone()));
    let directory: Arc<dyn UserDirectory> = Arc::new(PostgresUserDirectory::new(pool.clone()));
    let settings: Arc<dyn SettingsStore> = Arc::new(PostgresSettingsStore::new(pool));

    let token_manager: Arc<dyn TokenManager> = Arc::new(BiscuitTokenManager::new(
        config.biscuit_private_key(),
        config.token_ttl(),
    )?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let pointers: Arc<dyn SessionPointerStore> = match config.redis_url() {
        Some(url) => {
            tracing::info!("session pointers stored in redis");
            Arc::new(RedisSessionPointerStore::from_url(
                url,
                config.session_pointer_ttl_secs(),
            )?)
        }
        None => {
            tracing::info!("session pointers stored in memory");
            Arc::new(InMemorySessionPointerStore::new(
                config.session_pointer_ttl_secs(),
                clock.clone(),
            ))
        }
    };

    let geo: Arc<dyn GeoLocator> = if config.geo_lookup_enabled() {
        Arc::new(HttpGeoLocator::new(
            config.geo_api_url(),
            config.geo_lookup_timeout(),
        )?)
    } else {
        Arc::new(NoopGeoLocator)
    };

    let services = Arc::new(ApplicationServices::new(
        login_repo,
        directory,
        geo,
        pointers,
        settings,
        token_manager,
        clock,
        ServiceOptions {
            multisite: config.multisite(),
            settings_prefix: config.settings_prefix().to_string(),
        },
    ));

    let state = HttpState { services };
    let app = build_router(state, config.allowed_origins());

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!(
        multisite = config.multisite(),
        geo_lookup = config.geo_lookup_enabled(),
        "listening on {address}"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for CTRL+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
