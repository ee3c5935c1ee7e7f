//! Gazette server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware};
use gazette_api::{middleware::AppState, not_found, router as app_router};
use gazette_common::{Config, LocalStorage, PageCache, StorageBackend};
use gazette_core::{CommentService, FollowService, GroupService, PostService, UserService};
use gazette_db::repositories::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gazette=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting gazette server...");

    // Load configuration
    let _ = dotenvy::dotenv();
    let config = Config::load()?;

    // Connect to database
    let db = gazette_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    gazette_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let group_repo = GroupRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));

    // Initialize file storage
    let storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::new(
        PathBuf::from(&config.files.path),
        config.files.url.clone(),
    ));

    // Initialize services
    let user_service = UserService::new(user_repo);
    let group_service = GroupService::new(group_repo.clone());
    let post_service = PostService::new(
        post_repo.clone(),
        group_repo,
        Arc::clone(&storage),
        config.pagination.per_page,
    );
    let comment_service = CommentService::new(comment_repo, post_repo);
    let follow_service = FollowService::new(follow_repo);

    // Initialize the index page cache
    let page_cache = PageCache::with_ttl(Duration::from_secs(config.cache.ttl_secs));

    // Create app state
    let state = AppState {
        user_service,
        group_service,
        post_service,
        comment_service,
        follow_service,
        storage,
        page_cache,
        cache_enabled: config.cache.enabled,
    };

    // Build router
    let app = Router::new()
        .merge(app_router())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gazette_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
