use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use blog_service::db::{PgStore, MIGRATOR};
use blog_service::middleware::MetricsMiddleware;
use blog_service::models::NewGroup;
use blog_service::services::{AuthService, GroupService};
use blog_service::{ApiSettings, AppState, Config, SharedStore};
use crypto_core::jwt;
use db_pool::{create_pool, DbConfig};
use sqlx::PgPool;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: blog-service [healthcheck | migrate | create-user <username> <password> | create-group <slug> <title> [description]]";

fn io_error(message: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, message.to_string())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn connect_db() -> io::Result<PgPool> {
    let db_config = DbConfig::from_env("blog-service").map_err(io_error)?;
    db_config.log_config();

    create_pool(db_config).await.map_err(|e| {
        tracing::error!("Database pool creation failed: {:#}", e);
        io_error(format!("database connection failed: {e}"))
    })
}

async fn run_migrations(pool: &PgPool) -> io::Result<()> {
    MIGRATOR.run(pool).await.map_err(|e| {
        tracing::error!("Migrations failed: {:#}", e);
        io_error(format!("migrations failed: {e}"))
    })?;
    tracing::info!("Database migrations applied");
    Ok(())
}

async fn healthcheck() -> io::Result<()> {
    let port = std::env::var("BLOG_SERVICE_PORT").unwrap_or_else(|_| "8000".to_string());
    let url = format!("http://127.0.0.1:{port}/health");

    match reqwest::Client::new().get(&url).send().await {
        Ok(resp) if resp.status().is_success() => Ok(()),
        Ok(resp) => {
            eprintln!("healthcheck HTTP status: {}", resp.status());
            Err(io_error("healthcheck failed"))
        }
        Err(e) => {
            eprintln!("healthcheck HTTP error: {}", e);
            Err(io_error("healthcheck error"))
        }
    }
}

/// Operator subcommands; `None` means start the server.
async fn run_command(args: &[String]) -> Option<io::Result<()>> {
    let (cmd, rest) = args.split_first()?;

    let result = match (cmd.as_str(), rest) {
        ("healthcheck", []) => healthcheck().await,
        ("migrate", []) => match connect_db().await {
            Ok(pool) => run_migrations(&pool).await,
            Err(e) => Err(e),
        },
        ("create-user", [username, password]) => create_user(username, password).await,
        ("create-group", [slug, title, description @ ..]) if description.len() <= 1 => {
            let group = NewGroup {
                title: title.clone(),
                slug: slug.clone(),
                description: description.first().cloned().unwrap_or_default(),
            };
            create_group(group).await
        }
        _ => {
            eprintln!("{USAGE}");
            Err(io_error(format!("unknown or malformed command: {cmd}")))
        }
    };

    Some(result)
}

async fn create_user(username: &str, password: &str) -> io::Result<()> {
    let store: SharedStore = Arc::new(PgStore::new(connect_db().await?));
    let user = AuthService::new(store)
        .create_user(username, password)
        .await
        .map_err(io_error)?;

    println!("created user {} ({})", user.username, user.id);
    Ok(())
}

async fn create_group(group: NewGroup) -> io::Result<()> {
    let store: SharedStore = Arc::new(PgStore::new(connect_db().await?));
    let group = GroupService::new(store)
        .create_group(group)
        .await
        .map_err(io_error)?;

    println!("created group {} (id {})", group.slug, group.id);
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Blog Service
///
/// Serves the blog REST API under `/api/v1` plus `/health*` checks and
/// `/metrics`. Also runs the operator subcommands listed in `USAGE`.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(result) = run_command(&args).await {
        return result;
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        env = %config.app.env,
        "Starting blog-service v{}",
        env!("CARGO_PKG_VERSION")
    );

    match jwt::load_signing_keys().and_then(|(private_pem, public_pem)| {
        jwt::initialize_jwt_keys(&private_pem, &public_pem)
    }) {
        Ok(()) => tracing::info!("JWT keys initialized"),
        Err(e) => {
            tracing::error!("JWT key initialization failed: {:#}", e);
            eprintln!("ERROR: Failed to initialize JWT keys: {}", e);
            std::process::exit(1);
        }
    }

    let pool = connect_db().await?;

    let run_migrations_on_start = std::env::var("DB_RUN_MIGRATIONS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if run_migrations_on_start {
        run_migrations(&pool).await?;
    }

    let store: SharedStore = Arc::new(PgStore::new(pool));
    let state = web::Data::new(AppState::new(store, ApiSettings::from(&config.api)));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server on {}", bind_address);

    let cors_origins = config.cors_origins();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in &cors_origins {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(MetricsMiddleware)
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(blog_service::configure_app)
    })
    .bind(&bind_address)?
    .workers(config.app.workers)
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    tokio::select! {
        result = &mut server_task => {
            return result.map_err(|e| io_error(format!("server task failed: {e}")))?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
        }
    }

    if let Err(e) = server_task.await {
        tracing::error!("Server task join error: {}", e);
    }

    tracing::info!("Blog-service shutting down");
    Ok(())
}
