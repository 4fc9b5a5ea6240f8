use anyhow::Context;
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use todo_rest::{app_env, auth, logging, persistence, routes, SharedData};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logging::setup_logging(logging::init_env_filter());

    let db_url = env::var(app_env::DB_URL)
        .with_context(|| format!("{} must be set to a PostgreSQL URL", app_env::DB_URL))?;
    let db_pool = PgPoolOptions::new()
        .max_connections(16)
        .connect(&db_url)
        .await
        .context("connecting to the database")?;
    sqlx::migrate!()
        .run(&db_pool)
        .await
        .context("applying database migrations")?;

    let session_secret = env::var(app_env::SESSION_JWT_SECRET).with_context(|| {
        format!(
            "{} must contain the signing secret shared with the identity provider",
            app_env::SESSION_JWT_SECRET
        )
    })?;

    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(db_pool),
        session_keys: auth::SessionKeys::new(&session_secret),
    });
    let app = routes::build_router(shared_data);

    let listen_addr =
        env::var(app_env::LISTEN_ADDR).unwrap_or_else(|_| String::from("0.0.0.0:8080"));
    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("binding {listen_addr}"))?;

    info!("Starting server on {listen_addr}.");
    axum::serve(listener, app).await.context("serving HTTP")?;

    Ok(())
}
