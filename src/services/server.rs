use anyhow::Result;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::achievements;
use crate::api::handlers::AppState;
use crate::api::routes::create_router;
use crate::config::settings::AppConfig;
use crate::database;
use crate::progress::SqliteProgressStore;
use crate::services::progress::ProgressService;

pub struct ServerService {
    port: u16,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, config: AppConfig) -> Self {
        Self { port, config }
    }

    pub async fn run(&self) -> Result<()> {
        let db_path = &self.config.server.database_path;
        let pool = database::create_pool(db_path)?;
        database::setup::initialize_pool(&pool)?;
        {
            let mut conn = database::get_connection(&pool)?;
            achievements::seed_defaults(&mut conn)?;
        }
        info!("Using database {}", db_path);

        let store = Arc::new(SqliteProgressStore::new(pool.clone()));
        let progress = ProgressService::new(pool.clone(), store, self.config.clone())?;
        let state = Arc::new(AppState { pool, progress });

        let app = create_router(state)
            .layer(CorsLayer::permissive());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
