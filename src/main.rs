use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, Router},
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use crate::{
    config::Config,
    repositories::{CategoryRepository, PgArticleRepository},
    services::{
        ArticleService, AuthService, CategoryService, Database, StaffService, StationService,
        ThemeService,
    },
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "onair_station=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting OnAir Station service...");

    // 加载配置
    dotenv::dotenv().ok();
    let config = Config::from_env()?;

    // 初始化数据库连接
    let db = match Database::new(&config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to create database connection: {}", e);
            return Err(anyhow::anyhow!("Database initialization failed"));
        }
    };
    db.verify_connection().await?;
    db.run_migrations().await?;
    let db = Arc::new(db);

    // 初始化所有服务，仓库显式注入连接池
    let auth_service = AuthService::new(&config).await?;
    let article_repository = Arc::new(PgArticleRepository::new(db.pool().clone()));
    let article_service = ArticleService::new(article_repository, &config).await?;
    let category_repository = CategoryRepository::new(db.pool().clone());
    let category_service = CategoryService::new(category_repository).await?;
    let staff_service = StaffService::new(db.clone()).await?;
    let theme_service = ThemeService::new(db.clone()).await?;
    let station_service = StationService::new(&config).await?;

    // 创建应用状态
    let app_state = Arc::new(AppState {
        config: config.clone(),
        db: (*db).clone(),
        auth_service,
        article_service,
        category_service,
        staff_service,
        theme_service,
        station_service,
    });

    // 配置 CORS
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_origin(
            config
                .cors_allowed_origins
                .split(',')
                .map(|origin| origin.parse::<HeaderValue>().unwrap())
                .collect::<Vec<_>>(),
        );

    // 构建应用路由
    let app = Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .nest("/api/articles", routes::articles::router())
        .nest("/api/categories", routes::categories::router())
        .nest("/api/staff", routes::staff::router())
        .nest("/api/themes", routes::themes::router())
        .nest("/api/station", routes::station::router())
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            utils::middleware::auth_middleware,
        ))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // 启动主服务器
    let addr = format!("{}:{}", config.server_host, config.server_port);
    info!("Starting server on http://{}", addr);

    axum::Server::bind(&addr.parse()?)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OnAir Station is running!"
}
