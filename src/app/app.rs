use axum::{routing::get, Router};
use std::sync::Arc;
use tracing::info;

use crate::config::app_conf::AppConfig;
use crate::config::jwt_conf::JwtConfig;
use crate::config::mongo_conf::MongoConfig;
use crate::middlewares::auth_middleware::AuthState;
use crate::repository::activity_log_repo::{ActivityLogRepository, MongoActivityLogRepository};
use crate::repository::lot_repo::{LotRepository, MongoLotRepository};
use crate::repository::project_repo::{MongoProjectRepository, ProjectRepository};
use crate::repository::quote_repo::{MongoQuoteRepository, QuoteRepository};
use crate::repository::user_repo::{MongoUserRepository, UserRepository};
use crate::router::project_router::project_router;
use crate::router::quote_router::quote_router;
use crate::service::project_service::ProjectServiceImpl;
use crate::service::quote_service::QuoteServiceImpl;
use crate::util::jwt::JwtTokenUtilsImpl;

pub struct App {
    config: AppConfig,
    router: Router,
    pub quote_service: Arc<QuoteServiceImpl>,
    pub project_service: Arc<ProjectServiceImpl>,
}

impl App {
    pub async fn new() -> Self {
        let config = AppConfig::from_env();
        let jwt_config = JwtConfig::from_env().expect("JWT config error");
        let mongo_config = MongoConfig::from_env().expect("Mongo config error");

        let quote_repo: Arc<dyn QuoteRepository> = Arc::new(
            MongoQuoteRepository::new(&mongo_config)
                .await
                .expect("Quote repo error"),
        );
        let project_repo: Arc<dyn ProjectRepository> = Arc::new(
            MongoProjectRepository::new(&mongo_config)
                .await
                .expect("Project repo error"),
        );
        let lot_repo: Arc<dyn LotRepository> = Arc::new(
            MongoLotRepository::new(&mongo_config)
                .await
                .expect("Lot repo error"),
        );
        let user_repo: Arc<dyn UserRepository> = Arc::new(
            MongoUserRepository::new(&mongo_config)
                .await
                .expect("User repo error"),
        );
        let activity_log_repo: Arc<dyn ActivityLogRepository> = Arc::new(
            MongoActivityLogRepository::new(&mongo_config)
                .await
                .expect("Activity log repo error"),
        );

        let quote_service = Arc::new(QuoteServiceImpl::new(
            quote_repo,
            project_repo.clone(),
            lot_repo,
            user_repo.clone(),
        ));
        let project_service = Arc::new(ProjectServiceImpl::new(
            project_repo,
            user_repo,
            activity_log_repo,
        ));

        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));
        let auth_state = Arc::new(AuthState { jwt_utils });

        let router = Self::create_router(
            quote_service.clone(),
            project_service.clone(),
            auth_state,
        );

        App {
            config,
            router,
            quote_service,
            project_service,
        }
    }

    fn create_router(
        quote_service: Arc<QuoteServiceImpl>,
        project_service: Arc<ProjectServiceImpl>,
        auth_state: Arc<AuthState>,
    ) -> Router {
        let api = quote_router(quote_service, auth_state.clone())
            .merge(project_router(project_service, auth_state));
        Router::new()
            .nest("/api/v1", api)
            .route("/health", get(|| async { "OK" }))
    }

    pub async fn start(self) {
        let addr = self.config.bind_addr().expect("Invalid host");
        info!("Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind address");
        axum::serve(listener, self.router).await.expect("Failed to start server");
    }
}
