/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use taskdesk_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{auth::jwt_auth_layer, security::SecurityHeadersLayer},
    routes,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskdesk_shared::{repositories::Repositories, services::Services, storage::FileStorage};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub services: Services,

    /// `None` when running on the in-memory store
    pub db: Option<PgPool>,
}

impl AppState {
    /// State backed by PostgreSQL
    pub fn new(db: PgPool, config: Config) -> Self {
        let repos = Repositories::postgres(db.clone());
        let mut state = Self::with_repositories(&repos, config);
        state.db = Some(db);
        state
    }

    /// State backed by any repositories, e.g. [`Repositories::in_memory`]
    pub fn with_repositories(repos: &Repositories, config: Config) -> Self {
        let storage = FileStorage::new(config.uploads.dir.clone(), config.uploads.max_bytes);
        let services = Services::new(repos, storage, &config.jwt.secret);

        Self {
            config: Arc::new(config),
            services,
            db: None,
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete router
///
/// ```text
/// /
/// ├── GET /health                              # public
/// └── /api
///     ├── /auth/{register,login,refresh}       # public
///     ├── /users/me, /users/:id/role           # bearer token from here on
///     ├── /tasks, /tasks/:id
///     ├── /tasks/:id/{complete,history,comments,attachments}
///     ├── /comments/:id
///     ├── /attachments/:id, /attachments/:id/download
///     └── /projects, /projects/:id
/// ```
///
/// Layers, outermost first: security headers, CORS, tracing.
pub fn build_router(state: AppState) -> Router {
    let upload_limit = usize::try_from(state.config.uploads.max_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let protected = Router::new()
        .route("/users/me", get(routes::users::me))
        .route("/users/:id/role", patch(routes::users::change_role))
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/tasks/:id/complete", patch(routes::tasks::complete_task))
        .route("/tasks/:id/history", get(routes::tasks::task_history))
        .route(
            "/tasks/:id/comments",
            get(routes::comments::list_comments).post(routes::comments::create_comment),
        )
        .route(
            "/tasks/:id/attachments",
            get(routes::attachments::list_attachments)
                .post(routes::attachments::upload_attachment)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/comments/:id",
            put(routes::comments::update_comment)
                .delete(routes::comments::delete_comment),
        )
        .route(
            "/attachments/:id",
            delete(routes::attachments::delete_attachment),
        )
        .route(
            "/attachments/:id/download",
            get(routes::attachments::download_attachment),
        )
        .route(
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let api_routes = Router::new().nest("/auth", auth_routes).merge(protected);

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .expose_headers([header::CONTENT_DISPOSITION])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    let production = state.config.api.production;

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(production))
        .with_state(state)
}
