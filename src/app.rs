use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenKeys;
use crate::config::AppConfig;
use crate::database::DynRepository;
use crate::handlers::{protected, public, system};
use crate::middleware::jwt_auth_middleware;
use crate::services::{AuthService, BlogService};

/// Shared handler state. Everything is constructed once at startup and
/// handed in explicitly; there is no global store handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repo: DynRepository,
    pub auth: AuthService,
    pub blogs: BlogService,
}

impl AppState {
    pub fn new(config: AppConfig, repo: DynRepository) -> Self {
        let keys = TokenKeys::from_config(&config.security);
        let auth = AuthService::new(repo.clone(), keys, config.security.bcrypt_cost);
        let blogs = BlogService::new(repo.clone());

        Self {
            config: Arc::new(config),
            repo,
            auth,
            blogs,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origins);

    Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(public_routes())
        // Protected
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use public::{auth, blogs};

    Router::new()
        .route("/api/auth/register", post(auth::register_post))
        .route("/api/auth/login", post(auth::login_post))
        .route("/api/auth/users", get(auth::users_get))
        .route("/api/blogs", get(blogs::list))
        .route("/api/blogs/:id", get(blogs::show))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{auth, blogs};

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/blogs", post(blogs::create))
        .route("/api/blogs/:id", put(blogs::update).delete(blogs::delete))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect();

    // Credentials are only allowed with an explicit origin list
    layer
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{BlogChanges, BlogRecord, NewBlog, NewUser, User};
    use crate::database::{DatabaseError, MemoryRepository, Repository};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    /// Store whose every call fails as if the pool could not connect
    struct UnreachableRepository;

    fn unreachable() -> DatabaseError {
        DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)
    }

    #[async_trait]
    impl Repository for UnreachableRepository {
        async fn insert_user(&self, _: NewUser) -> Result<User, DatabaseError> {
            Err(unreachable())
        }
        async fn find_user_by_email(&self, _: &str) -> Result<Option<User>, DatabaseError> {
            Err(unreachable())
        }
        async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
            Err(unreachable())
        }
        async fn list_blogs(&self) -> Result<Vec<BlogRecord>, DatabaseError> {
            Err(unreachable())
        }
        async fn find_blog(&self, _: uuid::Uuid) -> Result<Option<BlogRecord>, DatabaseError> {
            Err(unreachable())
        }
        async fn insert_blog(&self, _: NewBlog) -> Result<BlogRecord, DatabaseError> {
            Err(unreachable())
        }
        async fn update_blog(
            &self,
            _: uuid::Uuid,
            _: BlogChanges,
        ) -> Result<Option<BlogRecord>, DatabaseError> {
            Err(unreachable())
        }
        async fn delete_blog(&self, _: uuid::Uuid) -> Result<bool, DatabaseError> {
            Err(unreachable())
        }
        async fn health_check(&self) -> Result<(), DatabaseError> {
            Err(unreachable())
        }
    }

    fn config(origins: &str) -> AppConfig {
        let vars = [
            ("JWT_SECRET", "router-test-secret"),
            ("BLOG_STORE", "memory"),
            ("FRONTEND_URL", origins),
        ];
        AppConfig::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .unwrap()
    }

    fn state(origins: &str) -> AppState {
        AppState::new(config(origins), Arc::new(MemoryRepository::new()))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_503_when_store_is_down() {
        let state = AppState::new(config("*"), Arc::new(UnreachableRepository));
        let response = app(state)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = json_body(response).await;
        assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
        assert_eq!(body["message"], "database unavailable");
    }

    #[tokio::test]
    async fn store_failures_do_not_leak_details() {
        let state = AppState::new(config("*"), Arc::new(UnreachableRepository));
        let response = app(state)
            .oneshot(Request::get("/api/blogs").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(response).await;
        assert_eq!(body["message"], "An error occurred while processing your request");
    }

    #[tokio::test]
    async fn health_is_ok_on_memory_store() {
        let response = app(state("*"))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn protected_route_without_token_is_401() {
        let response = app(state("*"))
            .oneshot(
                Request::post("/api/blogs")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"title":"t","content":"c"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn public_and_protected_share_blog_paths() {
        let router = app(state("*"));

        let response = router
            .clone()
            .oneshot(Request::get("/api/blogs").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(
                Request::delete(format!("/api/blogs/{}", uuid::Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn cors_allows_configured_origin() {
        let response = app(state("http://localhost:3000"))
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/blogs")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("http://localhost:3000")
        );
    }
}
