use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::realtime::{ws, ChannelHub};
use crate::routes::{
    auth, discover, health, matches, messages, profiles, session_messages, sessions, swipes,
};
use shared::jwt::JwtKeys;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtKeys>,
    pub hub: ChannelHub,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let config = Arc::new(config);

    // Signing keys are built once at startup; per-request auth reads them
    // from state.
    let jwt = Arc::new(
        JwtKeys::from_rsa_pem(
            &normalize_pem_key(&config.jwt.private_key),
            &normalize_pem_key(&config.jwt.public_key),
            config.jwt.access_token_expiry_secs,
            config.jwt.refresh_token_expiry_secs,
            config.jwt.leeway_secs,
        )
        .context("Failed to initialize JWT keys")?,
    );

    // Rate limiting is enabled when rate_limit_per_minute > 0
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        hub: ChannelHub::new(),
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public routes: health probes, metrics, and the auth gate itself
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout));

    // Protected routes (require a Bearer access token)
    // Middleware order: auth runs first, then rate limiting (which needs
    // the authenticated user id).
    let protected_routes = Router::new()
        .route("/api/v1/auth/me", get(auth::me))
        // Profiles
        .route(
            "/api/v1/profiles/me",
            get(profiles::get_my_profile).put(profiles::update_my_profile),
        )
        .route(
            "/api/v1/profiles/me/study-hours",
            post(profiles::add_study_hours),
        )
        .route("/api/v1/profiles/:profile_id", get(profiles::get_profile))
        // Discovery feed
        .route("/api/v1/discover", get(discover::discover))
        // Swipe/match engine
        .route("/api/v1/swipes", post(swipes::record))
        // Matches
        .route("/api/v1/matches", get(matches::list))
        .route("/api/v1/matches/partners", get(matches::partners))
        // Direct messaging
        .route(
            "/api/v1/matches/:match_id/messages",
            get(messages::list).post(messages::send),
        )
        .route("/api/v1/matches/:match_id/ws", get(ws::match_feed_ws))
        // Study sessions
        .route(
            "/api/v1/sessions",
            get(sessions::overview).post(sessions::create),
        )
        .route(
            "/api/v1/sessions/:session_id",
            get(sessions::detail)
                .put(sessions::update)
                .delete(sessions::delete),
        )
        .route("/api/v1/sessions/:session_id/join", post(sessions::join))
        .route(
            "/api/v1/sessions/:session_id/decline",
            post(sessions::decline),
        )
        .route(
            "/api/v1/sessions/:session_id/invitations",
            post(sessions::invite),
        )
        .route(
            "/api/v1/sessions/:session_id/invite-candidates",
            get(sessions::invite_candidates),
        )
        // Session chat
        .route(
            "/api/v1/sessions/:session_id/messages",
            get(session_messages::list).post(session_messages::send),
        )
        .route("/api/v1/sessions/:session_id/ws", get(ws::session_feed_ws))
        // Rate limiting runs after auth (needs the user id from auth)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        // Auth runs first (outermost layer = runs first)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(trace_id))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state);

    Ok(app)
}

/// Normalize a PEM key whose newlines arrived as literal `\n` sequences
/// (common when keys are passed through environment variables).
fn normalize_pem_key(key: &str) -> String {
    let key = key.trim_matches('"').trim_matches('\'');
    key.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_passes_through_real_newlines() {
        let pem = "-----BEGIN KEY-----\nabc\n-----END KEY-----";
        assert_eq!(normalize_pem_key(pem), pem);
    }

    #[test]
    fn normalize_replaces_escaped_newlines() {
        let pem = "-----BEGIN KEY-----\\nabc\\n-----END KEY-----";
        assert_eq!(
            normalize_pem_key(pem),
            "-----BEGIN KEY-----\nabc\n-----END KEY-----"
        );
    }

    #[test]
    fn normalize_strips_surrounding_quotes() {
        let pem = "\"-----BEGIN KEY-----\\nabc\\n-----END KEY-----\"";
        assert!(normalize_pem_key(pem).starts_with("-----BEGIN KEY-----\n"));
    }
}
