//! Origin guard and CORS policy.
//!
//! Every request passes the guard before any handler runs. A request whose
//! `Origin` header is present and not on the allow-list is rejected with a
//! bare 403. Requests without an `Origin` (same-origin, curl, server-to-server)
//! are admitted.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use pictor_shared::AppError;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{AppState, error::ApiError};

/// Exact-match set of origins allowed to call the gateway.
#[derive(Debug, Clone)]
pub struct OriginAllowList {
    origins: Vec<HeaderValue>,
}

impl OriginAllowList {
    /// Builds the allow-list.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a wildcard entry or a value that is
    /// not a valid header value.
    pub fn new<S: AsRef<str>>(origins: &[S]) -> Result<Self, AppError> {
        let origins = origins
            .iter()
            .map(|origin| {
                let origin = origin.as_ref();
                if origin.contains('*') {
                    return Err(AppError::Configuration(format!(
                        "wildcard origin not supported: {origin}"
                    )));
                }
                HeaderValue::from_str(origin)
                    .map_err(|_| AppError::Configuration(format!("invalid origin: {origin}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { origins })
    }

    /// Returns true if `origin` is on the list, byte for byte.
    #[must_use]
    pub fn is_allowed(&self, origin: &HeaderValue) -> bool {
        self.origins.iter().any(|allowed| allowed == origin)
    }

    /// Admit or reject a request by its declared origin.
    ///
    /// # Errors
    ///
    /// Returns `ForbiddenOrigin` if an origin is declared and not allowed.
    pub fn check(&self, origin: Option<&HeaderValue>) -> Result<(), AppError> {
        match origin {
            None => Ok(()),
            Some(origin) if self.is_allowed(origin) => Ok(()),
            Some(origin) => Err(AppError::ForbiddenOrigin(
                String::from_utf8_lossy(origin.as_bytes()).into_owned(),
            )),
        }
    }

    /// CORS headers for admitted requests: GET and POST, `Content-Type`, no credentials.
    #[must_use]
    pub fn cors_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.origins.clone()))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
    }

    /// Number of allowed origins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    /// Returns true if no origin is allowed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

/// Middleware rejecting requests from origins outside the allow-list.
pub async fn origin_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Err(err) = state.origins.check(request.headers().get(header::ORIGIN)) {
        tracing::warn!(
            error = %err,
            code = err.error_code(),
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected request"
        );
        return ApiError(err).into_response();
    }

    next.run(request).await
}
