use axum::{
    extract::{Request, State},
    http::{header, header::InvalidHeaderValue, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Exact-match allow-list for the `Origin` request header.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    origins: Vec<HeaderValue>,
    allow_missing: bool,
}

impl OriginPolicy {
    pub fn new<I, S>(origins: I, allow_missing: bool) -> Result<Self, InvalidHeaderValue>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let origins = origins
            .into_iter()
            .map(|origin| HeaderValue::from_str(origin.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            origins,
            allow_missing,
        })
    }

    pub fn permits(&self, origin: Option<&HeaderValue>) -> bool {
        match origin {
            Some(origin) => self.origins.iter().any(|allowed| allowed == origin),
            None => self.allow_missing,
        }
    }

    /// Response headers and preflight handling for the same allow-list.
    pub fn cors_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.origins.clone()))
            .allow_methods([Method::GET])
    }
}

/// Rejects requests whose `Origin` is not on the allow-list.
pub async fn enforce_origin(
    State(policy): State<OriginPolicy>,
    request: Request,
    next: Next,
) -> Response {
    if policy.permits(request.headers().get(header::ORIGIN)) {
        return next.run(request).await;
    }

    tracing::warn!(
        "Rejected {} {} from origin {:?}",
        request.method(),
        request.uri().path(),
        request.headers().get(header::ORIGIN)
    );

    (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": "Not allowed by CORS" })),
    )
        .into_response()
}
