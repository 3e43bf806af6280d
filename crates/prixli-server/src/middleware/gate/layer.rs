//! Gate middleware layer.
//!
//! Evaluates the [`RequestGate`] for every inbound request before routing
//! and materializes its decision: pass-through, or a 307 redirect carrying
//! the decision's cookie mutations.

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use prixli_gate::{routes, CookieOp, Decision, RequestContext, RequestGate};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use url::form_urlencoded;

/// Gate layer configuration.
#[derive(Clone)]
pub struct GateLayer {
    gate: Arc<RequestGate>,
}

impl GateLayer {
    /// Create a layer around a shared gate.
    pub fn new(gate: Arc<RequestGate>) -> Self {
        Self { gate }
    }
}

impl<S> Layer<S> for GateLayer {
    type Service = GateMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GateMiddleware {
            inner,
            gate: self.gate.clone(),
        }
    }
}

/// Gate middleware service.
#[derive(Clone)]
pub struct GateMiddleware<S> {
    inner: S,
    gate: Arc<RequestGate>,
}

impl<S> Service<Request<Body>> for GateMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let gate = self.gate.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let path = req.uri().path();

            // Static assets, the API proxy prefix and the edge's own
            // internal endpoints never enter the gate.
            if routes::is_excluded(path) || is_internal(path) {
                return inner.call(req).await;
            }

            let ctx = request_context(&req);
            match gate.evaluate(&ctx) {
                Decision::Continue => inner.call(req).await,
                Decision::Redirect { location, cookies } => {
                    Ok(redirect_response(&location, &cookies))
                }
            }
        })
    }
}

fn is_internal(path: &str) -> bool {
    path == "/internal" || path.starts_with("/internal/")
}

/// Build the gate's view of the request: path, decoded query parameters,
/// user-agent and cookies.
fn request_context(req: &Request<Body>) -> RequestContext {
    let mut ctx = RequestContext::new(req.uri().path());

    if let Some(query) = req.uri().query() {
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            ctx = ctx.with_query_param(name, value);
        }
    }

    if let Some(user_agent) = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
    {
        ctx = ctx.with_user_agent(user_agent);
    }

    for value in req.headers().get_all(header::COOKIE) {
        let Ok(cookies) = value.to_str() else {
            continue;
        };
        for pair in cookies.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                ctx = ctx.with_cookie(name.trim(), value.trim());
            }
        }
    }

    ctx
}

fn redirect_response(location: &str, ops: &[CookieOp]) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::TEMPORARY_REDIRECT;

    // Locations are built from the request path and re-encoded query, so
    // this only fails on a malformed inbound path; fall back to the root.
    let location = HeaderValue::from_str(location)
        .unwrap_or_else(|_| HeaderValue::from_static("/"));
    response.headers_mut().insert(header::LOCATION, location);

    for op in ops {
        if let Ok(value) = HeaderValue::from_str(&build_cookie(op).to_string()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

/// Materialize a cookie operation. Set cookies are httpOnly, `Path=/`,
/// `SameSite=Lax`; removals expire immediately.
fn build_cookie(op: &CookieOp) -> Cookie<'static> {
    let (name, value, max_age) = match op {
        CookieOp::Set {
            name,
            value,
            max_age_secs,
        } => (name.clone(), value.clone(), *max_age_secs),
        CookieOp::Remove { name } => (name.clone(), String::new(), 0),
    };

    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age))
        .build()
}
