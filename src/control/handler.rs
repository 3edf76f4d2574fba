//! The level control handler.

use std::convert::Infallible;
use std::future::{ready, Ready};
use std::task::{Context, Poll};

use axum::http::{Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use percent_encoding::percent_decode_str;
use tower::Service;
use tracing::Dispatch;

use crate::level::{parse_level, Level, ParseLevelError};
use crate::logger::LevelCell;
use crate::observability::metrics;

/// Body of the 400 returned when the path carries no level segment.
pub const USAGE_HINT: &str = "specify log level as last part of the URL, e.g. PUT /log/debug";

/// Status and plain-text body of one control request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ControlResponse {
    fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    fn empty(status: StatusCode) -> Self {
        Self::new(status, String::new())
    }
}

impl IntoResponse for ControlResponse {
    fn into_response(self) -> Response {
        (self.status, self.body).into_response()
    }
}

/// Reads and writes the threshold of the logger it was created with.
///
/// | Method     | Effect                                   | Status |
/// |------------|------------------------------------------|--------|
/// | GET        | current level as body                    | 200    |
/// | PUT, POST  | set level named by the last path segment | 202    |
/// | DELETE     | reset to the initial level               | 202    |
/// | other      | none                                     | 405    |
///
/// Unknown level names and paths without a level segment get a 400.
/// Cloning is cheap; clones control the same logger.
#[derive(Debug, Clone)]
pub struct LevelHandle {
    cell: LevelCell,
    initial: Level,
    dispatch: Dispatch,
}

impl LevelHandle {
    pub(crate) fn new(cell: LevelCell, initial: Level, dispatch: Dispatch) -> Self {
        Self {
            cell,
            initial,
            dispatch,
        }
    }

    pub fn level(&self) -> Level {
        self.cell.get()
    }

    pub fn initial_level(&self) -> Level {
        self.initial
    }

    pub fn set_level(&self, level: Level) {
        self.cell.set(level);
        metrics::record_level_change("set", self.cell.get());
        tracing::dispatcher::with_default(&self.dispatch, || {
            tracing::info!(new_level = %level, "log level set");
        });
    }

    /// Restore the initial level and return it.
    pub fn reset(&self) -> Level {
        let level = self.initial;
        self.cell.set(level);
        metrics::record_level_change("reset", self.cell.get());
        tracing::dispatcher::with_default(&self.dispatch, || {
            tracing::info!(new_level = %level, "log level reset");
        });
        level
    }

    /// Route `prefix`, `prefix/` and everything below it to this handle.
    ///
    /// The handler sees the full request path, so `PUT <prefix>` without a
    /// level segment is answered as an unknown level named after the
    /// prefix's last component.
    pub fn mount<S>(&self, router: Router<S>, prefix: &str) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router
            .route_service(prefix, self.clone())
            .route_service(&format!("{prefix}/"), self.clone())
            .route_service(&format!("{prefix}/{{*level}}"), self.clone())
    }

    /// Handle one request given its method and path.
    pub fn respond(&self, method: &Method, path: &str) -> ControlResponse {
        match *method {
            Method::GET => ControlResponse::new(StatusCode::OK, self.level().to_string()),
            Method::PUT | Method::POST => self.respond_set(path),
            Method::DELETE => {
                self.reset();
                ControlResponse::empty(StatusCode::ACCEPTED)
            }
            _ => ControlResponse::empty(StatusCode::METHOD_NOT_ALLOWED),
        }
    }

    fn respond_set(&self, path: &str) -> ControlResponse {
        // Request paths arrive still percent-encoded.
        let path = percent_decode_str(path).decode_utf8_lossy();
        match path.rsplit('/').next() {
            None | Some("") => ControlResponse::new(StatusCode::BAD_REQUEST, USAGE_HINT),
            Some(segment) => match parse_level(segment) {
                Some(level) => {
                    self.set_level(level);
                    ControlResponse::empty(StatusCode::ACCEPTED)
                }
                None => {
                    let err = ParseLevelError {
                        input: segment.to_string(),
                    };
                    ControlResponse::new(StatusCode::BAD_REQUEST, err.to_string())
                }
            },
        }
    }
}

impl<B> Service<Request<B>> for LevelHandle {
    type Response = Response;
    type Error = Infallible;
    type Future = Ready<Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        let response = self.respond(request.method(), request.uri().path());
        ready(Ok(response.into_response()))
    }
}
