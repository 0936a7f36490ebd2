//! Call statistics for selected routes.
//!
//! [`CallMonitor::layer`] produces a tower layer that wraps a single
//! handler. Each call through it is timed and counted under the operation
//! name given at registration; [`monitoring_snapshot`] serves the totals.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, PoisonError},
    task::{Context, Poll},
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{Json, Response},
};
use futures::future::BoxFuture;
use serde::Serialize;
use tower::{Layer, Service};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CallStats {
    pub calls: u64,
    /// Calls answered with a 4xx or 5xx status.
    pub failures: u64,
    pub total_micros: u64,
    pub max_micros: u64,
}

impl CallStats {
    fn record(&mut self, failed: bool, elapsed: Duration) {
        let micros = saturating_micros(elapsed);
        self.calls += 1;
        if failed {
            self.failures += 1;
        }
        self.total_micros = self.total_micros.saturating_add(micros);
        self.max_micros = self.max_micros.max(micros);
    }
}

fn saturating_micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonitorSnapshot {
    pub operations: BTreeMap<String, CallStats>,
}

#[derive(Debug, Clone, Default)]
pub struct CallMonitor {
    stats: Arc<Mutex<BTreeMap<&'static str, CallStats>>>,
}

impl CallMonitor {
    pub fn new() -> Self { Self::default() }

    pub fn record(
        &self, operation: &'static str, status: StatusCode, elapsed: Duration,
    ) {
        let failed = status.is_client_error() || status.is_server_error();
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(operation)
            .or_default()
            .record(failed, elapsed);

        tracing::info!(
            monitored.operation = operation,
            monitored.status = status.as_u16(),
            monitored.elapsed_us = saturating_micros(elapsed),
            "Monitored call completed"
        );
    }

    pub fn stats(&self, operation: &str) -> Option<CallStats> {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(operation)
            .copied()
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        let stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        MonitorSnapshot {
            operations: stats
                .iter()
                .map(|(name, stats)| ((*name).to_string(), *stats))
                .collect(),
        }
    }

    /// Layer recording every call of the wrapped handler as `operation`.
    pub fn layer(&self, operation: &'static str) -> MonitoredLayer {
        MonitoredLayer {
            monitor: self.clone(),
            operation,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonitoredLayer {
    monitor: CallMonitor,
    operation: &'static str,
}

impl<S> Layer<S> for MonitoredLayer {
    type Service = Monitored<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Monitored {
            inner,
            monitor: self.monitor.clone(),
            operation: self.operation,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Monitored<S> {
    inner: S,
    monitor: CallMonitor,
    operation: &'static str,
}

impl<S> Service<Request> for Monitored<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response, S::Error>>;
    type Response = Response;

    fn poll_ready(
        &mut self, cx: &mut Context<'_>,
    ) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        // The clone may not be ready; keep the instance poll_ready drove.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let monitor = self.monitor.clone();
        let operation = self.operation;

        Box::pin(async move {
            let started = Instant::now();
            let result = inner.call(req).await;
            if let Ok(response) = &result {
                monitor.record(operation, response.status(), started.elapsed());
            }
            result
        })
    }
}

#[utoipa::path(
    get,
    path = "/monitoring",
    responses(
        (status = 200, description = "Call statistics of monitored operations", body = MonitorSnapshot)
    ),
    tag = "monitoring"
)]
pub async fn monitoring_snapshot(
    State(monitor): State<CallMonitor>,
) -> Json<MonitorSnapshot> {
    Json(monitor.snapshot())
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Method, Request},
        routing::{get, post},
    };
    use tower::ServiceExt;

    use super::*;

    fn app(monitor: &CallMonitor) -> Router {
        Router::new()
            .route(
                "/things",
                post(|| async { StatusCode::CREATED })
                    .layer(monitor.layer("createThing")),
            )
            .route("/things", get(|| async { "all" }))
            .route(
                "/broken",
                post(|| async { StatusCode::BAD_REQUEST })
                    .layer(monitor.layer("breakThing")),
            )
    }

    async fn send(app: Router, method: Method, uri: &str) -> StatusCode {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_only_layered_routes_are_counted() {
        let monitor = CallMonitor::new();
        let app = app(&monitor);

        assert_eq!(
            send(app.clone(), Method::POST, "/things").await,
            StatusCode::CREATED
        );
        send(app.clone(), Method::POST, "/things").await;
        send(app.clone(), Method::GET, "/things").await;

        let stats = monitor.stats("createThing").unwrap();
        assert_eq!(stats.calls, 2);
        assert_eq!(stats.failures, 0);
        assert!(stats.max_micros <= stats.total_micros);
        assert_eq!(monitor.snapshot().operations.len(), 1);
    }

    #[tokio::test]
    async fn test_error_status_counts_as_failure() {
        let monitor = CallMonitor::new();

        send(app(&monitor), Method::POST, "/broken").await;

        let stats = monitor.stats("breakThing").unwrap();
        assert_eq!(stats.calls, 1);
        assert_eq!(stats.failures, 1);
    }

    #[tokio::test]
    async fn test_snapshot_endpoint() {
        let monitor = CallMonitor::new();
        monitor.record("updateThing", StatusCode::OK, Duration::from_micros(40));
        let app = Router::new()
            .route("/monitoring", get(monitoring_snapshot))
            .with_state(monitor);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/monitoring")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["operations"]["updateThing"]["calls"], 1);
        assert_eq!(json["operations"]["updateThing"]["total_micros"], 40);
    }

    #[test]
    fn test_oversized_latency_saturates() {
        let monitor = CallMonitor::new();
        monitor.record("createThing", StatusCode::CREATED, Duration::MAX);
        monitor.record("createThing", StatusCode::CREATED, Duration::MAX);

        let stats = monitor.stats("createThing").unwrap();
        assert_eq!(stats.calls, 2);
        assert_eq!(stats.max_micros, u64::MAX);
        assert_eq!(stats.total_micros, u64::MAX);
    }
}
