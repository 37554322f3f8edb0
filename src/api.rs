use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use prometheus::{Encoder, TextEncoder};

use crate::engine::StatsSource;
use crate::error::{Error, Result};
use crate::metrics::Collector;

async fn scrape<S>(State(collector): State<Arc<Collector<S>>>) -> Response
where
    S: StatsSource + Send + Sync + 'static,
{
    let families = collector.collect().await;
    let encoder = TextEncoder::new();
    let mut body = Vec::new();
    if let Err(err) = encoder.encode(&families, &mut body) {
        log::error!("Failed to encode metrics: {}", err);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed to encode metrics",
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type().to_owned())],
        body,
    )
        .into_response()
}

/// Serves the metric exposition on `/metrics` and `/`.
pub struct APIServer {
    router: axum::Router,
}

impl APIServer {
    pub fn new<S>(collector: Arc<Collector<S>>) -> Self
    where
        S: StatsSource + Send + Sync + 'static,
    {
        let router = axum::Router::new()
            .route("/", get(scrape::<S>))
            .route("/metrics", get(scrape::<S>))
            .with_state(collector);
        Self { router }
    }

    /// Binds `addr` and serves scrapes until the process terminates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bind`] if the address cannot be bound.
    pub async fn listen(self, addr: &str) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| Error::Bind {
                addr: addr.to_owned(),
                source,
            })?;
        log::info!("Listening on {}", addr);
        axum::serve(listener, self.router.into_make_service())
            .await
            .map_err(Error::Serve)
    }
}
