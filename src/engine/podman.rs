use std::path::PathBuf;
use std::time::Duration;

use http_body_util::BodyExt;
use hyper::body::Bytes;

use super::models::{ContainerStatSample, ErrorResponse, StatsReport};
use super::{Error, Result, StatsSource, with_deadline};
use crate::unix::{self, UnixConnector};

/// Path prefix of the versioned libpod REST API.
const API_PREFIX: &str = "/v4.0.0/libpod";

/// Deadline applied to every engine call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Stateless handle to a Podman service listening on a unix socket.
///
/// Every call opens its own connection, so a client can be shared freely
/// between concurrent scrapes.
#[derive(Debug, Clone)]
pub struct PodmanClient {
    connector: UnixConnector,
    timeout: Duration,
}

impl PodmanClient {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            connector: UnixConnector::new(socket_path),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checks that the service answers within the deadline.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be reached, the service responds
    /// with a non-success status or the deadline elapses.
    pub async fn ping(&self) -> Result<()> {
        let path = format!("{API_PREFIX}/_ping");
        with_deadline(self.timeout, self.get_body(&path)).await?;
        Ok(())
    }

    /// Fetches a single statistics snapshot of all running containers.
    ///
    /// No container filter is sent, so the engine reports every running
    /// container. Samples are returned in the order the engine listed them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeadlineExceeded`] if the engine does not answer within
    /// the configured timeout, or the engine or transport error otherwise.
    pub async fn container_stats(&self) -> Result<Vec<ContainerStatSample>> {
        let path = format!("{API_PREFIX}/containers/stats?stream=false");
        let body = with_deadline(self.timeout, self.get_body(&path)).await?;

        let report: StatsReport = serde_json::from_slice(&body).map_err(Error::Decode)?;
        if let Some(message) = report.error_message() {
            return Err(Error::Engine(message));
        }

        Ok(report.stats.unwrap_or_default())
    }

    async fn get_body(&self, path: &str) -> Result<Bytes> {
        let response = unix::get(&self.connector, path).await?;
        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(Error::Body)?
            .to_bytes();

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .map(|err| err.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).trim().to_owned());
            return Err(Error::Status { status, message });
        }

        Ok(body)
    }
}

impl StatsSource for PodmanClient {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<ContainerStatSample>>> + Send {
        self.container_stats()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;

    use super::*;

    const STATS_PATH: &str = "/v4.0.0/libpod/containers/stats";

    async fn serve_fake_engine(router: axum::Router) -> (tempfile::TempDir, PathBuf) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("podman.sock");
        let listener = tokio::net::UnixListener::bind(&path).unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        (tempdir, path)
    }

    fn stats_route(status: StatusCode, body: &'static str) -> axum::Router {
        axum::Router::new().route(
            STATS_PATH,
            get(move |Query(params): Query<HashMap<String, String>>| async move {
                if params.get("stream").map(String::as_str) != Some("false") {
                    return (StatusCode::BAD_REQUEST, "expected stream=false");
                }
                if params.contains_key("containers") {
                    return (StatusCode::BAD_REQUEST, "unexpected container filter");
                }
                (status, body)
            }),
        )
    }

    #[tokio::test]
    async fn test_container_stats_preserves_engine_order() {
        let body = r#"{"Error": null, "Stats": [
            {"ContainerID": "bbb", "Name": "second", "PIDs": 2, "CPU": 1.5},
            {"ContainerID": "aaa", "Name": "first", "PIDs": 7, "MemUsage": 4096}
        ]}"#;
        let (_dir, path) = serve_fake_engine(stats_route(StatusCode::OK, body)).await;

        let stats = PodmanClient::new(path).container_stats().await.unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].container_id, "bbb");
        assert_eq!(stats[0].pids, 2);
        assert_eq!(stats[0].cpu, 1.5);
        assert_eq!(stats[1].container_id, "aaa");
        assert_eq!(stats[1].name, "first");
        assert_eq!(stats[1].mem_usage, 4096);
    }

    #[tokio::test]
    async fn test_container_stats_null_stats_is_empty() {
        let body = r#"{"Error": null, "Stats": null}"#;
        let (_dir, path) = serve_fake_engine(stats_route(StatusCode::OK, body)).await;

        let stats = PodmanClient::new(path).fetch_all().await.unwrap();
        assert!(stats.is_empty());
    }

    #[tokio::test]
    async fn test_container_stats_engine_error_member() {
        let body = r#"{"Error": "unable to obtain cgroup stats", "Stats": []}"#;
        let (_dir, path) = serve_fake_engine(stats_route(StatusCode::OK, body)).await;

        let err = PodmanClient::new(path).container_stats().await.unwrap_err();
        assert!(matches!(err, Error::Engine(msg) if msg == "unable to obtain cgroup stats"));
    }

    #[tokio::test]
    async fn test_container_stats_error_status() {
        let body = r#"{"cause": "x", "message": "stats are not supported", "response": 500}"#;
        let (_dir, path) =
            serve_fake_engine(stats_route(StatusCode::INTERNAL_SERVER_ERROR, body)).await;

        let err = PodmanClient::new(path).container_stats().await.unwrap_err();
        match err {
            Error::Status { status, message } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(message, "stats are not supported");
            }
            other => panic!("Expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_container_stats_invalid_json() {
        let (_dir, path) = serve_fake_engine(stats_route(StatusCode::OK, "not json")).await;

        let err = PodmanClient::new(path).container_stats().await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_container_stats_deadline_exceeded() {
        let router = axum::Router::new().route(
            STATS_PATH,
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                r#"{"Error": null, "Stats": []}"#
            }),
        );
        let (_dir, path) = serve_fake_engine(router).await;
        let timeout = Duration::from_millis(50);

        let err = PodmanClient::new(path)
            .with_timeout(timeout)
            .container_stats()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DeadlineExceeded(d) if d == timeout));
    }

    #[tokio::test]
    async fn test_container_stats_missing_socket() {
        let tempdir = tempfile::tempdir().unwrap();
        let client = PodmanClient::new(tempdir.path().join("podman.sock"));

        let err = client.container_stats().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Transport(unix::Error::Connect { .. })
        ));
    }

    #[tokio::test]
    async fn test_ping() {
        let router = axum::Router::new().route("/v4.0.0/libpod/_ping", get(|| async { "OK" }));
        let (_dir, path) = serve_fake_engine(router).await;

        PodmanClient::new(path).ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_ping_unknown_route() {
        let (_dir, path) = serve_fake_engine(axum::Router::new()).await;

        let err = PodmanClient::new(path).ping().await.unwrap_err();
        assert!(matches!(err, Error::Status { status, .. } if status == StatusCode::NOT_FOUND));
    }
}
