use std::path::{Path, PathBuf};
use std::{pin, task};

use hyper::body::Incoming;
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use tower::ServiceExt;

/// Opens a fresh stream to a unix socket for every requested URI.
///
/// The URI is ignored; every connection goes to the same socket.
#[derive(Debug, Clone)]
pub struct UnixConnector {
    path: PathBuf,
}

impl UnixConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl tower::Service<hyper::Uri> for UnixConnector {
    type Response = TokioIo<tokio::net::UnixStream>;

    type Error = std::io::Error;

    type Future = pin::Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: hyper::Uri) -> Self::Future {
        let path = self.path.clone();
        Box::pin(async move {
            let stream = tokio::net::UnixStream::connect(path).await?;

            Ok(TokioIo::new(stream))
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to connect to socket `{path}`: {source}")]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid request `{path}`: {source}")]
    InvalidRequest {
        path: String,
        #[source]
        source: hyper::http::Error,
    },
    #[error("HTTP handshake failed: {0}")]
    Handshake(#[source] hyper::Error),
    #[error("failed to send request: {0}")]
    Request(#[source] hyper::Error),
}

/// Sends a single bodiless GET request over a new HTTP/1 connection to the socket.
///
/// The connection driver runs on its own task and ends once the response body
/// has been consumed or dropped.
pub async fn get(
    connector: &UnixConnector,
    path_and_query: &str,
) -> Result<hyper::Response<Incoming>, Error> {
    log::trace!("Connecting to {}...", connector.path().display());
    let uri = hyper::Uri::from_static("http://d/");
    let io = connector
        .clone()
        .oneshot(uri)
        .await
        .map_err(|source| Error::Connect {
            path: connector.path().to_path_buf(),
            source,
        })?;

    let (mut sender, conn) = http1::handshake(io).await.map_err(Error::Handshake)?;
    tokio::spawn(async move {
        if let Err(err) = conn.await {
            log::debug!("engine connection ended: {err}");
        }
    });

    let req = hyper::Request::get(path_and_query)
        .header(hyper::header::HOST, "d")
        .body(http_body_util::Empty::<hyper::body::Bytes>::new())
        .map_err(|source| Error::InvalidRequest {
            path: path_and_query.to_owned(),
            source,
        })?;

    sender.send_request(req).await.map_err(Error::Request)
}
