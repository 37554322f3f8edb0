use std::path::PathBuf;

use crate::error::{Error, Result};

const UNIX_SCHEME: &str = "unix://";

/// Command-line configuration of the exporter.
#[derive(Debug, Clone, clap::Parser)]
#[command(version, about = "Exports Podman container statistics as Prometheus metrics")]
pub struct Config {
    /// Address to listen on; a leading `:` listens on all interfaces
    #[arg(short = 'l', long = "listen", default_value = ":9901")]
    pub listen: String,

    /// Podman service endpoint, e.g. `unix:///run/podman/podman.sock`
    #[arg(
        long = "url",
        env = "CONTAINER_HOST",
        default_value = "unix:///run/podman/podman.sock"
    )]
    pub url: String,
}

impl Config {
    /// Returns the listen address in a form accepted by the socket layer.
    ///
    /// A bare `:port` binds the IPv6 wildcard, which also accepts IPv4
    /// connections unless the host disables dual-stack sockets.
    pub fn listen_addr(&self) -> String {
        if self.listen.starts_with(':') {
            format!("[::]{}", self.listen)
        } else {
            self.listen.clone()
        }
    }

    /// Resolves the unix socket of the engine from the configured url.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEngineUrl`] for anything but a `unix://` url or an
    /// absolute path.
    pub fn socket_path(&self) -> Result<PathBuf> {
        let path = self.url.strip_prefix(UNIX_SCHEME).unwrap_or(&self.url);
        if !path.starts_with('/') {
            return Err(Error::InvalidEngineUrl(self.url.clone()));
        }

        Ok(PathBuf::from(path))
    }
}
