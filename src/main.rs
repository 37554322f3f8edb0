use clap::Parser;

/// Entry point for the Podman Exporter.
///
/// Parses the command line, connects to the Podman service and serves
/// Prometheus metrics until the process is terminated.
///
/// # Errors
///
/// Returns an error if the engine cannot be reached at startup or the listen
/// address cannot be bound.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=info podman-exporter -l :9901 --url unix:///run/podman/podman.sock
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let config = podman_exporter::Config::parse();
    podman_exporter::run(config).await?;
    Ok(())
}
