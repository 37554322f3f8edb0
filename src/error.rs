use std::path::PathBuf;

/// Logs the error of a [`Result`] and discards it.
pub trait ResultOkLogExt<T, E> {
    fn ok_log(self, context: &str) -> Option<T>;
}

impl<T, E> ResultOkLogExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn ok_log(self, context: &str) -> Option<T> {
        match self {
            Ok(ok) => Some(ok),
            Err(err) => {
                log::error!("{context}: {err}");
                None
            }
        }
    }
}

/// Fatal errors that stop the exporter before or while serving.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported engine url `{0}`: expected `unix:///path/to/socket` or an absolute path")]
    InvalidEngineUrl(String),
    #[error("failed to reach engine at `{path}`: {source}")]
    EngineInit {
        path: PathBuf,
        #[source]
        source: crate::engine::Error,
    },
    #[error("failed to register metrics: {0}")]
    Registry(#[source] prometheus::Error),
    #[error("failed to bind `{addr}`: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_log() {
        let ok: std::result::Result<u8, std::io::Error> = Ok(3);
        assert_eq!(ok.ok_log("unused"), Some(3));

        let err: std::result::Result<u8, std::io::Error> =
            Err(std::io::Error::other("broken pipe"));
        assert_eq!(err.ok_log("failed to read"), None);
    }
}
