use std::time::Duration;

use super::{Error, Result};

/// Races `call` against a timer and returns whichever resolves first.
///
/// When the timer wins, `call` is dropped and [`Error::DeadlineExceeded`] is returned.
pub async fn with_deadline<F, T>(deadline: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(Error::DeadlineExceeded(deadline)),
    }
}
