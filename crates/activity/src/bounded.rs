use std::future::Future;
use std::time::Duration;

/// Run a store call under `limit`, mapping elapsed time through `on_timeout`.
pub(crate) async fn bounded<F, T, S, E>(
    limit: Duration,
    fut: F,
    on_timeout: fn(Duration) -> E,
) -> Result<T, E>
where
    F: Future<Output = Result<T, S>>,
    E: From<S>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(E::from),
        Err(_) => Err(on_timeout(limit)),
    }
}
