//! Run synchronous work on the runtime's blocking pool.

use crate::foundation::error::{EditError, EditResult};

/// Execute `f` on a blocking worker and await its result.
///
/// The closure's own error is returned unchanged. A panic inside `f` is resumed in the
/// awaiting task. Dropping the returned future does not stop `f`; its result is discarded.
///
/// Must be awaited from within a tokio runtime.
pub async fn offload<F, T>(f: F) -> EditResult<T>
where
    F: FnOnce() -> EditResult<T> + Send + 'static,
    T: Send + 'static,
{
    tracing::trace!("offload submit");
    match tokio::task::spawn_blocking(f).await {
        Ok(out) => {
            tracing::trace!(ok = out.is_ok(), "offload complete");
            out
        }
        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
        Err(err) => Err(EditError::offload(format!("worker did not complete: {err}"))),
    }
}

#[cfg(test)]
#[path = "../tests/unit/offload.rs"]
mod tests;
