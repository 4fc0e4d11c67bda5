//! Completion-style dispatch of calls onto the tokio worker pool

use crate::error::{ClientError, Result};
use std::future::Future;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Spawns calls onto a tokio runtime.
///
/// Calls are independent: there is no ordering between two spawned calls and
/// each one owns its single in-flight request. Dropping the returned
/// [`JoinHandle`] detaches the call; aborting it cancels the request.
#[derive(Debug, Clone)]
pub struct AsyncExecutor {
    handle: Handle,
}

impl AsyncExecutor {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Executor for the runtime the caller is running on
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| ClientError::Config(format!("No tokio runtime available: {}", e)))
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle.spawn(future)
    }

    /// Run `future` and hand its output to `on_complete` exactly once
    pub fn submit<F, C>(&self, future: F, on_complete: C) -> JoinHandle<()>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
        C: FnOnce(F::Output) + Send + 'static,
    {
        self.handle.spawn(async move {
            let output = future.await;
            on_complete(output);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_spawn_returns_output() {
        let executor = AsyncExecutor::current().unwrap();
        let handle = executor.spawn(async { 21 * 2 });
        assert_eq!(handle.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_submit_invokes_callback_once() {
        let executor = AsyncExecutor::current().unwrap();
        let (tx, rx) = oneshot::channel();

        let handle = executor.submit(async { "done".to_string() }, move |value| {
            let _ = tx.send(value);
        });

        handle.await.unwrap();
        assert_eq!(rx.await.unwrap(), "done");
    }

    #[test]
    fn test_current_without_runtime() {
        assert!(AsyncExecutor::current().is_err());
    }
}
