//! The concurrency scope a store runs in.

use std::future::Future;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A runtime handle paired with a cancellation token.
///
/// Stores spawn all of their work onto the handle and run under a child of
/// the token, so cancelling a scope disposes every store built on it while
/// disposing one store leaves the scope and its siblings running.
#[derive(Clone, Debug)]
pub struct Scope {
    handle: Handle,
    token: CancellationToken,
}

impl Scope {
    /// A scope on `handle` with a fresh token.
    pub fn new(handle: Handle) -> Self {
        Self::with_token(handle, CancellationToken::new())
    }

    pub fn with_token(handle: Handle, token: CancellationToken) -> Self {
        Self { handle, token }
    }

    /// A scope on the runtime the caller is running in, if any.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    /// A scope on the same runtime whose token is a child of this one.
    pub fn child(&self) -> Self {
        Self::with_token(self.handle.clone(), self.token.child_token())
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Spawn `future`, abandoning it at its next suspension point once the
    /// scope is cancelled. Resolves to `None` when abandoned.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<Option<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let token = self.token.clone();
        self.handle.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => None,
                output = future => Some(output),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn current_captures_ambient_runtime() {
        let scope = Scope::current().expect("inside a runtime");
        assert!(!scope.is_cancelled());
        assert_eq!(scope.spawn(async { 7 }).await.unwrap(), Some(7));
    }

    #[test]
    fn current_is_none_outside_a_runtime() {
        assert!(Scope::current().is_none());
    }

    #[tokio::test]
    async fn cancelling_parent_cancels_child() {
        let parent = Scope::current().unwrap();
        let child = parent.child();

        parent.cancel();

        assert!(child.is_cancelled());
    }

    #[tokio::test]
    async fn cancelling_child_leaves_parent_running() {
        let parent = Scope::current().unwrap();
        let child = parent.child();

        child.cancel();

        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn spawn_is_abandoned_on_cancel() {
        let scope = Scope::current().unwrap();
        let task = scope.spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            1
        });

        scope.cancel();

        assert_eq!(task.await.unwrap(), None);
    }
}
