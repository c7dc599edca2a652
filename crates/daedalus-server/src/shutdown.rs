//! Stopping the server.
//!
//! Both halves are built on [`tokio::sync::watch`]: [`ShutdownSignal`] holds a
//! flag that flips once, [`ConnectionTracker`] holds the number of open
//! connections. Waiting on either is waiting for the watched value to reach
//! its target, which also covers the case where it already has.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::watch;

/// A one-shot stop flag shared by the accept loop and every connection.
///
/// ```rust
/// use daedalus_server::ShutdownSignal;
///
/// let shutdown = ShutdownSignal::new();
/// let observer = shutdown.clone();
///
/// shutdown.trigger();
/// assert!(observer.is_shutdown());
/// ```
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    flag: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    /// An untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }

    /// An untriggered signal that flips on SIGTERM or SIGINT, or Ctrl+C
    /// off unix. Spawns a task, so it needs a running Tokio runtime.
    #[must_use]
    pub fn with_os_signals() -> Self {
        let signal = Self::new();
        let flag = signal.clone();
        tokio::spawn(async move {
            if os_signal().await {
                flag.trigger();
            }
        });
        signal
    }

    /// Flips the flag. Later calls do nothing.
    pub fn trigger(&self) {
        self.flag.send_if_modified(|stopped| !std::mem::replace(stopped, true));
    }

    /// Whether [`trigger`](Self::trigger) has been called on any clone.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        *self.flag.borrow()
    }

    /// Completes once the flag is flipped.
    pub fn recv(&self) -> ShutdownReceiver {
        let mut flag = self.flag.subscribe();
        ShutdownReceiver {
            wait: Box::pin(async move {
                // The sender lives as long as `self`; an error means it is gone.
                let _ = flag.wait_for(|stopped| *stopped).await;
            }),
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Future returned by [`ShutdownSignal::recv`].
pub struct ShutdownReceiver {
    wait: Pin<Box<dyn Future<Output = ()> + Send>>,
}

impl std::fmt::Debug for ShutdownReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownReceiver").finish_non_exhaustive()
    }
}

impl Future for ShutdownReceiver {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.wait.as_mut().poll(cx)
    }
}

/// Resolves `true` on the first stop signal, `false` if no handler could be
/// installed.
async fn os_signal() -> bool {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let term = signal(SignalKind::terminate());
        let int = signal(SignalKind::interrupt());
        let (mut term, mut int) = match (term, int) {
            (Ok(term), Ok(int)) => (term, int),
            (Err(error), _) | (_, Err(error)) => {
                tracing::error!(%error, "cannot install signal handlers, shutdown needs an explicit trigger");
                return false;
            }
        };
        let name = tokio::select! {
            _ = term.recv() => "SIGTERM",
            _ = int.recv() => "SIGINT",
        };
        tracing::info!(signal = name, "stopping");
        true
    }

    #[cfg(not(unix))]
    {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!(signal = "ctrl-c", "stopping");
                true
            }
            Err(error) => {
                tracing::error!(%error, "cannot listen for ctrl-c, shutdown needs an explicit trigger");
                false
            }
        }
    }
}

/// Number of connections still being served.
///
/// ```rust
/// use daedalus_server::ConnectionTracker;
///
/// let tracker = ConnectionTracker::new();
/// let token = tracker.acquire();
/// assert_eq!(tracker.active_connections(), 1);
///
/// drop(token);
/// assert_eq!(tracker.active_connections(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    open: Arc<watch::Sender<usize>>,
}

impl ConnectionTracker {
    /// A tracker with nothing open.
    #[must_use]
    pub fn new() -> Self {
        let (open, _) = watch::channel(0);
        Self { open: Arc::new(open) }
    }

    /// Counts one more connection until the token is dropped.
    #[must_use]
    pub fn acquire(&self) -> ConnectionToken {
        self.open.send_modify(|open| *open += 1);
        ConnectionToken {
            open: Arc::clone(&self.open),
        }
    }

    /// Tokens currently alive.
    #[must_use]
    pub fn active_connections(&self) -> usize {
        *self.open.borrow()
    }

    /// Completes when no token is alive.
    pub async fn wait_for_shutdown(&self) {
        let mut open = self.open.subscribe();
        let _ = open.wait_for(|open| *open == 0).await;
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Held by a connection task for as long as it runs.
#[derive(Debug)]
pub struct ConnectionToken {
    open: Arc<watch::Sender<usize>>,
}

impl Drop for ConnectionToken {
    fn drop(&mut self) {
        self.open.send_modify(|open| *open -= 1);
    }
}
