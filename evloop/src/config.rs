//! Event loop configuration.

use std::thread;
use std::time::Duration;
use tracing::error;

/// Delay the run task sleeps for when there is no work and no idle handler.
pub const DEFAULT_IDLE_DELAY: Duration = Duration::from_millis(10);

/// Interval between quiescence checks in [`EventLoop::sync`](crate::EventLoop::sync).
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration options for an [`EventLoop`](crate::EventLoop).
///
/// # Examples
///
/// ```rust
/// use evloop::{EventLoop, EventLoopConfig};
/// use std::time::Duration;
///
/// let config = EventLoopConfig {
///     idle_delay: Duration::from_millis(1),
///     ..Default::default()
/// };
///
/// let event_loop = EventLoop::with_config("fast", config);
/// assert_eq!(event_loop.config().idle_delay, Duration::from_millis(1));
/// ```
#[derive(Debug, Clone)]
pub struct EventLoopConfig {
    /// How long the run task sleeps on an idle iteration without an idle handler.
    pub idle_delay: Duration,

    /// How often `sync` re-checks whether the loop is empty.
    pub sync_interval: Duration,

    /// Name of the run thread. A name containing a NUL byte makes `start` fail.
    pub thread_name: Option<String>,

    /// How fire-and-forget handlers are launched.
    pub spawner: TaskSpawner,
}

impl Default for EventLoopConfig {
    fn default() -> Self {
        Self {
            idle_delay: DEFAULT_IDLE_DELAY,
            sync_interval: DEFAULT_SYNC_INTERVAL,
            thread_name: None,
            spawner: TaskSpawner::default(),
        }
    }
}

/// Launches fire-and-forget handler callbacks.
///
/// The dispatch algorithm never waits for a spawned task and never sees its
/// result.
#[derive(Debug, Clone, Default)]
pub enum TaskSpawner {
    /// Run each callback on a new detached OS thread.
    #[default]
    Thread,

    /// Run each callback on the blocking pool of a Tokio runtime.
    #[cfg(feature = "async")]
    Tokio(tokio::runtime::Handle),
}

impl TaskSpawner {
    /// Spawner for the Tokio runtime entered by the calling thread, if any.
    #[cfg(feature = "async")]
    pub fn current_tokio() -> Option<Self> {
        tokio::runtime::Handle::try_current().ok().map(Self::Tokio)
    }

    /// Launches `task` without waiting for it.
    ///
    /// `origin` names the handler in the log if the task cannot be launched.
    pub fn spawn<F>(&self, origin: &str, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match self {
            Self::Thread => {
                if let Err(error) = thread::Builder::new().spawn(task) {
                    error!(handler = %origin, %error, "failed to spawn fire-and-forget thread");
                }
            }
            #[cfg(feature = "async")]
            Self::Tokio(handle) => {
                drop(handle.spawn_blocking(task));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_default_config() {
        let config = EventLoopConfig::default();
        assert_eq!(config.idle_delay, Duration::from_millis(10));
        assert_eq!(config.sync_interval, Duration::from_millis(100));
        assert!(config.thread_name.is_none());
        assert!(matches!(config.spawner, TaskSpawner::Thread));
    }

    #[test]
    fn test_thread_spawner_runs_task() {
        let (sender, receiver) = mpsc::channel();
        TaskSpawner::Thread.spawn("test", move || sender.send(7).unwrap());
        assert_eq!(receiver.recv_timeout(Duration::from_secs(5)), Ok(7));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_tokio_spawner_runs_task() {
        let spawner = TaskSpawner::current_tokio().expect("inside a runtime");
        let (sender, receiver) = tokio::sync::oneshot::channel();
        spawner.spawn("test", move || {
            let _ = sender.send("done");
        });
        assert_eq!(receiver.await, Ok("done"));
    }

    #[cfg(feature = "async")]
    #[test]
    fn test_no_tokio_spawner_outside_runtime() {
        assert!(TaskSpawner::current_tokio().is_none());
    }
}
