use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

/// Periodic background work on a dedicated thread with its own tokio
/// runtime, kept apart from the request-serving runtime.
pub(crate) struct Runtime {
    worker_threads: usize,
    interval: Duration,
    started: AtomicBool,
    thread: Mutex<Option<std::thread::JoinHandle<()>>>,
}

impl Runtime {
    pub(crate) fn new(worker_threads: usize, interval: Duration) -> Self {
        Self {
            worker_threads,
            interval,
            started: AtomicBool::new(false),
            thread: Mutex::new(None),
        }
    }

    /// Runs `task` immediately and then once per interval. Only the first
    /// call starts the loop.
    pub(crate) fn start<F>(&self, task: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.started.swap(true, Ordering::SeqCst) {
            tracing::warn!("telemetry runtime already started");
            return;
        }

        let worker_threads = self.worker_threads;
        let interval = self.interval;
        let task = Arc::new(task);

        let spawned = std::thread::Builder::new()
            .name("telemetry".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_multi_thread()
                    .worker_threads(worker_threads)
                    .thread_name("telemetry-worker")
                    .enable_time()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        tracing::error!("could not build telemetry runtime: {}", e);
                        return;
                    }
                };

                runtime.block_on(async move {
                    let mut ticker = tokio::time::interval(interval);
                    loop {
                        ticker.tick().await;
                        let task = Arc::clone(&task);
                        if let Err(e) = tokio::task::spawn_blocking(move || task()).await
                        {
                            tracing::error!("telemetry task failed: {}", e);
                        }
                    }
                });
            });

        match spawned {
            Ok(handle) => *self.thread.lock() = Some(handle),
            Err(e) => {
                self.started.store(false, Ordering::SeqCst);
                tracing::error!("could not spawn telemetry thread: {}", e);
            }
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.thread
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}
