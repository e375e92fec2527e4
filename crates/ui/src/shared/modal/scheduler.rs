use std::time::Duration;

pub type TeardownTask = Box<dyn FnOnce() + Send>;

/// Runs deferred teardown work after a delay.
pub trait TeardownScheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: TeardownTask);
}

/// Browser scheduler: a `setTimeout`-backed future on the local executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutScheduler;

impl TeardownScheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: TeardownTask) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        wasm_bindgen_futures::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(millis).await;
            task();
        });
    }
}

/// Native scheduler backed by a tokio runtime.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

#[cfg(not(target_arch = "wasm32"))]
impl TokioScheduler {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime the caller is running on.
    ///
    /// Panics outside a tokio runtime, like `tokio::spawn`.
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl TeardownScheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: TeardownTask) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}
