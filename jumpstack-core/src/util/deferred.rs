//!  src/util/deferred.rs
//!  ===================================================================
//!  Cancellable delayed jobs
//!
//!  • A job runs once, `delay` after it was scheduled, on the Tokio
//!    runtime the caller is running in.
//!  • Scheduling again replaces the pending job: the earlier sleeper is
//!    aborted before it fires, so rapid selections never stack up.
//!  • Dropping the handle aborts whatever is still pending.

use std::time::Duration;
use tokio::{task::JoinHandle, time::sleep};
use tracing::{debug, trace};

/* ========================== DeferredTask ============================ */

#[derive(Debug)]
pub struct DeferredTask {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl DeferredTask {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Applies to jobs scheduled from now on.
    pub const fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Run `job` after the delay, cancelling any job still waiting.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&mut self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.cancel() {
            debug!("Replaced pending deferred job");
        }

        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            trace!(?delay, "Deferred job firing");
            job();
        }));
    }

    /// Abort the pending job. Returns true if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for DeferredTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
