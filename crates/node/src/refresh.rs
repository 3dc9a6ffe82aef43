//! Background ring-refresh loop: a safety net re-deriving the ring from
//! membership every ~0.5s, in case a per-request refresh is elided.
//!
//! Same owned-task discipline as `membership::MembershipHandle`: `start`
//! returns a handle, `stop` cancels it, `Drop` cancels it too.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::facade::NodeFacade;

pub struct RingRefreshHandle {
    task: Option<JoinHandle<()>>,
}

impl RingRefreshHandle {
    pub fn new() -> Self {
        Self { task: None }
    }

    pub fn start(&mut self, facade: Arc<NodeFacade>, interval: Duration) {
        if self.task.is_some() {
            return;
        }
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                facade.refresh_ring();
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Default for RingRefreshHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RingRefreshHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
