use super::*;

pub mod control_listener;
pub mod event_loop;
pub mod heartbeat;
pub mod heartbeat_listener;
pub mod liveness_check;

use tokio::task::AbortHandle;

/// Wrapper around a `AbortHandle` that aborts it is dropped.
pub struct ThreadHandle(pub AbortHandle);

impl Drop for ThreadHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}
