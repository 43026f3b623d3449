use super::*;

pub struct Thread {
    id: NodeAddress,
    interval: Duration,
    status_rx: watch::Receiver<Status>,
    transport: Arc<dyn Transport>,
}

impl Thread {
    fn run_once(&self) {
        let view = self.status_rx.borrow().view.clone();
        let mut out = Outbox::new();
        for peer in view.peers(&self.id) {
            out.heartbeat(peer);
        }
        transport::dispatch(&self.transport, self.id, out);
    }

    fn do_loop(self) -> ThreadHandle {
        let fut = async move {
            let mut interval = tokio::time::interval(self.interval);
            loop {
                interval.tick().await;
                self.run_once();
            }
        };
        let hdl = tokio::spawn(fut).abort_handle();
        ThreadHandle(hdl)
    }
}

/// Heartbeats go to the current view regardless of other traffic.
pub fn new(
    id: NodeAddress,
    interval: Duration,
    status_rx: watch::Receiver<Status>,
    transport: Arc<dyn Transport>,
) -> ThreadHandle {
    Thread {
        id,
        interval,
        status_rx,
        transport,
    }
    .do_loop()
}
