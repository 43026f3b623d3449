use super::*;

/// The only owner of the protocol state.
/// Every other thread talks to it through events.
pub struct Thread {
    process: MembershipProcess,
    detector: FailureDetector,
    event_rx: mpsc::UnboundedReceiver<Event>,
    status_tx: watch::Sender<Status>,
    transport: Arc<dyn Transport>,
}

impl Thread {
    fn start(&mut self) {
        let mut out = Outbox::new();
        self.process.start(&mut out);
        self.after_event(out);
    }

    async fn run_once(&mut self) -> Result<()> {
        let event = self
            .event_rx
            .recv()
            .await
            .context("event channel is closed")?;

        let now = Instant::now();
        let mut out = Outbox::new();
        match event {
            Event::Inbound(envelope) => self.process.receive(envelope, &mut out),
            Event::Heartbeat(from) => self.detector.receive_heartbeat(&from, now),
            Event::LivenessCheck => {
                let suspects = self.detector.suspects(now);
                if !suspects.is_empty() {
                    info!("no heartbeat from {suspects:?}");
                }
                self.process.check_liveness(suspects, &mut out);
            }
            Event::Submit(change) => self.process.submit(change, &mut out),
        }
        self.after_event(out);
        Ok(())
    }

    fn after_event(&mut self, out: Outbox) {
        let id = self.process.id();
        self.detector
            .track(self.process.view().peers(&id), Instant::now());

        transport::dispatch(&self.transport, id, out);

        let status = self.process.status();
        self.status_tx.send_if_modified(|cur| {
            if *cur == status {
                return false;
            }
            *cur = status;
            true
        });
    }

    fn do_loop(mut self) -> ThreadHandle {
        let fut = async move {
            self.start();
            loop {
                if let Err(e) = self.run_once().await {
                    debug!("event loop stopped: {e}");
                    break;
                }
            }
        };
        let hdl = tokio::spawn(fut).abort_handle();
        ThreadHandle(hdl)
    }
}

pub fn new(
    process: MembershipProcess,
    suspect_timeout: Duration,
    event_rx: mpsc::UnboundedReceiver<Event>,
    status_tx: watch::Sender<Status>,
    transport: Arc<dyn Transport>,
) -> ThreadHandle {
    Thread {
        process,
        detector: FailureDetector::new(suspect_timeout),
        event_rx,
        status_tx,
        transport,
    }
    .do_loop()
}
