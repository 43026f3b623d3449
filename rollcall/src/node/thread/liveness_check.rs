use super::*;

pub struct Thread {
    interval: Duration,
    event_tx: mpsc::UnboundedSender<Event>,
}

impl Thread {
    fn run_once(&self) -> Result<()> {
        self.event_tx
            .send(Event::LivenessCheck)
            .ok()
            .context("event loop is gone")
    }

    fn do_loop(self) -> ThreadHandle {
        let fut = async move {
            // The first check comes one period after startup.
            let start = tokio::time::Instant::now() + self.interval;
            let mut interval = tokio::time::interval_at(start, self.interval);
            loop {
                interval.tick().await;
                if self.run_once().is_err() {
                    break;
                }
            }
        };
        let hdl = tokio::spawn(fut).abort_handle();
        ThreadHandle(hdl)
    }
}

pub fn new(interval: Duration, event_tx: mpsc::UnboundedSender<Event>) -> ThreadHandle {
    Thread { interval, event_tx }.do_loop()
}
