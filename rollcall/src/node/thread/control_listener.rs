use super::*;

pub struct Thread {
    listener: TcpListener,
    event_tx: mpsc::UnboundedSender<Event>,
}

impl Thread {
    async fn run_once(&self) -> Result<()> {
        let (stream, peer) = self.listener.accept().await?;
        let event_tx = self.event_tx.clone();
        // One connection carries one message.
        tokio::spawn(async move {
            match transport::read_envelope(stream).await {
                Ok(envelope) => {
                    event_tx.send(Event::Inbound(envelope)).ok();
                }
                Err(e) => warn!("drop a message from {peer}: {e:#}"),
            }
        });
        Ok(())
    }

    fn do_loop(self) -> ThreadHandle {
        let fut = async move {
            loop {
                if let Err(e) = self.run_once().await {
                    warn!("failed to accept a connection: {e}");
                }
            }
        };
        let hdl = tokio::spawn(fut).abort_handle();
        ThreadHandle(hdl)
    }
}

pub fn new(listener: TcpListener, event_tx: mpsc::UnboundedSender<Event>) -> ThreadHandle {
    Thread { listener, event_tx }.do_loop()
}
