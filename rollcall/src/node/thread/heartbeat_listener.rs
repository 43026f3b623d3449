use super::*;

pub struct Thread {
    socket: Arc<UdpSocket>,
    event_tx: mpsc::UnboundedSender<Event>,
}

impl Thread {
    async fn run_once(&self) -> Result<()> {
        let mut buf = [0; 16];
        let (n, src) = self.socket.recv_from(&mut buf).await?;
        ensure!(
            &buf[..n] == transport::HEARTBEAT,
            "unexpected datagram from {src}"
        );
        let from = NodeAddress::from_heartbeat_source(src);
        self.event_tx.send(Event::Heartbeat(from)).ok();
        Ok(())
    }

    fn do_loop(self) -> ThreadHandle {
        let fut = async move {
            loop {
                if let Err(e) = self.run_once().await {
                    debug!("drop a datagram: {e}");
                }
            }
        };
        let hdl = tokio::spawn(fut).abort_handle();
        ThreadHandle(hdl)
    }
}

pub fn new(socket: Arc<UdpSocket>, event_tx: mpsc::UnboundedSender<Event>) -> ThreadHandle {
    Thread { socket, event_tx }.do_loop()
}
