use super::*;

mod codec;
pub use codec::EnvelopeCodec;

use futures::{SinkExt, StreamExt};
use process::{Outbound, Outbox};
use tokio::net::{TcpStream, UdpSocket};
use tokio_util::codec::{FramedRead, FramedWrite};

/// Payload of a heartbeat datagram.
pub const HEARTBEAT: &[u8] = b"ping";

const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Outbound side of the network.
/// Implementations deliver at most once and give no ordering between calls.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, to: NodeAddress, envelope: Envelope) -> Result<()>;
    async fn send_heartbeat(&self, to: NodeAddress) -> Result<()>;
}

/// Control messages over short-lived TCP connections, heartbeats over UDP.
pub struct NetTransport {
    heartbeat_socket: Arc<UdpSocket>,
}

impl NetTransport {
    /// Heartbeats leave from `heartbeat_socket` so that receivers can tell
    /// the sender from the source address.
    pub fn new(heartbeat_socket: Arc<UdpSocket>) -> Self {
        Self { heartbeat_socket }
    }
}

#[async_trait::async_trait]
impl Transport for NetTransport {
    async fn send(&self, to: NodeAddress, envelope: Envelope) -> Result<()> {
        let stream = TcpStream::connect(to.control_addr()).await?;
        let mut framed = FramedWrite::new(stream, EnvelopeCodec::new());
        framed.send(envelope).await?;
        framed.close().await?;
        Ok(())
    }

    async fn send_heartbeat(&self, to: NodeAddress) -> Result<()> {
        self.heartbeat_socket
            .send_to(HEARTBEAT, to.heartbeat_addr())
            .await?;
        Ok(())
    }
}

/// Execute the actions in `out`. Each one runs in its own task and
/// failures end up in the log.
pub fn dispatch(transport: &Arc<dyn Transport>, from: NodeAddress, out: Outbox) {
    for x in out {
        let transport = transport.clone();
        tokio::spawn(async move {
            match x {
                Outbound::Send { to, message } => {
                    if let Err(e) = transport.send(to, Envelope::new(from, message)).await {
                        warn!("failed to send a message to {to}: {e:#}");
                    }
                }
                Outbound::Heartbeat { to } => {
                    if let Err(e) = transport.send_heartbeat(to).await {
                        debug!("failed to send a heartbeat to {to}: {e:#}");
                    }
                }
            }
        });
    }
}

/// Read the single envelope an inbound connection carries.
pub async fn read_envelope(stream: TcpStream) -> Result<Envelope> {
    let mut framed = FramedRead::new(stream, EnvelopeCodec::new());
    let envelope = tokio::time::timeout(READ_TIMEOUT, framed.next())
        .await
        .context("read timed out")?
        .context("connection closed before a message arrived")??;
    Ok(envelope)
}

/// Ask the process at `to` to apply `change`.
/// Any member accepts it: followers pass it on to their leader.
pub async fn submit(to: NodeAddress, change: Change) -> Result<()> {
    let stream = TcpStream::connect(to.control_addr())
        .await
        .with_context(|| format!("failed to connect to {to}"))?;
    let from = NodeAddress::new(stream.local_addr()?);
    let envelope = Envelope::new(from, Message::request(change, None));
    envelope.validate()?;

    let mut framed = FramedWrite::new(stream, EnvelopeCodec::new());
    framed.send(envelope).await?;
    framed.close().await?;
    info!("submitted {change:?} to {to}");
    Ok(())
}
