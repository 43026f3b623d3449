use super::*;

mod thread;
use thread::ThreadHandle;

use failure_detector::FailureDetector;
use process::{MembershipProcess, Outbox, Status};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::{mpsc, watch};
use transport::{NetTransport, Transport};

/// Input of the event loop.
#[derive(Debug)]
pub(crate) enum Event {
    Inbound(Envelope),
    Heartbeat(NodeAddress),
    LivenessCheck,
    Submit(Change),
}

/// `MembershipNode` runs one `MembershipProcess` on the network.
/// Dropping it stops every thread of the node.
pub struct MembershipNode {
    id: NodeAddress,
    event_tx: mpsc::UnboundedSender<Event>,
    status_rx: watch::Receiver<Status>,
    _threads: Vec<ThreadHandle>,
}

impl MembershipNode {
    /// Bind the control port and the heartbeat port above it, then start.
    pub async fn start(config: Config, timing: Timing) -> Result<Self> {
        let control_addr = config.listen();
        let heartbeat_port = control_addr
            .port()
            .checked_add(1)
            .context("no room for the heartbeat port")?;
        let heartbeat_addr = SocketAddr::new(control_addr.ip(), heartbeat_port);

        let listener = TcpListener::bind(control_addr)
            .await
            .with_context(|| format!("failed to bind the control port {control_addr}"))?;
        let socket = UdpSocket::bind(heartbeat_addr)
            .await
            .with_context(|| format!("failed to bind the heartbeat port {heartbeat_addr}"))?;
        let socket = Arc::new(socket);
        info!(
            "{} listens on {control_addr} (control) and {heartbeat_addr} (heartbeat)",
            config.id()
        );

        let transport = Arc::new(NetTransport::new(socket.clone()));
        let mut node = Self::launch(&config, timing, transport);
        node._threads
            .push(thread::control_listener::new(listener, node.event_tx.clone()));
        node._threads
            .push(thread::heartbeat_listener::new(socket, node.event_tx.clone()));
        Ok(node)
    }

    fn launch(config: &Config, timing: Timing, transport: Arc<dyn Transport>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let process = MembershipProcess::new(config);
        let (status_tx, status_rx) = watch::channel(process.status());

        let threads = vec![
            thread::event_loop::new(
                process,
                timing.suspect_timeout,
                event_rx,
                status_tx,
                transport.clone(),
            ),
            thread::heartbeat::new(
                config.id(),
                timing.heartbeat_interval,
                status_rx.clone(),
                transport,
            ),
            thread::liveness_check::new(timing.liveness_check_interval, event_tx.clone()),
        ];

        Self {
            id: config.id(),
            event_tx,
            status_rx,
            _threads: threads,
        }
    }

    pub fn id(&self) -> NodeAddress {
        self.id
    }

    /// The latest published status.
    pub fn status(&self) -> Status {
        self.status_rx.borrow().clone()
    }

    /// Receive every status change from now on.
    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.status_rx.clone()
    }

    /// Submit a change as if this process originated it.
    pub fn submit(&self, change: Change) -> Result<()> {
        self.event_tx
            .send(Event::Submit(change))
            .map_err(|_| Error::NodeStopped(self.id))?;
        Ok(())
    }
}
