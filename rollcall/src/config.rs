use super::*;

/// Static configuration in initialization.
#[derive(Clone, Debug)]
pub struct Config {
    /// Address other processes use to reach this one.
    id: NodeAddress,
    /// Bootstrap host list. The order fixes the rank of each process
    /// and the first host is the initial leader. Never empty.
    hosts: Vec<NodeAddress>,
    /// Local address the control listener binds to.
    /// The heartbeat listener binds to the port right above it.
    listen: SocketAddr,
}

impl Config {
    pub fn new(id: NodeAddress, hosts: Vec<NodeAddress>) -> Result<Self> {
        ensure!(!hosts.is_empty(), Error::EmptyHostList);
        Ok(Self {
            id,
            hosts,
            listen: id.control_addr(),
        })
    }

    /// Bind the listeners to `ip` instead of the address in `id`.
    pub fn listen_on(self, ip: std::net::IpAddr) -> Self {
        let listen = SocketAddr::new(ip, self.id.control_addr().port());
        Self { listen, ..self }
    }

    pub fn id(&self) -> NodeAddress {
        self.id
    }

    pub fn hosts(&self) -> &[NodeAddress] {
        &self.hosts
    }

    pub fn listen(&self) -> SocketAddr {
        self.listen
    }

    pub fn initial_leader(&self) -> NodeAddress {
        self.hosts.first().copied().unwrap_or(self.id)
    }

    /// Processes in the host list start as members of view 0.
    /// Anyone else has to join.
    pub fn is_initial_member(&self) -> bool {
        self.hosts.contains(&self.id)
    }
}

/// Timers of the failure detector.
#[derive(Clone, Copy, Debug)]
pub struct Timing {
    /// Period of heartbeat emission to the current view.
    pub heartbeat_interval: Duration,
    /// Period of the liveness check.
    pub liveness_check_interval: Duration,
    /// A member not heard from for longer than this is suspected.
    pub suspect_timeout: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(1),
            liveness_check_interval: Duration::from_secs(3),
            suspect_timeout: Duration::from_secs(3),
        }
    }
}
