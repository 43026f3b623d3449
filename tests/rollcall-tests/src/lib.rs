use anyhow::{ensure, Context, Result};
use rollcall::message::Change;
use rollcall::process::Status;
use rollcall::{Config, MembershipNode, NodeAddress, Timing};
use std::collections::{BTreeSet, HashMap};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

/// A control port whose heartbeat port is free as well.
/// Both are recorded in `taken` so later picks do not collide.
fn free_port_pair(taken: &mut BTreeSet<u16>) -> Result<u16> {
    for _ in 0..100 {
        let port = port_check::free_local_ipv4_port().context("no free port")?;
        if port == u16::MAX || taken.contains(&port) || taken.contains(&(port + 1)) {
            continue;
        }
        if port_check::is_local_ipv4_port_free(port + 1) {
            taken.insert(port);
            taken.insert(port + 1);
            return Ok(port);
        }
    }
    anyhow::bail!("failed to find two adjacent free ports")
}

pub struct Builder {
    timing: Timing,
}
impl Builder {
    fn new() -> Self {
        Self {
            timing: Timing {
                heartbeat_interval: Duration::from_millis(100),
                liveness_check_interval: Duration::from_millis(200),
                suspect_timeout: Duration::from_millis(800),
            },
        }
    }

    /// Start `n` processes listed in the host list.
    pub async fn build(self, n: u8) -> Result<Cluster> {
        ensure!(n > 0);
        let mut taken = BTreeSet::new();
        let mut addresses = vec![];
        for _ in 0..n {
            let port = free_port_pair(&mut taken)?;
            addresses.push(NodeAddress::new(SocketAddr::from(([127, 0, 0, 1], port))));
        }
        let mut cluster = Cluster {
            hosts: addresses.clone(),
            taken,
            addresses: HashMap::new(),
            nodes: HashMap::new(),
            timing: self.timing,
        };
        for (id, address) in addresses.into_iter().enumerate() {
            cluster.start(id as u8, address).await?;
        }
        Ok(cluster)
    }
}

/// In-process nodes on loopback.
/// Node `id` is the `id`-th host of the host list, or a later joiner.
pub struct Cluster {
    hosts: Vec<NodeAddress>,
    taken: BTreeSet<u16>,
    addresses: HashMap<u8, NodeAddress>,
    nodes: HashMap<u8, MembershipNode>,
    timing: Timing,
}
impl Cluster {
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub async fn new(n: u8) -> Result<Self> {
        Self::builder().build(n).await
    }

    async fn start(&mut self, id: u8, address: NodeAddress) -> Result<()> {
        let config = Config::new(address, self.hosts.clone())?;
        let node = MembershipNode::start(config, self.timing).await?;
        info!("start node(id={id}) at {address}");
        self.addresses.insert(id, address);
        self.nodes.insert(id, node);
        Ok(())
    }

    /// Start a process that is not in the host list.
    pub async fn join(&mut self, id: u8) -> Result<()> {
        ensure!(!self.addresses.contains_key(&id));
        let port = free_port_pair(&mut self.taken)?;
        let address = NodeAddress::new(SocketAddr::from(([127, 0, 0, 1], port)));
        self.start(id, address).await
    }

    /// Stop node `id` without telling anyone.
    pub fn kill(&mut self, id: u8) {
        if self.nodes.remove(&id).is_some() {
            info!("kill node(id={id})");
        }
    }

    pub fn address(&self, id: u8) -> NodeAddress {
        self.addresses[&id]
    }

    pub fn addresses(&self, ids: &[u8]) -> BTreeSet<NodeAddress> {
        ids.iter().map(|id| self.address(*id)).collect()
    }

    pub fn node(&self, id: u8) -> &MembershipNode {
        &self.nodes[&id]
    }

    pub fn status(&self, id: u8) -> Status {
        self.node(id).status()
    }

    /// Wait until the status of node `id` satisfies `f`.
    pub async fn wait_for(&self, id: u8, f: impl FnMut(&Status) -> bool) -> Result<Status> {
        let mut rx = self.node(id).subscribe();
        let status = tokio::time::timeout(Duration::from_secs(10), rx.wait_for(f))
            .await
            .with_context(|| format!("node(id={id}) did not reach the state"))??
            .clone();
        Ok(status)
    }

    /// Wait until every node of `ids` has exactly `ids` as members.
    pub async fn wait_for_members(&self, ids: &[u8]) -> Result<()> {
        let members = self.addresses(ids);
        for id in ids {
            self.wait_for(*id, |x| x.view.members() == &members).await?;
        }
        Ok(())
    }

    /// Send `change` to node `to` the way an external client does.
    pub async fn submit(&self, to: u8, change: Change) -> Result<()> {
        rollcall::transport::submit(self.address(to), change).await
    }
}
