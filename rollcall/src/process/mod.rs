use super::*;

pub mod effect;
mod leader;
use leader::{LeaderState, Proposal, Reconciliation};
mod ranking;
pub use ranking::Ranking;


/// Network action requested by the protocol.
/// The process never touches sockets itself.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Outbound {
    Send { to: NodeAddress, message: Message },
    Heartbeat { to: NodeAddress },
}

/// Outbound actions produced while handling one event.
#[derive(Debug, Default)]
pub struct Outbox {
    items: Vec<Outbound>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, to: NodeAddress, message: Message) {
        self.items.push(Outbound::Send { to, message });
    }

    pub fn heartbeat(&mut self, to: NodeAddress) {
        self.items.push(Outbound::Heartbeat { to });
    }

    pub fn items(&self) -> &[Outbound] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for Outbox {
    type Item = Outbound;
    type IntoIter = std::vec::IntoIter<Outbound>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Where a process stands with respect to the current view.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SyncState {
    /// Nothing in flight for the current view.
    Synced,
    /// A request of the current view waits for the view to advance.
    AwaitingCommit(RequestKey),
    /// The leader changed and the recovery exchange is not over yet.
    Reconciling,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Display)]
pub enum RoleKind {
    Leader,
    Follower,
}

#[derive(Debug, Default)]
pub(crate) struct FollowerState {
    /// Set after the recovery message went to a new leader.
    /// Cleared by the next accepted view.
    reconciling: bool,
    /// The adopted leader has announced itself at least once.
    /// Further announcements ask for the recovery message again.
    leader_announced: bool,
}

#[derive(Debug)]
pub(crate) enum Role {
    Leader(LeaderState),
    Follower(FollowerState),
}

/// Snapshot of a process published after every event.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Status {
    pub view: View,
    pub leader: NodeAddress,
    pub role: RoleKind,
    pub sync: SyncState,
    pub just_joined: bool,
}

/// `MembershipProcess` is the membership protocol of one process.
/// It is agnostic to I/O: every operation consumes one input and
/// leaves the resulting network actions in an `Outbox`.
pub struct MembershipProcess {
    id: NodeAddress,
    ranking: Ranking,
    view: View,
    request_log: RequestLog,
    role: Role,
    leader: NodeAddress,
    just_joined: bool,
}

impl MembershipProcess {
    pub fn new(config: &Config) -> Self {
        let leader = config.initial_leader();
        let just_joined = !config.is_initial_member();
        let view = if just_joined {
            View::default()
        } else {
            View::new(0, config.hosts().iter().copied())
        };
        let role = if leader == config.id() {
            Role::Leader(LeaderState::new(1))
        } else {
            Role::Follower(FollowerState::default())
        };
        info!(
            "start as {:?} of view {} (leader={leader}, joining={just_joined})",
            role.kind(),
            view.view_id(),
        );
        Self {
            id: config.id(),
            ranking: Ranking::new(config.hosts()),
            view,
            request_log: RequestLog::new(),
            role,
            leader,
            just_joined,
        }
    }

    pub fn id(&self) -> NodeAddress {
        self.id
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn leader(&self) -> NodeAddress {
        self.leader
    }

    pub fn role(&self) -> RoleKind {
        self.role.kind()
    }

    pub fn is_leader(&self) -> bool {
        matches!(self.role, Role::Leader(_))
    }

    pub fn just_joined(&self) -> bool {
        self.just_joined
    }

    pub fn request_log(&self) -> &RequestLog {
        &self.request_log
    }

    pub fn sync_state(&self) -> SyncState {
        match &self.role {
            Role::Leader(leader) => leader.sync_state(),
            Role::Follower(follower) => {
                if follower.reconciling {
                    SyncState::Reconciling
                } else if let Some((key, _)) = self.request_log.pending_in(self.view.view_id()) {
                    SyncState::AwaitingCommit(key)
                } else {
                    SyncState::Synced
                }
            }
        }
    }

    pub fn status(&self) -> Status {
        Status {
            view: self.view.clone(),
            leader: self.leader,
            role: self.role(),
            sync: self.sync_state(),
            just_joined: self.just_joined,
        }
    }

    /// A process outside the group asks to be added.
    pub fn start(&mut self, out: &mut Outbox) {
        if self.just_joined {
            self.request_join(out);
        }
    }

    /// Handle one message from the control plane.
    pub fn receive(&mut self, envelope: Envelope, out: &mut Outbox) {
        let Envelope { from, message } = envelope;
        match message {
            Message::AddReq { .. } | Message::DeleteReq { .. } => {
                effect::receive_request::Effect { process: self, out }.exec(from, message)
            }
            Message::NoOpReq { key } => {
                if self.is_leader() {
                    effect::receive_recovery::Effect { process: self, out }.exec(from, key, None);
                } else {
                    debug!("ignore NoOpReq {key:?} from {from}: not the leader");
                }
            }
            Message::OkRsp { key } => {
                effect::receive_ack::Effect { process: self, out }.exec(from, key)
            }
            Message::NewView(view) => {
                effect::apply_new_view::Effect { process: self, out }.exec(from, view)
            }
            Message::NewLeader => {
                effect::receive_new_leader::Effect { process: self, out }.exec(from)
            }
        }
    }

    /// Submit a change originated by this process.
    pub fn submit(&mut self, change: Change, out: &mut Outbox) {
        let id = self.id;
        effect::receive_request::Effect { process: self, out }
            .exec(id, Message::request(change, None));
    }

    /// Periodic liveness check with the members the detector suspects.
    pub fn check_liveness(&mut self, suspects: Vec<NodeAddress>, out: &mut Outbox) {
        if self.just_joined {
            self.request_join(out);
        }
        for member in suspects {
            effect::suspect_member::Effect {
                process: &mut *self,
                out: &mut *out,
            }
            .exec(member);
        }
        effect::remind_reporters::Effect { process: self, out }.exec();
    }

    /// What a follower tells a new leader: the view it holds, then its
    /// pending request of that view or a NoOpReq when there is none.
    /// The view lets a leader that missed the last commit catch up.
    fn report_to(&self, leader: NodeAddress, out: &mut Outbox) {
        let view_id = self.view.view_id();
        let message = match self.request_log.pending_in(view_id) {
            Some((_, message)) => message.clone(),
            None => Message::NoOpReq {
                key: RequestKey::new(self.request_log.max_request_id(), view_id),
            },
        };
        debug!("report view {view_id} and {message:?} to {leader}");
        out.send(leader, Message::NewView(self.view.clone()));
        out.send(leader, message);
    }

    /// Any listed host gets the request to the leader: followers forward it.
    fn request_join(&self, out: &mut Outbox) {
        let message = Message::request(Change::Add(self.id), None);
        let mut targets: BTreeSet<NodeAddress> = self.ranking.hosts().collect();
        targets.insert(self.leader);
        targets.remove(&self.id);
        info!("not a member yet. ask {} hosts to add this process", targets.len());
        for to in targets {
            out.send(to, message.clone());
        }
    }
}

impl Role {
    fn kind(&self) -> RoleKind {
        match self {
            Role::Leader(_) => RoleKind::Leader,
            Role::Follower(_) => RoleKind::Follower,
        }
    }
}
