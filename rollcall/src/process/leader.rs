use super::*;

/// A change the leader is collecting acknowledgments for.
#[derive(Debug)]
pub(crate) struct Proposal {
    pub key: RequestKey,
    pub change: Change,
    /// Followers whose OkRsp is still missing.
    pub awaiting: BTreeSet<NodeAddress>,
}

/// Recovery exchange run by a freshly promoted leader.
#[derive(Debug)]
pub(crate) struct Reconciliation {
    /// The failed leader this process took over from.
    pub predecessor: NodeAddress,
    /// Followers that have not reported yet.
    pub awaiting: BTreeSet<NodeAddress>,
    /// View id each reporter holds.
    pub reported: BTreeMap<NodeAddress, ViewId>,
    /// Requests the old leader proposed but never committed.
    pub recovered: BTreeMap<RequestKey, Change>,
    /// Liveness checks passed since the promotion.
    pub checks: u32,
}

impl Reconciliation {
    pub fn new(predecessor: NodeAddress, awaiting: BTreeSet<NodeAddress>) -> Self {
        Self {
            predecessor,
            awaiting,
            reported: BTreeMap::new(),
            recovered: BTreeMap::new(),
            checks: 0,
        }
    }

    pub fn record(&mut self, from: NodeAddress, view_id: ViewId) -> bool {
        let e = self.reported.entry(from).or_insert(view_id);
        *e = (*e).max(view_id);
        self.awaiting.remove(&from)
    }

    /// The newest view some reporter holds.
    pub fn max_view_id(&self) -> Option<ViewId> {
        self.reported.values().copied().max()
    }

    /// Reporters that hold a view newer than `view_id`.
    pub fn ahead_of(&self, view_id: ViewId) -> impl Iterator<Item = NodeAddress> + '_ {
        self.reported
            .iter()
            .filter(move |(_, x)| **x > view_id)
            .map(|(id, _)| *id)
    }

    pub fn forget(&mut self, member: &NodeAddress) -> bool {
        self.reported.remove(member);
        self.awaiting.remove(member)
    }

    /// Follow a newly accepted view: wait for its members only.
    pub fn follow(&mut self, view: &View, me: &NodeAddress) {
        self.awaiting.retain(|x| view.contains(x));
        for peer in view.peers(me) {
            if !self.reported.contains_key(&peer) {
                self.awaiting.insert(peer);
            }
        }
    }

    /// Everyone reported and this process holds the newest view among them.
    pub fn is_done(&self, view_id: ViewId) -> bool {
        self.awaiting.is_empty() && self.max_view_id().map_or(true, |x| x <= view_id)
    }
}

#[derive(Debug)]
pub(crate) struct LeaderState {
    pub next_request_id: RequestId,
    /// Admitted changes waiting for the in-flight proposal to settle.
    pub queue: VecDeque<Change>,
    /// At most one proposal at a time.
    pub inflight: Option<Proposal>,
    pub reconciliation: Option<Reconciliation>,
}

impl LeaderState {
    pub fn new(next_request_id: RequestId) -> Self {
        Self {
            next_request_id,
            queue: VecDeque::new(),
            inflight: None,
            reconciliation: None,
        }
    }

    /// Queue `change` unless it is already queued or in flight.
    pub fn enqueue(&mut self, change: Change) -> bool {
        let inflight = self.inflight.as_ref().map(|x| x.change);
        if inflight == Some(change) || self.queue.contains(&change) {
            return false;
        }
        self.queue.push_back(change);
        true
    }

    pub fn is_busy(&self) -> bool {
        self.inflight.is_some() || self.reconciliation.is_some()
    }

    pub fn sync_state(&self) -> SyncState {
        if self.reconciliation.is_some() {
            SyncState::Reconciling
        } else if let Some(proposal) = &self.inflight {
            SyncState::AwaitingCommit(proposal.key)
        } else {
            SyncState::Synced
        }
    }
}
