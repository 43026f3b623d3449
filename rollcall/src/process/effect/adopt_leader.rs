use super::*;

pub struct Effect<'a> {
    pub process: &'a mut MembershipProcess,
    pub out: &'a mut Outbox,
}

impl Effect<'_> {
    /// Switch to `new_leader` and start the recovery exchange with it.
    ///
    /// A process that becomes the leader announces itself and waits for every
    /// member to report what it holds for the current view.
    /// A follower reports its view and its pending request, or a NoOpReq if
    /// it has none.
    /// `announced` tells whether `new_leader` has already sent NewLeader.
    pub fn exec(self, new_leader: NodeAddress, announced: bool) {
        let Effect { process, out } = self;
        let me = process.id;
        let view_id = process.view.view_id();
        let old_leader = std::mem::replace(&mut process.leader, new_leader);
        info!("leader changed {old_leader} -> {new_leader}");

        if new_leader == me {
            let mut recovered = BTreeMap::new();
            if let Some((key, message)) = process.request_log.pending_in(view_id) {
                if let Some(change) = message.change() {
                    recovered.insert(key, change);
                }
            }
            let awaiting: BTreeSet<NodeAddress> = process.view.peers(&me).collect();
            let next_request_id = process.request_log.max_request_id() + 1;

            let mut leader = LeaderState::new(next_request_id);
            if let Role::Leader(old) = &mut process.role {
                leader.queue = std::mem::take(&mut old.queue);
            }
            let mut reconciliation = Reconciliation::new(old_leader, awaiting.clone());
            reconciliation.recovered = recovered;
            leader.reconciliation = Some(reconciliation);
            process.role = Role::Leader(leader);

            info!("promoted in view {view_id}. waiting for {awaiting:?} to report");
            for peer in awaiting.iter() {
                out.send(*peer, Message::NewLeader);
            }

            finish_reconciliation::Effect { process, out }.exec();
        } else {
            if let Role::Leader(old) = &process.role {
                if !old.queue.is_empty() {
                    warn!("step down. {} queued changes are dropped", old.queue.len());
                }
            }
            process.role = Role::Follower(FollowerState {
                reconciling: true,
                leader_announced: announced,
            });

            process.report_to(new_leader, out);
        }
    }
}
