use super::*;

pub struct Effect<'a> {
    pub process: &'a mut MembershipProcess,
    pub out: &'a mut Outbox,
}

impl Effect<'_> {
    /// React to the failure detector suspecting `member`.
    ///
    /// The leader removes a suspected follower through a DeleteReq of its own
    /// and stops waiting for it. A follower only cares about the leader:
    /// losing it starts an election.
    pub fn exec(self, member: NodeAddress) {
        let Effect { process, out } = self;
        if member == process.id || !process.view.contains(&member) {
            return;
        }
        if !process.view.contains(&process.id) {
            debug!("{member} is suspected but this process is not a member");
            return;
        }

        match &mut process.role {
            Role::Leader(leader) => {
                let mut settled = false;
                if let Some(proposal) = leader.inflight.as_mut() {
                    if proposal.awaiting.remove(&member) {
                        info!("stop waiting for {member} on {:?}", proposal.key);
                        settled = proposal.awaiting.is_empty();
                    }
                }
                let mut reconciling = false;
                if let Some(reconciliation) = leader.reconciliation.as_mut() {
                    reconciling = true;
                    if reconciliation.forget(&member) {
                        info!("stop waiting for recovery report from {member}");
                    }
                }
                if leader.enqueue(Change::Delete(member)) {
                    warn!("suspect {member}. queue its removal");
                }

                if settled {
                    commit::Effect { process, out }.exec();
                } else if reconciling {
                    finish_reconciliation::Effect { process, out }.exec();
                } else {
                    propose::Effect { process, out }.exec();
                }
            }
            Role::Follower(_) => {
                if member != process.leader {
                    return;
                }
                warn!("leader {member} is suspected");
                process.view.evict(&member);

                let Some(successor) = process.ranking.elect(process.view.members()) else {
                    error!("no member is left to take over");
                    return;
                };
                info!("elect {successor} as the new leader");
                adopt_leader::Effect { process, out }.exec(successor, false);
            }
        }
    }
}
