use super::*;

pub struct Effect<'a> {
    pub process: &'a mut MembershipProcess,
    pub out: &'a mut Outbox,
}

impl Effect<'_> {
    /// `from` announced itself as the new leader.
    pub fn exec(self, from: NodeAddress) {
        let Effect { process, out } = self;

        // A removed process may still believe in an old view.
        if !process.view.contains(&from) {
            debug!("ignore NewLeader from {from}: not a member of view {}", process.view.view_id());
            return;
        }
        if !process.view.contains(&process.id) {
            debug!("ignore NewLeader from {from}: this process is not a member");
            return;
        }

        if from == process.leader {
            let Role::Follower(follower) = &mut process.role else {
                return;
            };
            if !follower.leader_announced {
                // This process elected `from` on its own and already reported.
                follower.leader_announced = true;
                debug!("{from} is already the leader");
                return;
            }
            if follower.reconciling {
                info!("{from} asks again. resend the recovery message");
                process.report_to(from, out);
            }
            return;
        }

        if process.is_leader() {
            // Two processes promoted themselves. The better ranked one stays.
            if process.ranking.rank(&from) > process.ranking.rank(&process.id) {
                debug!("ignore NewLeader from {from}: outranked by this process");
                return;
            }
            warn!("yield leadership to {from}");
        } else {
            let old_leader = process.leader;
            if process.view.evict(&old_leader) {
                info!("evict old leader {old_leader} from the local view");
            }
        }

        adopt_leader::Effect { process, out }.exec(from, true);
    }
}
