use super::*;

pub struct Effect<'a> {
    pub process: &'a mut MembershipProcess,
    pub out: &'a mut Outbox,
}

impl Effect<'_> {
    /// Accept `view` if it is newer than the current one.
    pub fn exec(self, from: NodeAddress, view: View) {
        let Effect { process, out } = self;
        let me = process.id;

        let new_view_id = view.view_id();
        let cur_view_id = process.view.view_id();
        if !process.view.apply(view) {
            debug!("ignore view {new_view_id} from {from} (cur_view_id={cur_view_id})");
            return;
        }
        let n_pruned = process.request_log.prune(new_view_id);
        info!(
            "accepted view {new_view_id} members={:?} (pruned {n_pruned} requests)",
            process.view.members()
        );

        match &mut process.role {
            Role::Follower(follower) => follower.reconciling = false,
            Role::Leader(leader) => {
                // A reporter held a newer view. Catch up and keep the failed
                // leader out of it.
                if let Some(reconciliation) = leader.reconciliation.as_mut() {
                    process.view.evict(&reconciliation.predecessor);
                    reconciliation.follow(&process.view, &me);
                    info!(
                        "caught up with view {new_view_id}. waiting for {:?} to report",
                        reconciliation.awaiting
                    );
                }
            }
        }

        if process.just_joined {
            if from != process.leader {
                info!("leader changed {} -> {from} while joining", process.leader);
                process.leader = from;
            }
            // Let everyone know this process is alive before they start checking on it.
            for peer in process.view.peers(&me) {
                out.heartbeat(peer);
            }
            process.just_joined = false;
        }

        if !process.view.contains(&me) {
            warn!("this process is not a member of view {new_view_id}");
        }

        finish_reconciliation::Effect { process, out }.exec();
    }
}
