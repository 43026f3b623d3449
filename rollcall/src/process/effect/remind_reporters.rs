use super::*;

pub struct Effect<'a> {
    pub process: &'a mut MembershipProcess,
    pub out: &'a mut Outbox,
}

impl Effect<'_> {
    /// Announce the leadership again to followers that have not reported
    /// for a whole liveness period, or whose view never arrived. Their
    /// report may have been lost, or sent before this process took over.
    pub fn exec(self) {
        let Effect { process, out } = self;
        let cur_view_id = process.view.view_id();

        let Role::Leader(leader) = &mut process.role else {
            return;
        };
        let Some(reconciliation) = leader.reconciliation.as_mut() else {
            return;
        };
        reconciliation.checks += 1;
        if reconciliation.checks < 2 {
            return;
        }
        // Reporters ahead of this process owe it their view.
        let targets: BTreeSet<NodeAddress> = reconciliation
            .awaiting
            .iter()
            .copied()
            .chain(reconciliation.ahead_of(cur_view_id))
            .collect();
        info!("still waiting for {targets:?} to report. announce again");
        for peer in targets {
            out.send(peer, Message::NewLeader);
        }
    }
}
