use super::*;

pub struct Effect<'a> {
    pub process: &'a mut MembershipProcess,
    pub out: &'a mut Outbox,
}

impl Effect<'_> {
    /// Once every member reported and this process caught up with the
    /// newest reported view, re-propose what the old leader left behind.
    /// The exchange always ends with a new view.
    pub fn exec(self) {
        let Effect { process, out } = self;
        let cur_view_id = process.view.view_id();

        let Role::Leader(leader) = &mut process.role else {
            return;
        };
        let done = leader.reconciliation.as_ref().is_some_and(|x| x.is_done(cur_view_id));
        if !done {
            return;
        }
        let Some(reconciliation) = leader.reconciliation.take() else {
            return;
        };

        if let Some(max_id) = reconciliation.recovered.keys().map(|x| x.request_id).max() {
            leader.next_request_id = leader.next_request_id.max(max_id + 1);
        }

        // Requests of older views were either committed or superseded.
        let mut recovered: Vec<Change> = vec![];
        for (key, change) in reconciliation.recovered {
            if key.view_id == cur_view_id && !recovered.contains(&change) {
                recovered.push(change);
            }
        }
        info!(
            "reconciliation done in view {cur_view_id}. re-propose {recovered:?}"
        );

        let queued = std::mem::take(&mut leader.queue);
        for change in recovered.into_iter().chain(queued) {
            leader.enqueue(change);
        }

        propose::Effect {
            process: &mut *process,
            out: &mut *out,
        }
        .exec();

        // Nothing was proposed: confirm the leader's view so that followers
        // leave reconciliation and drop the evicted leader for good.
        let idle = matches!(&process.role, Role::Leader(x) if x.inflight.is_none());
        if idle && process.view.view_id() == cur_view_id {
            let next = View::new(cur_view_id + 1, process.view.members().iter().copied());
            info!("confirm members {:?} as view {}", next.members(), next.view_id());
            announce_view::Effect { process, out }.exec(next);
        }
    }
}
