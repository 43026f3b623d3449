use super::*;

pub struct Effect<'a> {
    pub process: &'a mut MembershipProcess,
    pub out: &'a mut Outbox,
}

impl Effect<'_> {
    /// A follower reported to this leader: either a request an earlier
    /// leader proposed (`Some`) or nothing pending (`None`).
    /// `key.view_id` is the view the follower holds.
    pub fn exec(self, from: NodeAddress, key: RequestKey, change: Option<Change>) {
        let Effect { process, out } = self;
        let cur_view_id = process.view.view_id();

        let Role::Leader(leader) = &mut process.role else {
            return;
        };

        if let Some(reconciliation) = leader.reconciliation.as_mut() {
            if let Some(change) = change {
                debug!("recovered {change:?} ({key:?}) from {from}");
                reconciliation.recovered.insert(key, change);
            }
            if !reconciliation.record(from, key.view_id) {
                debug!("{from} reported twice or was not asked to");
            }
            if key.view_id > cur_view_id {
                info!("{from} holds view {} and this process {cur_view_id}", key.view_id);
            }
            finish_reconciliation::Effect { process, out }.exec();
            return;
        }

        // Late report after the exchange is over.
        let Some(change) = change else {
            debug!("late NoOpReq from {from}");
            return;
        };
        if key.view_id != cur_view_id {
            debug!("drop recovered {change:?} ({key:?}): view {cur_view_id} is current");
            return;
        }
        if leader.enqueue(change) {
            info!("re-admit {change:?} recovered from {from}");
        }
        propose::Effect { process, out }.exec();
    }
}
