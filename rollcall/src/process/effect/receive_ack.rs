use super::*;

pub struct Effect<'a> {
    pub process: &'a mut MembershipProcess,
    pub out: &'a mut Outbox,
}

impl Effect<'_> {
    /// Count an OkRsp toward the in-flight proposal.
    /// Acks for anything else are late or duplicated and change nothing.
    pub fn exec(self, from: NodeAddress, key: RequestKey) {
        let Effect { process, out } = self;

        let Role::Leader(leader) = &mut process.role else {
            debug!("ignore OkRsp {key:?} from {from}: not the leader");
            return;
        };
        let Some(proposal) = leader.inflight.as_mut().filter(|x| x.key == key) else {
            debug!("ignore OkRsp {key:?} from {from}: not in flight");
            return;
        };
        if !proposal.awaiting.remove(&from) {
            debug!("ignore OkRsp {key:?} from {from}: not awaited");
            return;
        }
        debug!(
            "OkRsp {key:?} from {from} ({} more to go)",
            proposal.awaiting.len()
        );

        if proposal.awaiting.is_empty() {
            commit::Effect { process, out }.exec();
        }
    }
}
