use super::*;

pub struct Effect<'a> {
    pub process: &'a mut MembershipProcess,
    pub out: &'a mut Outbox,
}

impl Effect<'_> {
    /// Turn the acknowledged proposal into the next view and multicast it.
    pub fn exec(self) {
        let Effect { process, out } = self;

        let Role::Leader(leader) = &mut process.role else {
            return;
        };
        let Some(proposal) = leader.inflight.take() else {
            return;
        };

        let next = process.view.next(proposal.change);
        info!(
            "commit {:?} ({:?}) as view {}",
            proposal.change,
            proposal.key,
            next.view_id()
        );
        // The removed process learns that it is out.
        if let Change::Delete(target) = proposal.change {
            out.send(target, Message::NewView(next.clone()));
        }
        announce_view::Effect {
            process: &mut *process,
            out: &mut *out,
        }
        .exec(next);

        propose::Effect { process, out }.exec();
    }
}
