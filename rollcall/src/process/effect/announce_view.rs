use super::*;

pub struct Effect<'a> {
    pub process: &'a mut MembershipProcess,
    pub out: &'a mut Outbox,
}

impl Effect<'_> {
    /// Multicast `next` to its members and apply it locally.
    pub fn exec(self, next: View) {
        let Effect { process, out } = self;
        let me = process.id;

        for member in next.peers(&me) {
            out.send(member, Message::NewView(next.clone()));
        }
        apply_new_view::Effect { process, out }.exec(me, next);
    }
}
