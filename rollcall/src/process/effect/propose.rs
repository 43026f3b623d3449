use super::*;

pub struct Effect<'a> {
    pub process: &'a mut MembershipProcess,
    pub out: &'a mut Outbox,
}

impl Effect<'_> {
    /// Propose the next queued change unless the leader is busy.
    pub fn exec(self) {
        let Effect { process, out } = self;
        let me = process.id;

        let ready = loop {
            let Role::Leader(leader) = &mut process.role else {
                return;
            };
            if leader.is_busy() {
                return;
            }
            let Some(change) = leader.queue.pop_front() else {
                return;
            };
            if change == Change::Delete(me) {
                warn!("refuse to remove the leader itself");
                continue;
            }
            if !change.is_effective(process.view.members()) {
                debug!(
                    "skip {change:?}: nothing to change in view {}",
                    process.view.view_id()
                );
                continue;
            }

            let key = RequestKey::new(leader.next_request_id, process.view.view_id());
            leader.next_request_id += 1;

            let message = Message::request(change, Some(key));
            process.request_log.insert(key, message.clone());

            // The target of a removal is likely gone. Its ack is not needed.
            let awaiting: BTreeSet<NodeAddress> = process
                .view
                .peers(&me)
                .filter(|x| change != Change::Delete(*x))
                .collect();
            info!("propose {change:?} as {key:?} (awaiting={awaiting:?})");
            for peer in process.view.peers(&me) {
                out.send(peer, message.clone());
            }

            let ready = awaiting.is_empty();
            leader.inflight = Some(Proposal {
                key,
                change,
                awaiting,
            });
            break ready;
        };

        if ready {
            commit::Effect { process, out }.exec();
        }
    }
}
