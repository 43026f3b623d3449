use super::*;

pub struct Effect<'a> {
    pub process: &'a mut MembershipProcess,
    pub out: &'a mut Outbox,
}

impl Effect<'_> {
    /// Handle an AddReq or DeleteReq.
    ///
    /// Without a key the request is a submission: the leader admits it and
    /// a follower forwards it to the leader. With a key it was proposed by a
    /// leader: a follower stores and acknowledges it, a leader takes it as a
    /// recovery report.
    pub fn exec(self, from: NodeAddress, message: Message) {
        let Some(change) = message.change() else {
            return;
        };
        let Effect { process, out } = self;

        match (message.key(), process.is_leader()) {
            (None, true) => {
                if let Role::Leader(leader) = &mut process.role {
                    if leader.enqueue(change) {
                        info!("admit {change:?} (from={from})");
                    } else {
                        debug!("{change:?} is already queued");
                    }
                }
                propose::Effect { process, out }.exec();
            }
            (None, false) => {
                // Members only send submissions to the leader they believe in.
                // Bouncing it back would loop while two members disagree on the leader.
                if from != process.id && process.view.contains(&from) {
                    debug!("drop {change:?} forwarded by {from}: not the leader");
                    return;
                }
                debug!("forward {change:?} to leader {}", process.leader);
                out.send(process.leader, message);
            }
            (Some(key), true) => {
                receive_recovery::Effect { process, out }.exec(from, key, Some(change));
            }
            (Some(key), false) => {
                let cur_view_id = process.view.view_id();
                if key.view_id < cur_view_id {
                    debug!("ignore stale request {key:?} (cur_view_id={cur_view_id})");
                    return;
                }
                if from != process.leader {
                    debug!("request {key:?} comes from {from} but the leader is {}", process.leader);
                }
                process.request_log.insert(key, message);
                out.send(from, Message::OkRsp { key });
            }
        }
    }
}
