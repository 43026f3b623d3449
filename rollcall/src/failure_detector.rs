use super::*;

/// Tracks when each member was last heard from.
/// It only reports suspects; what to do with them is up to the process.
pub struct FailureDetector {
    suspect_timeout: Duration,
    last_heard: HashMap<NodeAddress, Instant>,
}

impl FailureDetector {
    pub fn new(suspect_timeout: Duration) -> Self {
        Self {
            suspect_timeout,
            last_heard: HashMap::new(),
        }
    }

    /// Follow exactly `members`.
    /// A member seen for the first time starts with a clean slate at `now`.
    pub fn track(&mut self, members: impl IntoIterator<Item = NodeAddress>, now: Instant) {
        let members: HashMap<NodeAddress, Instant> = members
            .into_iter()
            .map(|id| {
                let t = self.last_heard.get(&id).copied().unwrap_or(now);
                (id, t)
            })
            .collect();
        self.last_heard = members;
    }

    /// Heartbeats from processes not being tracked are ignored.
    pub fn receive_heartbeat(&mut self, from: &NodeAddress, now: Instant) {
        match self.last_heard.get_mut(from) {
            Some(t) => *t = now,
            None => debug!("ignore heartbeat from non-member {from}"),
        }
    }

    /// Members not heard from for longer than the timeout, in address order.
    pub fn suspects(&self, now: Instant) -> Vec<NodeAddress> {
        let mut out: Vec<NodeAddress> = self
            .last_heard
            .iter()
            .filter(|(_, t)| now.saturating_duration_since(**t) > self.suspect_timeout)
            .map(|(id, _)| *id)
            .collect();
        out.sort();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(i: u8) -> NodeAddress {
        NodeAddress::new(SocketAddr::from(([10, 0, 0, i], 10000)))
    }

    #[test]
    fn silence_beyond_timeout_is_suspected() {
        let t0 = Instant::now();
        let mut fd = FailureDetector::new(Duration::from_secs(3));
        fd.track([addr(2), addr(3)], t0);

        fd.receive_heartbeat(&addr(2), t0 + Duration::from_secs(2));
        assert!(fd.suspects(t0 + Duration::from_secs(3)).is_empty());
        assert_eq!(fd.suspects(t0 + Duration::from_secs(4)), vec![addr(3)]);
        assert_eq!(
            fd.suspects(t0 + Duration::from_secs(6)),
            vec![addr(2), addr(3)]
        );
    }

    #[test]
    fn new_members_get_a_grace_period() {
        let t0 = Instant::now();
        let mut fd = FailureDetector::new(Duration::from_secs(3));
        fd.track([addr(2)], t0);

        let t1 = t0 + Duration::from_secs(10);
        fd.track([addr(2), addr(4)], t1);
        assert_eq!(fd.suspects(t1 + Duration::from_secs(1)), vec![addr(2)]);
    }

    #[test]
    fn untracked_members_are_forgotten() {
        let t0 = Instant::now();
        let mut fd = FailureDetector::new(Duration::from_secs(1));
        fd.track([addr(2), addr(3)], t0);
        fd.track([addr(3)], t0);

        fd.receive_heartbeat(&addr(2), t0);
        assert_eq!(fd.suspects(t0 + Duration::from_secs(5)), vec![addr(3)]);
    }
}
