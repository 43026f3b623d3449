use super::*;

/// Global order over processes used to pick a successor leader.
/// Every process builds it from the same host list so they all agree.
#[derive(Clone, Debug)]
pub struct Ranking {
    order: HashMap<NodeAddress, usize>,
}

impl Ranking {
    pub fn new(hosts: &[NodeAddress]) -> Self {
        let mut order = HashMap::new();
        for (i, id) in hosts.iter().enumerate() {
            order.entry(*id).or_insert(i);
        }
        Self { order }
    }

    pub fn hosts(&self) -> impl Iterator<Item = NodeAddress> + '_ {
        self.order.keys().copied()
    }

    /// Lower is better. Processes outside the host list rank after
    /// every listed one, ordered by address.
    pub fn rank(&self, id: &NodeAddress) -> (usize, NodeAddress) {
        let pos = self.order.get(id).copied().unwrap_or(usize::MAX);
        (pos, *id)
    }

    /// The best ranked of `members`.
    pub fn elect<'a>(&self, members: impl IntoIterator<Item = &'a NodeAddress>) -> Option<NodeAddress> {
        members.into_iter().min_by_key(|x| self.rank(x)).copied()
    }
}
