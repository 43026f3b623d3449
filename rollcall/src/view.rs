use super::*;

/// Agreed snapshot of the group.
/// Replaced wholesale when a newer view is accepted.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct View {
    view_id: ViewId,
    members: BTreeSet<NodeAddress>,
}

impl View {
    pub fn new(view_id: ViewId, members: impl IntoIterator<Item = NodeAddress>) -> Self {
        Self {
            view_id,
            members: members.into_iter().collect(),
        }
    }

    pub fn view_id(&self) -> ViewId {
        self.view_id
    }

    pub fn members(&self) -> &BTreeSet<NodeAddress> {
        &self.members
    }

    pub fn contains(&self, id: &NodeAddress) -> bool {
        self.members.contains(id)
    }

    /// Members other than `me`.
    pub fn peers<'a>(&'a self, me: &'a NodeAddress) -> impl Iterator<Item = NodeAddress> + 'a {
        self.members.iter().filter(move |x| *x != me).copied()
    }

    /// The view that follows this one once `change` commits.
    pub fn next(&self, change: Change) -> View {
        let mut members = self.members.clone();
        change.apply(&mut members);
        View {
            view_id: self.view_id + 1,
            members,
        }
    }

    /// Replace this view with `new` if `new` is strictly newer.
    /// Returns false and leaves the view untouched otherwise.
    pub(crate) fn apply(&mut self, new: View) -> bool {
        if new.view_id <= self.view_id {
            return false;
        }
        *self = new;
        true
    }

    /// Drop a failed leader. The view id does not move:
    /// the next committed view supersedes this local edit.
    pub(crate) fn evict(&mut self, id: &NodeAddress) -> bool {
        self.members.remove(id)
    }
}
