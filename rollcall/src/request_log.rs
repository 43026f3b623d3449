use super::*;

/// Requests proposed but not yet superseded by a committed view.
/// An entry resolves implicitly once the view moves past its view id.
#[derive(Debug, Default)]
pub struct RequestLog {
    entries: BTreeMap<RequestKey, Message>,
}

impl RequestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `message` under `key`, replacing whatever was stored there.
    pub fn insert(&mut self, key: RequestKey, message: Message) {
        if let Some(old) = self.entries.insert(key, message) {
            debug!("overwrite request {key:?} (was {old:?})");
        }
    }

    pub fn get(&self, key: &RequestKey) -> Option<&Message> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry proposed in a view older than `view_id`.
    /// Returns the number of dropped entries.
    pub fn prune(&mut self, view_id: ViewId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.view_id >= view_id);
        before - self.entries.len()
    }

    /// The latest request proposed in `view_id`, if any.
    pub fn pending_in(&self, view_id: ViewId) -> Option<(RequestKey, &Message)> {
        self.entries
            .iter()
            .rev()
            .find(|(key, _)| key.view_id == view_id)
            .map(|(key, message)| (*key, message))
    }

    pub fn max_request_id(&self) -> RequestId {
        self.entries
            .keys()
            .map(|key| key.request_id)
            .max()
            .unwrap_or(0)
    }
}
