use super::*;

use bincode::Options;

/// Control frames never come close to this.
pub(crate) const MAX_MESSAGE_SIZE: u64 = 1 << 20;

/// Position of a request in the total order of one leader's tenure.
/// Ordered by request id first.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RequestKey {
    pub request_id: RequestId,
    pub view_id: ViewId,
}

impl RequestKey {
    pub fn new(request_id: RequestId, view_id: ViewId) -> Self {
        Self {
            request_id,
            view_id,
        }
    }
}

/// Membership change carried by AddReq and DeleteReq.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Change {
    Add(NodeAddress),
    Delete(NodeAddress),
}

impl Change {
    pub fn target(&self) -> NodeAddress {
        match self {
            Change::Add(x) | Change::Delete(x) => *x,
        }
    }

    /// Whether committing this change would alter `members`.
    pub fn is_effective(&self, members: &BTreeSet<NodeAddress>) -> bool {
        match self {
            Change::Add(x) => !members.contains(x),
            Change::Delete(x) => members.contains(x),
        }
    }

    pub fn apply(&self, members: &mut BTreeSet<NodeAddress>) {
        match self {
            Change::Add(x) => {
                members.insert(*x);
            }
            Change::Delete(x) => {
                members.remove(x);
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub enum Message {
    /// `key` stays `None` until the leader admits the request.
    AddReq {
        key: Option<RequestKey>,
        target: NodeAddress,
    },
    /// `key` stays `None` until the leader admits the request.
    DeleteReq {
        key: Option<RequestKey>,
        target: NodeAddress,
    },
    /// Sent to a new leader by a follower with nothing in flight.
    NoOpReq { key: RequestKey },
    OkRsp { key: RequestKey },
    NewView(View),
    /// The sender of the envelope is the new leader.
    NewLeader,
}

impl Message {
    pub fn request(change: Change, key: Option<RequestKey>) -> Self {
        match change {
            Change::Add(target) => Message::AddReq { key, target },
            Change::Delete(target) => Message::DeleteReq { key, target },
        }
    }

    /// The change proposed by an AddReq or DeleteReq.
    pub fn change(&self) -> Option<Change> {
        match self {
            Message::AddReq { target, .. } => Some(Change::Add(*target)),
            Message::DeleteReq { target, .. } => Some(Change::Delete(*target)),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<RequestKey> {
        match self {
            Message::AddReq { key, .. } | Message::DeleteReq { key, .. } => *key,
            Message::NoOpReq { key } | Message::OkRsp { key } => Some(*key),
            Message::NewView(_) | Message::NewLeader => None,
        }
    }

    /// Check the fields that are meaningful for this tag.
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            Message::AddReq { key, target } | Message::DeleteReq { key, target } => {
                if !target.is_routable() {
                    return Err(Error::MalformedMessage("request target is not routable"));
                }
                if matches!(key, Some(k) if k.request_id == 0) {
                    return Err(Error::MalformedMessage("admitted request has request id 0"));
                }
            }
            Message::OkRsp { key } => {
                if key.request_id == 0 {
                    return Err(Error::MalformedMessage("acknowledgment of request id 0"));
                }
            }
            Message::NewView(view) => {
                if view.members().is_empty() {
                    return Err(Error::MalformedMessage("view has no members"));
                }
                if view.members().iter().any(|x| !x.is_routable()) {
                    return Err(Error::MalformedMessage("view has a member that is not routable"));
                }
            }
            Message::NoOpReq { .. } | Message::NewLeader => {}
        }
        Ok(())
    }
}

/// A message together with the process that sent it.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Envelope {
    pub from: NodeAddress,
    pub message: Message,
}

fn wire_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_MESSAGE_SIZE)
        .reject_trailing_bytes()
}

impl Envelope {
    pub fn new(from: NodeAddress, message: Message) -> Self {
        Self { from, message }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.from.is_routable() {
            return Err(Error::MalformedMessage("sender is not routable"));
        }
        self.message.validate()
    }

    pub fn encode(&self) -> Result<Bytes, Error> {
        let buf = wire_options().serialize(self)?;
        Ok(buf.into())
    }

    /// Only a complete, valid envelope comes out of here.
    pub fn decode(x: &[u8]) -> Result<Self, Error> {
        let envelope: Self = wire_options().deserialize(x)?;
        envelope.validate()?;
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(i: u8) -> NodeAddress {
        NodeAddress::new(SocketAddr::from(([10, 0, 0, i], 10000)))
    }

    #[test]
    fn tag_decides_fields() {
        let add = Message::request(Change::Add(addr(4)), Some(RequestKey::new(1, 0)));
        assert_eq!(add.change(), Some(Change::Add(addr(4))));
        assert_eq!(add.key(), Some(RequestKey::new(1, 0)));

        let ok = Message::OkRsp {
            key: RequestKey::new(1, 0),
        };
        assert_eq!(ok.change(), None);
        assert_eq!(Message::NewLeader.key(), None);
    }

    #[test]
    fn envelope_survives_the_wire() {
        let view = View::new(3, [addr(1), addr(2)]);
        let envelope = Envelope::new(addr(1), Message::NewView(view));
        let bytes = envelope.encode().unwrap();
        assert_eq!(Envelope::decode(&bytes).unwrap(), envelope);
    }

    #[test]
    fn zeroed_buffer_is_rejected() {
        let buf = vec![0u8; 1024];
        assert!(Envelope::decode(&buf).is_err());

        // 25 zero bytes decode as an unassigned AddReq from 0.0.0.0:0.
        let exact = vec![0u8; 25];
        assert!(matches!(
            Envelope::decode(&exact),
            Err(Error::MalformedMessage(_))
        ));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let envelope = Envelope::new(addr(1), Message::NewLeader);
        let mut bytes = envelope.encode().unwrap().to_vec();
        // The message tag follows the sender address.
        let tag_at = bytes.len() - 4;
        bytes[tag_at] = 42;
        assert!(Envelope::decode(&bytes).is_err());
    }

    #[test]
    fn truncated_and_padded_frames_are_rejected() {
        let envelope = Envelope::new(
            addr(2),
            Message::OkRsp {
                key: RequestKey::new(7, 1),
            },
        );
        let bytes = envelope.encode().unwrap();
        assert!(Envelope::decode(&bytes[..bytes.len() - 1]).is_err());

        let mut padded = bytes.to_vec();
        padded.push(0);
        assert!(Envelope::decode(&padded).is_err());
    }

    #[test]
    fn field_rules_are_checked() {
        let zero_id = Message::request(Change::Delete(addr(3)), Some(RequestKey::new(0, 0)));
        assert!(zero_id.validate().is_err());

        let unassigned = Message::request(Change::Delete(addr(3)), None);
        assert!(unassigned.validate().is_ok());

        let zero_ack = Message::OkRsp {
            key: RequestKey::new(0, 4),
        };
        assert!(zero_ack.validate().is_err());

        let empty_view = Message::NewView(View::new(1, []));
        assert!(empty_view.validate().is_err());

        let nowhere = NodeAddress::new(SocketAddr::from(([0, 0, 0, 0], 10000)));
        assert!(Message::request(Change::Add(nowhere), None).validate().is_err());
        assert!(Envelope::new(nowhere, Message::NewLeader).validate().is_err());
    }
}
