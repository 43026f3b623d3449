#![deny(unused_must_use)]

mod error;
pub use error::Error;

mod config;
pub use config::{Config, Timing};

/// Wire records exchanged between processes.
pub mod message;

/// Versioned membership view.
mod view;
pub use view::View;

/// Pending requests keyed by request id and view id.
mod request_log;
pub use request_log::RequestLog;

/// Last-heard bookkeeping of heartbeats.
mod failure_detector;

/// Implementation of `MembershipProcess`.
pub mod process;

/// Sockets, framing and the outbound boundary.
pub mod transport;

/// Runtime hosting a `MembershipProcess` on the network.
pub mod node;
pub use node::MembershipNode;

use anyhow::{ensure, Context, Result};
use bytes::{Bytes, BytesMut};
use derive_more::{Display, FromStr};
use message::{Change, Envelope, Message, RequestKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Identifier of a process: the address of its control port.
/// Heartbeats of the process travel on the port right above it.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Display,
    FromStr,
)]
pub struct NodeAddress(SocketAddr);

impl NodeAddress {
    pub fn new(addr: SocketAddr) -> Self {
        Self(addr)
    }

    pub fn control_addr(&self) -> SocketAddr {
        self.0
    }

    pub fn heartbeat_addr(&self) -> SocketAddr {
        let mut addr = self.0;
        addr.set_port(self.0.port().wrapping_add(1));
        addr
    }

    /// Map the source of a heartbeat datagram back to the process that sent it.
    pub fn from_heartbeat_source(src: SocketAddr) -> Self {
        let mut addr = src;
        addr.set_port(src.port().wrapping_sub(1));
        Self(addr)
    }

    /// An address other processes can actually reach, with room for the heartbeat port.
    pub fn is_routable(&self) -> bool {
        let port = self.0.port();
        !self.0.ip().is_unspecified() && port != 0 && port != u16::MAX
    }
}

/// Version of a membership view.
pub type ViewId = u64;

/// Sequence number the leader assigns to an admitted request.
pub type RequestId = u64;
