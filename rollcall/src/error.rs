use super::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("message is malformed: {0}")]
    MalformedMessage(&'static str),
    #[error("failed to encode or decode message. error={0}")]
    Codec(#[from] bincode::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("host list is empty")]
    EmptyHostList,
    #[error("node (id={0}) is stopped")]
    NodeStopped(NodeAddress),
}
