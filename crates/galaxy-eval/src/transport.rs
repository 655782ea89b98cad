//! The external send boundary.
//!
//! The evaluator never talks to the network itself. Whatever carries a
//! modulated payload to the remote peer and back implements [`Transport`]
//! and is installed on the [`Graph`](crate::Graph).

use galaxy_types::Data;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No transport is installed on the graph.
    #[error("no transport installed")]
    Unavailable,

    /// The transport could not deliver the payload or read a reply.
    #[error("{0}")]
    Failed(String),
}

/// Synchronous request/reply channel to the remote peer.
pub trait Transport {
    /// Send `data` and block until the peer replies.
    fn send(&mut self, data: &Data) -> Result<Data, TransportError>;
}

impl<F> Transport for F
where
    F: FnMut(&Data) -> Result<Data, TransportError>,
{
    fn send(&mut self, data: &Data) -> Result<Data, TransportError> {
        self(data)
    }
}
