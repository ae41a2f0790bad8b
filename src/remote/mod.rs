//! UDP plumbing: sending drafts and listening for inbound OSC.

pub mod osc_listener;
pub mod osc_sender;

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("OSC bind failed on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("OSC socket error: {0}")]
    Io(#[from] io::Error),
    #[error("OSC encode failed: {0}")]
    Encode(#[from] rosc::OscError),
    #[error("invalid destination '{0}', expected udp://<host>:<port>")]
    InvalidDestination(String),
}
