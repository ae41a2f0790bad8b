use std::fmt;
use std::net::UdpSocket;
use std::str::FromStr;

use log::{debug, error};
use rosc::{encoder, OscMessage, OscPacket};

use super::TransportError;
use crate::prompt::OscMessageDraft;

const UDP_SCHEME: &str = "udp://";

/// Where drafts are sent. Displays as `udp://<host>:<port>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Destination {
    pub host: String,
    pub port: u16,
}

impl Destination {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Destination {
            host: host.into(),
            port,
        }
    }

    /// `host:port` form accepted by `UdpSocket::send_to`.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}:{}", UDP_SCHEME, self.host, self.port)
    }
}

/// Parses `udp://host:port` or plain `host:port`.
impl FromStr for Destination {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TransportError::InvalidDestination(s.to_string());
        let rest = s.strip_prefix(UDP_SCHEME).unwrap_or(s);
        let (host, port) = rest.rsplit_once(':').ok_or_else(invalid)?;
        if host.is_empty() {
            return Err(invalid());
        }
        let port = port.parse::<u16>().map_err(|_| invalid())?;
        Ok(Destination::new(host, port))
    }
}

/// Anything that can deliver a draft to a destination.
pub trait OscTransport {
    /// Returns the number of bytes written.
    fn send(&self, draft: &OscMessageDraft, destination: &Destination) -> Result<usize, TransportError>;
}

/// UDP sender bound to an ephemeral local port.
pub struct OscClient {
    socket: UdpSocket,
}

impl OscClient {
    pub fn new() -> Result<Self, TransportError> {
        Self::bind("0.0.0.0:0")
    }

    pub fn bind(local_addr: &str) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(local_addr).map_err(|source| TransportError::Bind {
            addr: local_addr.to_string(),
            source,
        })?;
        Ok(OscClient { socket })
    }
}

impl OscTransport for OscClient {
    fn send(&self, draft: &OscMessageDraft, destination: &Destination) -> Result<usize, TransportError> {
        let msg: OscMessage = draft.clone().into();
        let msg_buf = encoder::encode(&OscPacket::Message(msg))?;
        match self.socket.send_to(&msg_buf, destination.socket_addr()) {
            Ok(bytes_sent) => {
                debug!("[OSC] Sent {} bytes to {}: {}", bytes_sent, destination, draft.address);
                Ok(bytes_sent)
            }
            Err(e) => {
                error!("[OSC] Failed to send to {}: {}", destination, e);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_display() {
        let dest = Destination::new("127.0.0.1", 53700);
        assert_eq!(dest.to_string(), "udp://127.0.0.1:53700");
        assert_eq!(dest.socket_addr(), "127.0.0.1:53700");
    }

    #[test]
    fn test_destination_parse() {
        let dest: Destination = "udp://10.0.0.2:9000".parse().unwrap();
        assert_eq!(dest, Destination::new("10.0.0.2", 9000));
        let plain: Destination = "localhost:9001".parse().unwrap();
        assert_eq!(plain, Destination::new("localhost", 9001));
    }

    #[test]
    fn test_destination_parse_rejects_garbage() {
        for bad in ["udp://nohost", "udp://:9000", "host:port", "host:70000"] {
            assert!(
                matches!(bad.parse::<Destination>(), Err(TransportError::InvalidDestination(_))),
                "{}",
                bad
            );
        }
    }
}
