use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error, info, warn};
use rosc::{decoder, OscPacket, OscType};

use super::TransportError;

/// How long a blocking receive waits before the stop flag is checked again.
const READ_TIMEOUT: Duration = Duration::from_millis(200);
/// Pause after a receive error that is not a timeout.
const ERROR_BACKOFF: Duration = Duration::from_millis(100);
/// Consecutive receive errors after which the listener gives up.
const MAX_CONSECUTIVE_ERRORS: u32 = 50;

/// One inbound OSC message.
#[derive(Clone, Debug, PartialEq)]
pub struct ReceivedMessage {
    pub from: SocketAddr,
    pub address: String,
    pub arguments: Vec<OscType>,
}

/// Handle to a background thread that listens for OSC on a UDP port and
/// forwards every decoded message to a channel.
///
/// Dropping the handle stops the thread.
pub struct OscListener {
    local_addr: SocketAddr,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl OscListener {
    /// Bind `bind_addr` (port 0 picks a free port) and start listening.
    pub fn spawn(bind_addr: &str, tx: Sender<ReceivedMessage>) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(bind_addr).map_err(|source| TransportError::Bind {
            addr: bind_addr.to_string(),
            source,
        })?;
        // Timeout so the stop flag is checked periodically
        socket.set_read_timeout(Some(READ_TIMEOUT))?;
        let local_addr = socket.local_addr()?;
        info!("OSC listener bound on {}", local_addr);

        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("osc-listener".to_string())
            .spawn(move || listen_loop(socket, tx, thread_stop))?;

        Ok(OscListener {
            local_addr,
            stop,
            handle: Some(handle),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop the listener thread and wait for it to exit.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for OscListener {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

/// Counts consecutive hard receive errors.
#[derive(Debug, Default)]
struct RecvBackoff {
    consecutive: u32,
}

impl RecvBackoff {
    /// Record an error. Returns how long to pause, or `None` once the
    /// listener should stop.
    fn on_error(&mut self) -> Option<Duration> {
        self.consecutive += 1;
        (self.consecutive < MAX_CONSECUTIVE_ERRORS).then_some(ERROR_BACKOFF)
    }

    fn reset(&mut self) {
        self.consecutive = 0;
    }
}

fn listen_loop(socket: UdpSocket, tx: Sender<ReceivedMessage>, stop: Arc<AtomicBool>) {
    let mut buf = [0u8; decoder::MTU];
    let mut backoff = RecvBackoff::default();

    loop {
        if stop.load(Ordering::SeqCst) {
            break;
        }

        match socket.recv_from(&mut buf) {
            Ok((size, peer_addr)) => {
                backoff.reset();
                debug!("Received {} bytes from {}", size, peer_addr);
                match decoder::decode_udp(&buf[..size]) {
                    Ok((_, packet)) => {
                        if deliver_packet(packet, peer_addr, &tx).is_err() {
                            debug!("OSC listener: receiver dropped, shutting down");
                            break;
                        }
                    }
                    Err(err) => {
                        warn!("OSC decode error from {}: {}", peer_addr, err);
                    }
                }
            }
            Err(ref e)
                if e.kind() == std::io::ErrorKind::WouldBlock || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                continue;
            }
            Err(err) => {
                error!("OSC recv error: {}", err);
                match backoff.on_error() {
                    Some(pause) => thread::sleep(pause),
                    None => {
                        error!("OSC listener giving up after {} consecutive errors", MAX_CONSECUTIVE_ERRORS);
                        break;
                    }
                }
            }
        }
    }

    info!("OSC listener exiting");
}

/// Send every message in `packet` on `tx`. Bundles are flattened in order.
fn deliver_packet(packet: OscPacket, from: SocketAddr, tx: &Sender<ReceivedMessage>) -> Result<(), ()> {
    match packet {
        OscPacket::Message(msg) => tx
            .send(ReceivedMessage {
                from,
                address: msg.addr,
                arguments: msg.args,
            })
            .map_err(|_| ()),
        OscPacket::Bundle(bundle) => {
            for pkt in bundle.content {
                deliver_packet(pkt, from, tx)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosc::{encoder, OscBundle, OscMessage, OscTime};
    use std::sync::mpsc::channel;

    fn msg(addr: &str, args: Vec<OscType>) -> OscPacket {
        OscPacket::Message(OscMessage {
            addr: addr.to_string(),
            args,
        })
    }

    #[test]
    fn test_bundle_is_flattened() {
        let (tx, rx) = channel();
        let from: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let bundle = OscPacket::Bundle(OscBundle {
            timetag: OscTime::from((0, 1)),
            content: vec![msg("/a", vec![OscType::Int(1)]), msg("/b", vec![])],
        });

        deliver_packet(bundle, from, &tx).unwrap();

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert_eq!(first.address, "/a");
        assert_eq!(first.arguments, vec![OscType::Int(1)]);
        assert_eq!(second.address, "/b");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_deliver_fails_when_receiver_dropped() {
        let (tx, rx) = channel();
        drop(rx);
        let from: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        assert!(deliver_packet(msg("/a", vec![]), from, &tx).is_err());
    }

    #[test]
    fn test_backoff_gives_up_after_repeated_errors() {
        let mut backoff = RecvBackoff::default();
        for _ in 1..MAX_CONSECUTIVE_ERRORS {
            assert_eq!(backoff.on_error(), Some(ERROR_BACKOFF));
        }
        assert_eq!(backoff.on_error(), None);
    }

    #[test]
    fn test_backoff_resets_on_success() {
        let mut backoff = RecvBackoff::default();
        for _ in 1..MAX_CONSECUTIVE_ERRORS {
            backoff.on_error();
        }
        backoff.reset();
        assert_eq!(backoff.on_error(), Some(ERROR_BACKOFF));
    }

    #[test]
    fn test_listener_receives_and_skips_garbage() {
        let (tx, rx) = channel();
        let listener = OscListener::spawn("127.0.0.1:0", tx).unwrap();

        let sock = UdpSocket::bind("127.0.0.1:0").unwrap();
        sock.send_to(b"not osc", listener.local_addr()).unwrap();
        let buf = encoder::encode(&msg("/ping", vec![OscType::Float(0.5)])).unwrap();
        sock.send_to(&buf, listener.local_addr()).unwrap();

        let received = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(received.address, "/ping");
        assert_eq!(received.arguments, vec![OscType::Float(0.5)]);
        assert_eq!(received.from, sock.local_addr().unwrap());

        listener.shutdown();
    }
}
