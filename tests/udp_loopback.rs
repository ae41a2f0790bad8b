use std::sync::mpsc::channel;
use std::time::Duration;

use rosc::OscType;

use osc_toolbox::general::command::send_prompt;
use osc_toolbox::general::session::Session;
use osc_toolbox::remote::osc_listener::OscListener;
use osc_toolbox::remote::osc_sender::OscClient;

#[test]
fn prompt_reaches_listener_over_loopback() {
    let (tx, rx) = channel();
    let listener = OscListener::spawn("127.0.0.1:0", tx).unwrap();
    let port = listener.local_addr().port();

    let client = OscClient::bind("127.0.0.1:0").unwrap();
    let session = Session::new("127.0.0.1", port, port);

    let sent = send_prompt("/foo 1 2.5 bar", &session, &client).unwrap();
    assert!(sent.bytes_sent > 0);

    let received = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(received.address, "/foo");
    assert_eq!(
        received.arguments,
        vec![
            OscType::Int(1),
            OscType::Float(2.5),
            OscType::String("bar".to_string()),
        ]
    );

    listener.shutdown();
}

#[test]
fn relative_address_and_empty_token_survive_the_wire() {
    let (tx, rx) = channel();
    let listener = OscListener::spawn("127.0.0.1:0", tx).unwrap();
    let port = listener.local_addr().port();

    let client = OscClient::bind("127.0.0.1:0").unwrap();
    let mut session = Session::new("127.0.0.1", port, port);
    session.set_base_path("/avatar/parameters");

    send_prompt("Jump  1", &session, &client).unwrap();

    let received = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(received.address, "/avatar/parameters/Jump");
    assert_eq!(
        received.arguments,
        vec![OscType::String(String::new()), OscType::Int(1)]
    );
}

#[test]
fn listener_stops_when_dropped() {
    let (tx, _rx) = channel();
    let listener = OscListener::spawn("127.0.0.1:0", tx).unwrap();
    let addr = listener.local_addr();
    drop(listener);

    // The port is free again once the thread has exited
    let rebound = std::net::UdpSocket::bind(addr);
    assert!(rebound.is_ok());
}
