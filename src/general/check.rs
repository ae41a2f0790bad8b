use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::general::command::SentMessage;
use crate::general::session::Session;

fn print_colored(color: Color, text: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_intense(true));
    let _ = writeln!(&mut stdout, "{}", text);
    let _ = stdout.reset();
}

pub fn print_quick_help() {
    print_colored(Color::Blue, "Type an OSC message (e.g. /foo 1 2.5 bar), ':help' for commands, ':q' to quit");
}

/// Startup banner: green when the listener came up, red otherwise.
pub fn print_startup_status(session: &Session, listening: Option<std::net::SocketAddr>) {
    match listening {
        Some(addr) => print_colored(
            Color::Green,
            &format!("Listening on {} | Sending to {}", addr, session.destination()),
        ),
        None => print_colored(
            Color::Red,
            &format!("Listener not running | Sending to {}", session.destination()),
        ),
    }
    print_quick_help();
}

pub fn print_sent(sent: &SentMessage) {
    print_colored(
        Color::Green,
        &format!("-> {} ({} bytes): {}", sent.destination, sent.bytes_sent, sent.draft),
    );
}

pub fn print_invalid(reason: &str) {
    print_colored(Color::Red, &format!("!!! Invalid OSC Message !!! ({})", reason));
}

pub fn print_error(text: &str) {
    print_colored(Color::Red, text);
}

pub fn print_status(session: &Session) {
    println!("Server:    {}", session.destination());
    println!("Listening: port {}", session.client_port());
    println!("Base path: {}", session.base_path().unwrap_or("(none)"));
}
