use std::io::BufRead;

use log::LevelFilter;

use crate::general::check;
use crate::general::command::{send_prompt, SendError};
use crate::general::session::Session;
use crate::remote::osc_sender::{Destination, OscTransport};

/// One line of console input.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleCommand<'a> {
    Send(&'a str),
    Server(&'a str),
    Port(&'a str),
    Base(Option<&'a str>),
    Up,
    Status,
    Debug(bool),
    Help,
    Exit,
    Unknown(&'a str),
}

/// Lines starting with `:` are console commands, anything else is a prompt.
/// Only the line terminator is stripped from prompts.
pub fn parse_line(line: &str) -> ConsoleCommand<'_> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);

    let Some(cmd) = line.strip_prefix(':') else {
        return ConsoleCommand::Send(line);
    };
    let cmd = cmd.trim();
    let (name, arg) = match cmd.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (cmd, None),
    };

    match (name.to_ascii_lowercase().as_str(), arg) {
        ("q" | "quit" | "exit", _) => ConsoleCommand::Exit,
        ("help" | "h", _) => ConsoleCommand::Help,
        ("status", _) => ConsoleCommand::Status,
        ("up", _) => ConsoleCommand::Up,
        ("base", arg) => ConsoleCommand::Base(arg),
        ("server", Some(host)) => ConsoleCommand::Server(host),
        ("port", Some(port)) => ConsoleCommand::Port(port),
        ("debug", Some(a)) if a.eq_ignore_ascii_case("on") || a.eq_ignore_ascii_case("enable") => {
            ConsoleCommand::Debug(true)
        }
        ("debug", Some(a)) if a.eq_ignore_ascii_case("off") || a.eq_ignore_ascii_case("disable") => {
            ConsoleCommand::Debug(false)
        }
        _ => ConsoleCommand::Unknown(cmd),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /path [args...]  - Send an OSC message (ints, floats, strings)");
    println!("  name [args...]   - Send to <base path>/name when a base path is set");
    println!("  :server <host>   - Set the server host (udp://host:port sets both)");
    println!("  :port <n>        - Set the server port");
    println!("  :base [path]     - Set (or clear) the base path for relative addresses");
    println!("  :up              - Move the base path one level up");
    println!("  :status          - Show connection settings");
    println!("  :debug on/off    - Enable/Disable verbose debug logging");
    println!("  :help/:h         - Show this help");
    println!("  :q/:quit/:exit   - Exit program");
}

/// Apply one console line to the session. Returns false when the user asked
/// to exit.
pub fn handle_line<T: OscTransport + ?Sized>(line: &str, session: &mut Session, transport: &T) -> bool {
    match parse_line(line) {
        ConsoleCommand::Send(prompt) => {
            session.set_prompt(prompt);
            match send_prompt(session.prompt(), session, transport) {
                Ok(sent) => check::print_sent(&sent),
                Err(SendError::Prompt(e)) => check::print_invalid(&e.to_string()),
                Err(e) => check::print_error(&e.to_string()),
            }
            // The field is cleared after every attempt
            session.set_prompt("");
        }
        // `udp://host:port` or `host:port` sets both, a bare host keeps the port
        ConsoleCommand::Server(target) if target.contains(':') => match target.parse::<Destination>() {
            Ok(dest) => {
                session.set_server_host(dest.host);
                session.set_server_port(dest.port);
                println!("Sending to {}", session.destination());
            }
            Err(e) => check::print_error(&e.to_string()),
        },
        ConsoleCommand::Server(host) => {
            session.set_server_host(host);
            println!("Sending to {}", session.destination());
        }
        ConsoleCommand::Port(port) => match port.parse::<u16>() {
            Ok(p) => {
                session.set_server_port(p);
                println!("Sending to {}", session.destination());
            }
            Err(_) => check::print_error(&format!("Invalid port '{}'", port)),
        },
        ConsoleCommand::Base(Some(path)) => {
            session.set_base_path(path);
            println!("Base path set to {}", session.base_path().unwrap_or("(none)"));
        }
        ConsoleCommand::Base(None) => {
            session.clear_base_path();
            println!("Base path cleared");
        }
        ConsoleCommand::Up => {
            if session.base_up() {
                println!("Base path set to {}", session.base_path().unwrap_or("(none)"));
            } else {
                println!("No base path to move up from");
            }
        }
        ConsoleCommand::Status => check::print_status(session),
        ConsoleCommand::Debug(enabled) => {
            log::set_max_level(if enabled { LevelFilter::Debug } else { LevelFilter::Info });
            println!("Debug {}", if enabled { "enabled" } else { "disabled" });
        }
        ConsoleCommand::Help => print_help(),
        ConsoleCommand::Exit => return false,
        ConsoleCommand::Unknown(cmd) => {
            println!("Unrecognized command: ':{}'. Type ':help' for available commands.", cmd);
        }
    }
    true
}

/// Read lines from `input` until EOF or an exit command.
pub fn run_console<R: BufRead, T: OscTransport + ?Sized>(mut input: R, session: &mut Session, transport: &T) {
    let mut line = String::new();
    loop {
        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::error!("Failed to read stdin: {}", e);
                break;
            }
        }
        if !handle_line(&line, session, transport) {
            break;
        }
    }
}
