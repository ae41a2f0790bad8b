use std::io::{self, Write};

use rosc::OscType;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::remote::osc_listener::ReceivedMessage;

fn format_argument(arg: &OscType) -> String {
    match arg {
        OscType::Int(v) => v.to_string(),
        OscType::Long(v) => v.to_string(),
        OscType::Float(v) => format!("{:?}", v),
        OscType::Double(v) => format!("{:?}", v),
        OscType::String(s) => format!("{:?}", s),
        OscType::Bool(b) => b.to_string(),
        other => format!("{:?}", other),
    }
}

/// Text block for one received message, as it appears in the log.
pub fn format_received(msg: &ReceivedMessage) -> String {
    let args: Vec<String> = msg.arguments.iter().map(format_argument).collect();
    format!("Path: \"{}\"\nArguments: \n[{}]\n\n", msg.address, args.join(", "))
}

/// Append a received message to the console log. The path line is
/// highlighted, the rest is plain.
pub fn print_received(stdout: &mut StandardStream, msg: &ReceivedMessage) -> io::Result<()> {
    let text = format_received(msg);
    let (path_line, rest) = text.split_once('\n').unwrap_or((text.as_str(), ""));

    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_intense(true))?;
    write!(stdout, "{}", path_line)?;
    stdout.reset()?;
    write!(stdout, "  (from {})\n{}", msg.from, rest)?;
    stdout.flush()
}

pub fn log_stream() -> StandardStream {
    StandardStream::stdout(ColorChoice::Auto)
}
