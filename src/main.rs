use std::error::Error;
use std::io::stdin;
use std::path::PathBuf;
use std::sync::mpsc::channel;
use std::thread;

use clap::Parser;
use log::{error, info, LevelFilter};

use osc_toolbox::config::{Config, DEFAULT_CONFIG_PATH};
use osc_toolbox::general::session::Session;
use osc_toolbox::general::{check, log_view, stdin_handler};
use osc_toolbox::remote::osc_listener::{OscListener, ReceivedMessage};
use osc_toolbox::remote::osc_sender::OscClient;

#[derive(Parser)]
#[command(name = "osc-toolbox", about = "Send and receive OSC messages over UDP")]
struct Cli {
    /// Path of the JSON config file (created with defaults if missing)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Host to send messages to
    #[arg(long)]
    server_host: Option<String>,

    /// Port to send messages to
    #[arg(long)]
    server_port: Option<u16>,

    /// Local port to listen for incoming messages on
    #[arg(long)]
    listen_port: Option<u16>,

    /// Verbose debug logging
    #[arg(long)]
    debug: bool,
}

fn main() {
    match run() {
        Ok(_) => (),
        Err(err) => {
            error!("{}", err);
            check::print_error(&format!("Error: {}", err));
        }
    }
}

/// The logger itself lets debug records through so `:debug on` can raise the
/// global max level later. `RUST_LOG`, when set, wins.
fn init_logging(debug: bool) {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Debug)
        .parse_default_env()
        .init();
    if std::env::var_os("RUST_LOG").is_none() {
        log::set_max_level(if debug { LevelFilter::Debug } else { LevelFilter::Info });
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut config = Config::load_or_create(&cli.config)?;
    if let Some(host) = cli.server_host {
        config.osc.server_host = host;
    }
    if let Some(port) = cli.server_port {
        config.osc.server_port = port;
    }
    if let Some(port) = cli.listen_port {
        config.osc.client_port = port;
    }
    config.debug |= cli.debug;

    init_logging(config.debug);
    info!("Setting up OSC interface...");

    let mut session = Session::from_config(&config.osc);
    let client = OscClient::new()?;

    let (tx, rx) = channel::<ReceivedMessage>();
    let listener = match OscListener::spawn(&config.osc.listening_addr(), tx) {
        Ok(listener) => Some(listener),
        Err(e) => {
            error!("{}", e);
            None
        }
    };

    // Drains received messages into the log until the listener goes away
    let printer = thread::spawn(move || {
        let mut stdout = log_view::log_stream();
        for msg in rx {
            if let Err(e) = log_view::print_received(&mut stdout, &msg) {
                error!("Failed to print received message: {}", e);
            }
        }
    });

    check::print_startup_status(&session, listener.as_ref().map(OscListener::local_addr));

    stdin_handler::run_console(stdin().lock(), &mut session, &client);

    info!("Closing connections and exiting...");
    // Dropping the listener closes the channel, which ends the printer
    if let Some(listener) = listener {
        listener.shutdown();
    }
    let _ = printer.join();

    Ok(())
}
