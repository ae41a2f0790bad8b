use log::{debug, info};
use thiserror::Error;

use crate::general::session::Session;
use crate::prompt::{parse_prompt, OscMessageDraft, PromptError};
use crate::remote::osc_sender::{Destination, OscTransport};
use crate::remote::TransportError;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("invalid OSC message: {0}")]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// What was sent by [`send_prompt`].
#[derive(Clone, Debug, PartialEq)]
pub struct SentMessage {
    pub destination: Destination,
    pub draft: OscMessageDraft,
    pub bytes_sent: usize,
}

/// The "send" action: parse `prompt`, resolve its address against the
/// session's base path and send it to the session's server.
pub fn send_prompt<T: OscTransport + ?Sized>(
    prompt: &str,
    session: &Session,
    transport: &T,
) -> Result<SentMessage, SendError> {
    let mut draft = parse_prompt(prompt)?;
    let resolved = session.resolve_address(&draft.address);
    if resolved != draft.address {
        debug!("Resolved address \"{}\" -> \"{}\"", draft.address, resolved);
        draft.address = resolved;
    }

    let destination = session.destination();
    let bytes_sent = transport.send(&draft, &destination)?;
    info!("Address: {}", destination);
    info!("Message: {}", draft);

    Ok(SentMessage {
        destination,
        draft,
        bytes_sent,
    })
}
