use std::fmt;

use log::debug;
use rosc::{OscMessage, OscType};
use thiserror::Error;

/// Token delimiter. Only the ASCII space splits a prompt, so consecutive
/// spaces produce empty tokens and tabs stay inside a token.
const DELIMITER: char = ' ';

/// A single typed argument of an OSC message composed from a prompt.
#[derive(Clone, Debug, PartialEq)]
pub enum OscArgument {
    Int(i32),
    Float(f32),
    Text(String),
}

/// Parsed prompt, ready to be handed to a transport.
///
/// Callers expect `address` to start with `/`. The parser only guarantees
/// that it is non-empty.
#[derive(Clone, Debug, PartialEq)]
pub struct OscMessageDraft {
    pub address: String,
    pub arguments: Vec<OscArgument>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("prompt is empty")]
    EmptyInput,
    #[error("prompt has no OSC address before the first space")]
    EmptyAddress,
    #[error("token '{token}' looks numeric but is not a valid number")]
    MalformedNumber { token: String },
}

/// Convert a prompt such as `/foo 1 2.5 bar` into an [`OscMessageDraft`].
///
/// The first space-separated token is the address. Every remaining token
/// becomes one argument: digits only is an `Int`, digits and dots is a
/// `Float`, anything else (the empty token included) is `Text`. A token that
/// is made of digits and dots but does not convert (`.`, `1.2.3`, an integer
/// beyond `i32`) rejects the whole prompt.
pub fn parse_prompt(prompt: &str) -> Result<OscMessageDraft, PromptError> {
    if prompt.is_empty() {
        debug!("Prompt is empty");
        return Err(PromptError::EmptyInput);
    }

    debug!("Parsing the prompt...");
    let mut tokens = prompt.split(DELIMITER);
    let address = tokens.next().unwrap_or_default();
    if address.is_empty() {
        return Err(PromptError::EmptyAddress);
    }
    debug!("OSC path found: \"{}\"", address);

    let arguments = tokens.map(classify_token).collect::<Result<Vec<_>, _>>()?;

    debug!("Parsing completed with {} argument(s)", arguments.len());
    Ok(OscMessageDraft {
        address: address.to_string(),
        arguments,
    })
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit() || c == '.')
}

fn classify_token(token: &str) -> Result<OscArgument, PromptError> {
    let malformed = || PromptError::MalformedNumber {
        token: token.to_string(),
    };

    if !is_numeric(token) {
        debug!("Token \"{}\" will be sent as a 'string'", token);
        return Ok(OscArgument::Text(token.to_string()));
    }

    if token.contains('.') {
        debug!("Token \"{}\" is detected as a 'float'", token);
        // Out of f32 range parses as inf, which is not what was typed
        match token.parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(OscArgument::Float(v)),
            _ => Err(malformed()),
        }
    } else {
        debug!("Token \"{}\" is detected as an 'integer'", token);
        token.parse::<i32>().map(OscArgument::Int).map_err(|_| malformed())
    }
}

impl fmt::Display for OscArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OscArgument::Int(v) => write!(f, "{}", v),
            // Keep a decimal point so the value parses back as a float
            OscArgument::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            OscArgument::Float(v) => write!(f, "{}", v),
            OscArgument::Text(s) => f.write_str(s),
        }
    }
}

/// Renders the draft back in prompt form, e.g. `/foo 1 2.5 bar`.
impl fmt::Display for OscMessageDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)?;
        for arg in &self.arguments {
            write!(f, "{}{}", DELIMITER, arg)?;
        }
        Ok(())
    }
}

impl From<OscArgument> for OscType {
    fn from(arg: OscArgument) -> Self {
        match arg {
            OscArgument::Int(v) => OscType::Int(v),
            OscArgument::Float(v) => OscType::Float(v),
            OscArgument::Text(s) => OscType::String(s),
        }
    }
}

impl From<OscMessageDraft> for OscMessage {
    fn from(draft: OscMessageDraft) -> Self {
        OscMessage {
            addr: draft.address,
            args: draft.arguments.into_iter().map(OscType::from).collect(),
        }
    }
}
