//! Send and receive Open Sound Control messages over UDP.
//!
//! Messages are composed as one line of text, e.g. `/synth/freq 440 0.5 sine`,
//! which [`prompt::parse_prompt`] turns into a typed [`prompt::OscMessageDraft`].

pub mod config;
pub mod general;
pub mod path_ext;
pub mod prompt;
pub mod remote;
