//! Console front-end: session state, the send command, banners and the
//! received-message log.

pub mod check;
pub mod command;
pub mod log_view;
pub mod session;
pub mod stdin_handler;
