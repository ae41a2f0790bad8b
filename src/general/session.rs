use crate::config::OscConfig;
use crate::path_ext::PathExt;
use crate::remote::osc_sender::Destination;

/// Connection settings and prompt text for one interactive session.
///
/// Everything is changed through explicit setters; nothing is bound to UI
/// widgets.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    server_host: String,
    server_port: u16,
    client_port: u16,
    prompt: String,
    base_path: Option<String>,
}

impl Session {
    pub fn new(server_host: impl Into<String>, server_port: u16, client_port: u16) -> Self {
        Session {
            server_host: server_host.into(),
            server_port,
            client_port,
            prompt: String::new(),
            base_path: None,
        }
    }

    pub fn from_config(config: &OscConfig) -> Self {
        let mut session = Session::new(config.server_host.clone(), config.server_port, config.client_port);
        if let Some(base) = &config.base_path {
            session.set_base_path(base);
        }
        session
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn client_port(&self) -> u16 {
        self.client_port
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    pub fn set_server_host(&mut self, host: impl Into<String>) {
        self.server_host = host.into();
    }

    pub fn set_server_port(&mut self, port: u16) {
        self.server_port = port;
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Set the prefix for relative addresses. A relative `base` is resolved
    /// against the current one.
    pub fn set_base_path(&mut self, base: &str) {
        let resolved = match (&self.base_path, base.starts_with('/')) {
            (Some(current), false) => current.joining([base]),
            _ => base.cleaned_path(),
        };
        self.base_path = Some(resolved);
    }

    pub fn clear_base_path(&mut self) {
        self.base_path = None;
    }

    /// Move the base path one level up. Returns false when there is no base
    /// path or it is already at the root.
    pub fn base_up(&mut self) -> bool {
        let parent = match self.base_path.as_deref().and_then(|b| b.parent()) {
            Some(p) => p.to_string(),
            None => return false,
        };
        self.base_path = if parent.is_empty() { None } else { Some(parent) };
        true
    }

    /// Resolve a prompt address against the base path. Absolute addresses
    /// and sessions without a base path are returned unchanged.
    pub fn resolve_address(&self, address: &str) -> String {
        match &self.base_path {
            Some(base) if !address.starts_with('/') => base.joining([address]),
            _ => address.to_string(),
        }
    }

    pub fn destination(&self) -> Destination {
        Destination::new(self.server_host.clone(), self.server_port)
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::from_config(&OscConfig::default())
    }
}
