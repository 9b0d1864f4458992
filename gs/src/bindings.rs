//! Per-server channel binding
//!
//! A server with a bound channel only accepts point commands from that
//! channel. Servers without a binding accept every channel. The bindings are
//! plain state handed to the command layer; nothing here is global.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

use crate::error::StoreError;
use crate::store::{ChannelKey, write_atomic};

/// Server id -> bound channel id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bindings {
    #[serde(default)]
    channels: BTreeMap<String, String>,
}

impl Bindings {
    /// Load bindings from a YAML file; a missing file means no bindings
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(StoreError::io(path, e)),
        };
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let bindings: Bindings = serde_yaml::from_str(&content).map_err(|source| StoreError::Bindings {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), count = bindings.channels.len(), "Loaded channel bindings");
        Ok(bindings)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let content = serde_yaml::to_string(self).map_err(|source| StoreError::Bindings {
            path: path.to_path_buf(),
            source,
        })?;
        write_atomic(path, content.as_bytes())
    }

    /// Bind a server to a channel, returning the channel it was bound to before
    pub fn bind(&mut self, key: &ChannelKey) -> Option<String> {
        self.channels.insert(key.server().to_string(), key.channel().to_string())
    }

    /// Drop a server's binding; false if it had none
    pub fn unbind(&mut self, server: &str) -> bool {
        self.channels.remove(server).is_some()
    }

    pub fn bound_channel(&self, server: &str) -> Option<&str> {
        self.channels.get(server).map(String::as_str)
    }

    /// Whether commands may run in this channel
    pub fn permits(&self, key: &ChannelKey) -> bool {
        match self.bound_channel(key.server()) {
            Some(bound) => bound == key.channel(),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key(server: &str, channel: &str) -> ChannelKey {
        ChannelKey::new(server, channel).unwrap()
    }

    #[test]
    fn test_unbound_server_permits_all() {
        let bindings = Bindings::default();
        assert!(bindings.permits(&key("g1", "c1")));
        assert!(bindings.permits(&key("g1", "c2")));
    }

    #[test]
    fn test_bound_server_permits_only_bound_channel() {
        let mut bindings = Bindings::default();
        assert_eq!(bindings.bind(&key("g1", "c1")), None);

        assert!(bindings.permits(&key("g1", "c1")));
        assert!(!bindings.permits(&key("g1", "c2")));
        // other servers are unaffected
        assert!(bindings.permits(&key("g2", "c9")));
    }

    #[test]
    fn test_rebind_and_unbind() {
        let mut bindings = Bindings::default();
        bindings.bind(&key("g1", "c1"));
        assert_eq!(bindings.bind(&key("g1", "c2")), Some("c1".to_string()));
        assert_eq!(bindings.bound_channel("g1"), Some("c2"));

        assert!(bindings.unbind("g1"));
        assert!(!bindings.unbind("g1"));
        assert!(bindings.permits(&key("g1", "c1")));
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bindings.yml");

        assert_eq!(Bindings::load(&path).unwrap(), Bindings::default());

        let mut bindings = Bindings::default();
        bindings.bind(&key("g1", "c1"));
        bindings.bind(&key("g2", "c7"));
        bindings.save(&path).unwrap();

        let loaded = Bindings::load(&path).unwrap();
        assert_eq!(loaded, bindings);
        assert_eq!(loaded.bound_channel("g2"), Some("c7"));
    }

    #[test]
    fn test_load_malformed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bindings.yml");
        fs::write(&path, "channels: [not, a, map]\n").unwrap();

        let err = Bindings::load(&path).unwrap_err();
        assert!(err.is_corrupt());
    }
}
