//! Player presence registry.
//!
//! Tracks who is currently connected (with the peer address game clients
//! dial for head-to-head play) and carries one-shot match requests between
//! players. The registry is the candidate pool handed to the tournament
//! engine on start and preview; it survives tournament resets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::bracket::entities::Username;
use crate::errors::LobbyError;

/// A registered player.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerEntry {
    pub name: Username,
    /// Host and port other clients connect to for a game.
    pub host: String,
    pub port: u16,
    pub joined: DateTime<Utc>,
    /// Pending match request from another player, delivered once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_request: Option<Username>,
}

#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: HashMap<Username, PlayerEntry>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player, or refresh an existing registration.
    ///
    /// Re-joining replaces the whole entry: the join time is refreshed and
    /// any pending match request is dropped.
    pub fn join(&mut self, name: Username, host: String, port: u16) {
        log::info!("{name} joined from {host}:{port}");
        self.players.insert(
            name.clone(),
            PlayerEntry {
                name,
                host,
                port,
                joined: Utc::now(),
                pending_request: None,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, name: &Username) -> bool {
        self.players.contains_key(name)
    }

    /// Registered names in join order (ties broken by name).
    pub fn names(&self) -> Vec<Username> {
        self.entries().into_iter().map(|e| e.name).collect()
    }

    /// All registrations in join order (ties broken by name).
    pub fn entries(&self) -> Vec<PlayerEntry> {
        let mut entries: Vec<PlayerEntry> = self.players.values().cloned().collect();
        entries.sort_by(|a, b| a.joined.cmp(&b.joined).then_with(|| a.name.cmp(&b.name)));
        entries
    }

    /// Store a match request on the target player.
    ///
    /// A newer request replaces an older undelivered one. Fails if the
    /// target is not registered; the sender is not checked.
    pub fn propose(&mut self, from: &Username, to: &Username) -> Result<(), LobbyError> {
        let target = self
            .players
            .get_mut(to)
            .ok_or_else(|| LobbyError::UnknownPlayer(to.to_string()))?;
        target.pending_request = Some(from.clone());
        Ok(())
    }

    /// Remove and return the pending match request for a player, if any.
    pub fn take_request(&mut self, name: &Username) -> Option<Username> {
        self.players
            .get_mut(name)
            .and_then(|entry| entry.pending_request.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn name(s: &str) -> Username {
        Username::new(s)
    }

    #[test]
    fn test_join_registers_player() {
        let mut registry = PlayerRegistry::new();
        assert!(registry.is_empty());

        registry.join(name("alice"), "10.0.0.1".to_string(), 8001);

        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&name("alice")));
    }

    #[test]
    fn test_rejoin_replaces_entry() {
        let mut registry = PlayerRegistry::new();
        registry.join(name("alice"), "10.0.0.1".to_string(), 8001);
        registry.propose(&name("bob"), &name("alice")).unwrap();

        registry.join(name("alice"), "10.0.0.2".to_string(), 9001);

        assert_eq!(registry.len(), 1);
        let entry = &registry.entries()[0];
        assert_eq!(entry.host, "10.0.0.2");
        assert_eq!(entry.port, 9001);
        assert!(entry.pending_request.is_none(), "rejoin drops the request");
    }

    #[test]
    fn test_entries_ordered_by_join_time() {
        let mut registry = PlayerRegistry::new();
        // Join in reverse-alphabetical order so ordering can't be an
        // accident of the name tie-break.
        for player in ["zed", "mia", "amy"] {
            registry.join(name(player), "10.0.0.1".to_string(), 8000);
            thread::sleep(Duration::from_millis(5));
        }

        let names = registry.names();
        assert_eq!(names, vec![name("zed"), name("mia"), name("amy")]);
    }

    #[test]
    fn test_propose_to_unknown_player_fails() {
        let mut registry = PlayerRegistry::new();
        registry.join(name("alice"), "10.0.0.1".to_string(), 8001);

        let err = registry.propose(&name("alice"), &name("ghost")).unwrap_err();
        assert_eq!(err, LobbyError::UnknownPlayer("ghost".to_string()));
    }

    #[test]
    fn test_request_is_delivered_once() {
        let mut registry = PlayerRegistry::new();
        registry.join(name("alice"), "10.0.0.1".to_string(), 8001);
        registry.join(name("bob"), "10.0.0.2".to_string(), 8002);

        registry.propose(&name("bob"), &name("alice")).unwrap();

        assert_eq!(registry.take_request(&name("alice")), Some(name("bob")));
        assert_eq!(registry.take_request(&name("alice")), None);
    }

    #[test]
    fn test_newer_request_replaces_older() {
        let mut registry = PlayerRegistry::new();
        for player in ["alice", "bob", "carol"] {
            registry.join(name(player), "10.0.0.1".to_string(), 8000);
        }

        registry.propose(&name("bob"), &name("alice")).unwrap();
        registry.propose(&name("carol"), &name("alice")).unwrap();

        assert_eq!(registry.take_request(&name("alice")), Some(name("carol")));
        assert_eq!(registry.take_request(&name("alice")), None);
    }
}
