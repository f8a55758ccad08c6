//! Global presence map keyed by display name.
//!
//! Presence is deliberately keyed by name, not connection id: two live
//! connections sharing a name clobber each other's offline signal. Known
//! imprecision, kept as-is.

use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Offline,
}

impl PresenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

/// Display name -> last announced status. Entries are created on first join
/// and never removed; an offline user stays listed as offline.
#[derive(Debug, Default)]
pub struct PresenceMap {
    statuses: HashMap<String, PresenceStatus>,
}

impl PresenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_online(&mut self, name: &str) {
        self.statuses.insert(name.to_string(), PresenceStatus::Online);
    }

    pub fn mark_offline(&mut self, name: &str) {
        self.statuses.insert(name.to_string(), PresenceStatus::Offline);
    }

    pub fn status_of(&self, name: &str) -> Option<PresenceStatus> {
        self.statuses.get(name).copied()
    }

    /// Current presence for all names ever seen, for the snapshot endpoint.
    pub fn snapshot(&self) -> Vec<(String, PresenceStatus)> {
        self.statuses
            .iter()
            .map(|(name, status)| (name.clone(), *status))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions() {
        let mut presence = PresenceMap::new();
        assert_eq!(presence.status_of("alice"), None);

        presence.mark_online("alice");
        assert_eq!(presence.status_of("alice"), Some(PresenceStatus::Online));

        presence.mark_offline("alice");
        assert_eq!(presence.status_of("alice"), Some(PresenceStatus::Offline));

        // Re-announcing online is always allowed.
        presence.mark_online("alice");
        assert_eq!(presence.status_of("alice"), Some(PresenceStatus::Online));
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PresenceStatus::Online).unwrap(),
            "\"online\""
        );
    }
}
