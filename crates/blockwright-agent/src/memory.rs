//! Declaration memory: key/value notes the agent keeps about its own plans.
//!
//! Lives for the session only. Snapshots are ordered by key so the JSON the
//! model sees is deterministic.

use std::collections::BTreeMap;

pub type Declarations = BTreeMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    declarations: Declarations,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert `key` and return the full set afterwards.
    pub fn add_declaration(&mut self, key: impl Into<String>, value: impl Into<String>) -> Declarations {
        let key = key.into();
        let value = value.into();
        if let Some(prev) = self.declarations.insert(key.clone(), value) {
            tracing::debug!(key = %key, previous = %prev, "declaration overwritten");
        }
        self.declarations.clone()
    }

    pub fn view_declarations(&self) -> Declarations {
        self.declarations.clone()
    }

    pub fn clear(&mut self) {
        self.declarations.clear();
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_overwrites() {
        let mut mem = MemoryStore::new();
        mem.add_declaration("plan", "build tower");
        let snap = mem.add_declaration("plan", "build bridge");
        assert_eq!(snap.len(), 1);
        assert_eq!(
            serde_json::to_value(mem.view_declarations()).unwrap(),
            serde_json::json!({"plan": "build bridge"})
        );
    }

    #[test]
    fn test_snapshot_is_owned_and_ordered() {
        let mut mem = MemoryStore::new();
        mem.add_declaration("zeta", "1");
        mem.add_declaration("alpha", "2");
        let snap = mem.view_declarations();
        mem.add_declaration("mid", "3");
        assert_eq!(snap.keys().collect::<Vec<_>>(), ["alpha", "zeta"]);
        assert_eq!(mem.len(), 3);

        mem.clear();
        assert!(mem.is_empty());
    }
}
