//! Talkgroup rules ACL: `tg_acl.yml`, grounded on the source `TalkgroupRulesLookup`'s
//! documented YAML shape (spec.md §6, §3's `[ADDED]` talkgroup ACL entry).
//!
//! Parsing requires the `ser` feature (default-on); without it the table can still be
//! constructed programmatically and queried, it just can't be loaded from a file.

use std::collections::HashMap;
use std::path::Path;

use super::ReloadingTable;
use crate::error::Result;

/// Outbound TGID/slot rewrite applied per peer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "ser", derive(serde::Deserialize))]
#[cfg_attr(feature = "ser", serde(default))]
pub struct TalkgroupRewrite {
    pub peer_id: u32,
    pub tgid: u32,
    pub slot: u8,
}

/// A single talkgroup's membership/routing rule.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "ser", derive(serde::Deserialize))]
#[cfg_attr(feature = "ser", serde(default))]
pub struct TalkgroupEntry {
    pub name: String,
    pub id: u32,
    pub active: bool,
    pub affiliated: bool,
    pub parrot: bool,
    #[cfg_attr(feature = "ser", serde(rename = "non-preferred"))]
    pub non_preferred: bool,
    pub source: String,
    pub inclusion: Vec<u32>,
    pub exclusion: Vec<u32>,
    pub rewrite: Vec<TalkgroupRewrite>,
    pub always_send: Vec<u32>,
}

impl Default for TalkgroupEntry {
    fn default() -> Self {
        TalkgroupEntry {
            name: String::new(),
            id: 0,
            active: true,
            affiliated: false,
            parrot: false,
            non_preferred: false,
            source: String::new(),
            inclusion: Vec::new(),
            exclusion: Vec::new(),
            rewrite: Vec::new(),
            always_send: Vec::new(),
        }
    }
}

impl TalkgroupEntry {
    /// Whether `peer_id` is permitted to carry traffic for this talkgroup: an empty
    /// inclusion list means "all peers except those excluded".
    pub fn permits_peer(&self, peer_id: u32) -> bool {
        if self.exclusion.contains(&peer_id) {
            return false;
        }
        self.inclusion.is_empty() || self.inclusion.contains(&peer_id)
    }

    /// Applies this entry's per-peer rewrite rule, if one targets `peer_id`.
    pub fn rewrite_for(&self, peer_id: u32) -> Option<&TalkgroupRewrite> {
        self.rewrite.iter().find(|r| r.peer_id == peer_id)
    }
}

/// Reloadable talkgroup ACL, keyed by talkgroup ID.
pub struct TgAclLookup {
    inner: ReloadingTable<TalkgroupEntry>,
}

impl TgAclLookup {
    pub fn open(filename: impl Into<std::path::PathBuf>, reload_minutes: u32) -> Result<Self> {
        Ok(TgAclLookup {
            inner: ReloadingTable::open(filename, reload_minutes, load)?,
        })
    }

    pub fn find(&self, id: u32) -> Option<TalkgroupEntry> {
        self.inner.find(id)
    }

    pub fn list(&self) -> Vec<TalkgroupEntry> {
        self.inner.list()
    }

    pub fn stop(self) {
        self.inner.stop();
    }
}

#[cfg(feature = "ser")]
fn load(path: &Path) -> Result<HashMap<u32, TalkgroupEntry>> {
    let contents = std::fs::read_to_string(path)?;
    let entries: Vec<TalkgroupEntry> = serde_yaml::from_str(&contents)
        .map_err(|e| super::parse_error(format!("failed to parse tg_acl.yml: {e}")))?;
    Ok(entries.into_iter().map(|e| (e.id, e)).collect())
}

#[cfg(not(feature = "ser"))]
fn load(_path: &Path) -> Result<HashMap<u32, TalkgroupEntry>> {
    Err(super::parse_error(
        "tg_acl.yml parsing requires the `ser` feature",
    ))
}

#[cfg(all(test, feature = "ser"))]
mod tests {
    use super::*;

    #[test]
    fn parses_yaml_entries() {
        let dir = std::env::temp_dir();
        let path = dir.join("tg_acl_test.yml");
        std::fs::write(
            &path,
            "- name: Statewide\n  id: 9\n  active: true\n  affiliated: false\n  inclusion: [1, 2]\n",
        )
        .unwrap();

        let lookup = TgAclLookup::open(&path, 0).unwrap();
        let entry = lookup.find(9).unwrap();
        assert_eq!(entry.name, "Statewide");
        assert!(entry.permits_peer(1));
        assert!(!entry.permits_peer(3));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn exclusion_overrides_inclusion() {
        let entry = TalkgroupEntry {
            inclusion: vec![1, 2, 3],
            exclusion: vec![2],
            ..Default::default()
        };
        assert!(entry.permits_peer(1));
        assert!(!entry.permits_peer(2));
    }
}
