//! Radio ID access-control list: `rid_acl.dat`, CSV `id,enabled,default,alias`
//! (spec.md §6), grounded on the source `RadioIdLookup`/`RadioId` pair.

use std::collections::HashMap;
use std::path::Path;

use super::{parse_error, read_lines, ReloadingTable};
use crate::error::Result;

/// A single radio ID ACL entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RadioId {
    pub enabled: bool,
    pub default: bool,
    pub alias: String,
}

impl RadioId {
    pub fn new(enabled: bool, default: bool) -> Self {
        RadioId {
            enabled,
            default,
            alias: String::new(),
        }
    }
}

/// Reloadable radio ID ACL.
pub struct RadioIdLookup {
    inner: ReloadingTable<RadioId>,
}

impl RadioIdLookup {
    pub fn open(filename: impl Into<std::path::PathBuf>, reload_minutes: u32) -> Result<Self> {
        Ok(RadioIdLookup {
            inner: ReloadingTable::open(filename, reload_minutes, load)?,
        })
    }

    pub fn find(&self, id: u32) -> RadioId {
        self.inner.find(id).unwrap_or(RadioId {
            enabled: false,
            default: false,
            alias: String::new(),
        })
    }

    pub fn has_entry(&self, id: u32) -> bool {
        self.inner.has_entry(id)
    }

    pub fn list(&self) -> Vec<(u32, RadioId)> {
        self.inner.entries()
    }

    pub fn stop(self) {
        self.inner.stop();
    }
}

fn load(path: &Path) -> Result<HashMap<u32, RadioId>> {
    let mut table = HashMap::new();

    for line in read_lines(path)? {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 2 {
            return Err(parse_error(format!("malformed rid_acl.dat line: {line}")));
        }

        let id: u32 = fields[0]
            .trim()
            .parse()
            .map_err(|_| parse_error(format!("bad radio id in rid_acl.dat: {}", fields[0])))?;
        let enabled = parse_bool(fields[1]);
        let default = fields.get(2).map(|f| parse_bool(f)).unwrap_or(false);
        let alias = fields.get(3).map(|f| f.trim().to_string()).unwrap_or_default();

        table.insert(id, RadioId { enabled, default, alias });
    }

    Ok(table)
}

fn parse_bool(field: &str) -> bool {
    matches!(field.trim(), "1" | "true" | "TRUE" | "True")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_csv_rows() {
        let dir = std::env::temp_dir();
        let path = dir.join("rid_acl_test.dat");
        std::fs::write(&path, "1000001,1,0,Alice\n1000002,0,0,Bob\n").unwrap();

        let table = load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table[&1000001].enabled);
        assert_eq!(table[&1000001].alias, "Alice");
        assert!(!table[&1000002].enabled);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unknown_id_not_enabled_by_default() {
        let dir = std::env::temp_dir();
        let path = dir.join("rid_acl_test2.dat");
        std::fs::write(&path, "1,1,0,\n").unwrap();

        let lookup = RadioIdLookup::open(&path, 0).unwrap();
        assert!(lookup.find(1).enabled);
        assert!(!lookup.find(999).enabled);

        std::fs::remove_file(&path).ok();
    }
}
