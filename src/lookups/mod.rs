//! Reloadable lookup tables: radio ID ACL, talkgroup ACL/rules, bandplan identity
//! table, and the RSSI raw-ADC-to-dBm interpolator (spec.md §3, §6).
//!
//! Each concrete table wraps a [`ReloadingTable`], the generic replacement for the
//! source `LookupTable<T>` + `Thread` pairing (Design Notes): a reader/writer-guarded
//! map plus an optional background reloader task. `reload_minutes == 0` means "load
//! once, never reload" — no thread is ever spawned, and `stop()` simply drops the
//! table (Design Notes, spec.md §5).

pub mod iden_table;
pub mod radio_id;
pub mod rssi;
pub mod tg_acl;

pub use iden_table::{IdenEntry, IdenTableLookup};
pub use radio_id::{RadioId, RadioIdLookup};
pub use rssi::RssiLookup;
pub use tg_acl::{TalkgroupEntry, TalkgroupRewrite, TgAclLookup};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::util::task::Task;

/// A table of `T` keyed by a 32-bit unique ID, optionally kept fresh by a background
/// reloader thread that re-parses `filename` every `reload_minutes` minutes.
pub struct ReloadingTable<T: Clone + Send + Sync + 'static> {
    filename: PathBuf,
    reload_minutes: u32,
    table: Arc<RwLock<HashMap<u32, T>>>,
    task: Option<Task>,
}

impl<T: Clone + Send + Sync + 'static> ReloadingTable<T> {
    /// Loads `filename` once using `parse`, then — if `reload_minutes > 0` — spawns a
    /// background thread that reloads on that interval, preserving the previously
    /// loaded table on a parse failure (spec.md §7).
    pub fn open<F>(filename: impl Into<PathBuf>, reload_minutes: u32, parse: F) -> Result<Self>
    where
        F: Fn(&std::path::Path) -> Result<HashMap<u32, T>> + Send + Sync + 'static,
    {
        let filename = filename.into();
        let initial = parse(&filename)?;
        let table = Arc::new(RwLock::new(initial));

        let task = if reload_minutes > 0 {
            let reload_table = table.clone();
            let reload_path = filename.clone();
            let parse = Arc::new(parse);
            Some(Task::spawn("lookup-reloader", move |token| {
                let period = Duration::from_secs(60 * reload_minutes as u64);
                while !token.is_cancelled() {
                    token.sleep_cancellable(period);
                    if token.is_cancelled() {
                        break;
                    }
                    match parse(&reload_path) {
                        Ok(fresh) => {
                            *reload_table.write().unwrap() = fresh;
                            tracing::info!(subsystem = "lookup", path = %reload_path.display(), "reloaded lookup table");
                        }
                        Err(e) => {
                            tracing::warn!(subsystem = "lookup", path = %reload_path.display(), error = %e, "reload failed, keeping previous table");
                        }
                    }
                }
            }))
        } else {
            None
        };

        Ok(ReloadingTable {
            filename,
            reload_minutes,
            table,
            task,
        })
    }

    pub fn find(&self, id: u32) -> Option<T> {
        self.table.read().unwrap().get(&id).cloned()
    }

    pub fn has_entry(&self, id: u32) -> bool {
        self.table.read().unwrap().contains_key(&id)
    }

    pub fn list(&self) -> Vec<T> {
        self.table.read().unwrap().values().cloned().collect()
    }

    pub fn entries(&self) -> Vec<(u32, T)> {
        self.table
            .read()
            .unwrap()
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect()
    }

    pub fn clear(&self) {
        self.table.write().unwrap().clear();
    }

    pub fn filename(&self) -> &std::path::Path {
        &self.filename
    }

    pub fn reload_minutes(&self) -> u32 {
        self.reload_minutes
    }

    /// Stops the background reloader if one is running. A table opened with
    /// `reload_minutes == 0` never had a thread to stop.
    pub fn stop(self) {
        if let Some(task) = self.task {
            task.stop();
        }
    }
}

pub(crate) fn read_lines(path: &std::path::Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect())
}

pub(crate) fn parse_error(detail: impl Into<String>) -> Error {
    Error::ConfigInvalid(detail.into())
}
