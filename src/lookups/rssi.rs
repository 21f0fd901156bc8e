//! RSSI raw-ADC-to-dBm interpolator: `rssi.dat`, pairs `raw_adc dBm` sorted by raw
//! (spec.md §6), grounded on the source `RSSIInterpolator`.
//!
//! Unlike the other lookups this is a plain one-shot load, not a background-reloaded
//! `ReloadingTable` — the source class has no `Thread`/reload machinery either.

use std::collections::BTreeMap;

use crate::error::Result;
use super::parse_error;

pub struct RssiLookup {
    map: BTreeMap<u16, i32>,
}

impl RssiLookup {
    /// Loads `raw_adc dBm` pairs from `filename`.
    pub fn load(filename: impl AsRef<std::path::Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(filename.as_ref())?;
        let mut map = BTreeMap::new();

        for line in contents.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with('#')) {
            let mut fields = line.split_whitespace();
            let raw: u16 = fields
                .next()
                .and_then(|f| f.parse().ok())
                .ok_or_else(|| parse_error(format!("bad raw ADC value in rssi.dat: {line}")))?;
            let dbm: i32 = fields
                .next()
                .and_then(|f| f.parse().ok())
                .ok_or_else(|| parse_error(format!("bad dBm value in rssi.dat: {line}")))?;

            map.insert(raw, dbm);
        }

        Ok(RssiLookup { map })
    }

    /// Linearly interpolates the dBm value for `raw`, extrapolating flatly beyond the
    /// table's bounds.
    pub fn interpolate(&self, raw: u16) -> i32 {
        if self.map.is_empty() {
            return 0;
        }

        if let Some(&dbm) = self.map.get(&raw) {
            return dbm;
        }

        let mut below = None;
        let mut above = None;
        for (&k, &v) in self.map.iter() {
            if k < raw {
                below = Some((k, v));
            } else if k > raw && above.is_none() {
                above = Some((k, v));
            }
        }

        match (below, above) {
            (Some((k0, v0)), Some((k1, v1))) => {
                let t = (raw as f64 - k0 as f64) / (k1 as f64 - k0 as f64);
                v0 + ((v1 - v0) as f64 * t).round() as i32
            }
            (Some((_, v0)), None) => v0,
            (None, Some((_, v1))) => v1,
            (None, None) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_known_points() {
        let dir = std::env::temp_dir();
        let path = dir.join("rssi_test.dat");
        std::fs::write(&path, "0 -140\n1000 -40\n").unwrap();

        let lookup = RssiLookup::load(&path).unwrap();
        assert_eq!(lookup.interpolate(0), -140);
        assert_eq!(lookup.interpolate(1000), -40);
        assert_eq!(lookup.interpolate(500), -90);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn extrapolates_flatly_beyond_bounds() {
        let dir = std::env::temp_dir();
        let path = dir.join("rssi_test2.dat");
        std::fs::write(&path, "10 -100\n20 -50\n").unwrap();

        let lookup = RssiLookup::load(&path).unwrap();
        assert_eq!(lookup.interpolate(0), -100);
        assert_eq!(lookup.interpolate(100), -50);

        std::fs::remove_file(&path).ok();
    }
}
