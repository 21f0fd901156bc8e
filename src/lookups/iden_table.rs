//! Bandplan identity table: `iden_table.dat`, CSV
//! `channel_id,base_freq_hz,ch_space_khz,tx_offset_mhz,ch_bw_khz` (spec.md §3, §6),
//! grounded on the source `IdenTableLookup`/`IdenTable` pair.

use std::collections::HashMap;
use std::path::Path;

use super::{parse_error, read_lines, ReloadingTable};
use crate::error::Result;

/// A single bandplan identity entry, translating `(channel_id, channel_no)` to an RF
/// frequency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IdenEntry {
    pub channel_id: u8,
    pub base_frequency_hz: u32,
    pub ch_space_khz: f32,
    pub tx_offset_mhz: f32,
    pub ch_bandwidth_khz: f32,
}

impl IdenEntry {
    /// RF frequency in Hz for the given channel number on this identity entry's plan.
    pub fn rx_frequency_hz(&self, channel_no: u32) -> u32 {
        self.base_frequency_hz + (channel_no.saturating_sub(1)) * (self.ch_space_khz * 1000.0) as u32
    }

    /// TX frequency, applying the (possibly negative) repeater offset.
    pub fn tx_frequency_hz(&self, channel_no: u32) -> i64 {
        self.rx_frequency_hz(channel_no) as i64 + (self.tx_offset_mhz * 1_000_000.0) as i64
    }
}

/// Reloadable bandplan identity table, keyed by `channel_id`.
pub struct IdenTableLookup {
    inner: ReloadingTable<IdenEntry>,
}

impl IdenTableLookup {
    pub fn open(filename: impl Into<std::path::PathBuf>, reload_minutes: u32) -> Result<Self> {
        Ok(IdenTableLookup {
            inner: ReloadingTable::open(filename, reload_minutes, load)?,
        })
    }

    pub fn find(&self, channel_id: u8) -> Option<IdenEntry> {
        self.inner.find(channel_id as u32)
    }

    pub fn list(&self) -> Vec<IdenEntry> {
        self.inner.list()
    }

    pub fn stop(self) {
        self.inner.stop();
    }
}

fn load(path: &Path) -> Result<HashMap<u32, IdenEntry>> {
    let mut table = HashMap::new();

    for line in read_lines(path)? {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 5 {
            return Err(parse_error(format!("malformed iden_table.dat line: {line}")));
        }

        let channel_id: u8 = fields[0]
            .trim()
            .parse()
            .map_err(|_| parse_error(format!("bad channel id: {}", fields[0])))?;
        let base_frequency_hz: u32 = fields[1]
            .trim()
            .parse()
            .map_err(|_| parse_error(format!("bad base frequency: {}", fields[1])))?;
        let ch_space_khz: f32 = fields[2]
            .trim()
            .parse()
            .map_err(|_| parse_error(format!("bad channel spacing: {}", fields[2])))?;
        let tx_offset_mhz: f32 = fields[3]
            .trim()
            .parse()
            .map_err(|_| parse_error(format!("bad tx offset: {}", fields[3])))?;
        let ch_bandwidth_khz: f32 = fields[4]
            .trim()
            .parse()
            .map_err(|_| parse_error(format!("bad channel bandwidth: {}", fields[4])))?;

        table.insert(
            channel_id as u32,
            IdenEntry {
                channel_id,
                base_frequency_hz,
                ch_space_khz,
                tx_offset_mhz,
                ch_bandwidth_khz,
            },
        );
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_channel_number_to_frequency() {
        let dir = std::env::temp_dir();
        let path = dir.join("iden_table_test.dat");
        std::fs::write(&path, "1,851006250,12.5,-45.0,12.5\n").unwrap();

        let lookup = IdenTableLookup::open(&path, 0).unwrap();
        let entry = lookup.find(1).unwrap();
        assert_eq!(entry.rx_frequency_hz(1), 851_006_250);
        assert_eq!(entry.rx_frequency_hz(2), 851_018_750);
        assert_eq!(entry.tx_frequency_hz(1), 851_006_250 - 45_000_000);

        std::fs::remove_file(&path).ok();
    }
}
