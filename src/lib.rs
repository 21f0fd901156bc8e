//! Protocol core for a digital land-mobile-radio host: FEC primitives and frame/link
//! control codecs for DMR, P25, and NXDN, an affiliation and channel-grant engine, FNE
//! peer transport framing, and the reloadable lookup tables and concurrency primitives
//! they all share. See `DESIGN.md` for what in this crate is adapted from which
//! teacher/example source.

pub mod affiliation;
pub mod bits;
pub mod config;
pub mod dmr;
pub mod edac;
pub mod error;
pub mod lookups;
pub mod modem;
pub mod network;
pub mod nxdn;
pub mod p25;
pub mod util;

pub use error::{Error, Result};
