//! DMR (ETSI TS 102 361) control-plane codecs: site identity, control signalling blocks,
//! link control (whole and embedded), and PDU data headers/blocks.

pub mod csbk;
pub mod data_block;
pub mod data_header;
pub mod embedded_lc;
pub mod short_lc;
pub mod site_data;

pub use csbk::{Csbk, CsbkHeader};
pub use data_block::DataBlock;
pub use data_header::{DataFormat, DataHeader};
pub use embedded_lc::{Flco, Lc};
pub use site_data::{SiteData, SiteModel};
