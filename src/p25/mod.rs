//! P25 (TIA-102) protocol stack: NID framing, control-channel TSBK/AMBT opcodes, PDU
//! data transport, and the HDU/LDU1/LDU2/TDULC link-control family.

pub mod ambt;
pub mod data_block;
pub mod data_header;
pub mod lc;
pub mod nid;
pub mod site_data;
pub mod tdulc;
pub mod tsbk;

pub use ambt::{from_value as ambt_from_value, to_value as ambt_to_value};
pub use data_block::DataBlock;
pub use data_header::DataHeader;
pub use lc::Lc;
pub use nid::{Duid, Nid};
pub use site_data::SiteData;
pub use tdulc::Tdulc;
pub use tsbk::{Tsbk, TsbkHeader};
