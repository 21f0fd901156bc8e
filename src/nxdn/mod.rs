//! NXDN (ARIB STD-T98) control-plane codecs: site identity, logical channel framing
//! (CAC/FACCH1/SACCH/UDCH), and Radio Control Channel (RCCH) messages.

pub mod channel;
pub mod rcch;
pub mod site_data;

pub use channel::{Cac, ChStructure, Facch1, Sacch, Udch};
pub use rcch::{Rcch, RcchHeader};
pub use site_data::SiteData;
