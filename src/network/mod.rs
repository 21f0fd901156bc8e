//! FNE peer-network transport (spec.md §4.6): RTP + vendor extension header framing,
//! the peer login/heartbeat state machine, and UDP/TCP(+TLS) socket plumbing.

pub mod peer;
pub mod rtp;
pub mod transport;

pub use peer::{Peer, PeerState};
pub use rtp::{Frame, FneExtensionHeader, RtpHeader, DVM_FRAME_START, RTP_END_OF_CALL_SEQ};
pub use transport::{TcpTransport, UdpTransport};
