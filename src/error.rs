//! Crate-wide error type. Every public configuration/affiliation/lookup/network
//! function returns `Result<T, Error>`; per spec.md §7 per-frame codec errors stay as
//! `Option`/`bool` in the `edac`/`dmr`/`p25`/`nxdn` layers and never propagate above the
//! codec as a panic or exception.

use thiserror::Error;

/// Errors surfaced by the affiliation, lookup, network, and configuration layers.
#[derive(Error, Debug)]
pub enum Error {
    /// A frame's length or sync pattern was invalid.
    #[error("malformed frame in {subsystem}: {detail}")]
    MalformedFrame {
        subsystem: &'static str,
        detail: String,
    },

    /// A forward-error-correction decoder could not correct the received word.
    #[error("FEC decoder for {code} could not correct received word")]
    FecUncorrectable { code: &'static str },

    /// A CRC check failed on a decoded frame.
    #[error("CRC mismatch in {subsystem}")]
    CrcMismatch { subsystem: &'static str },

    /// A ring buffer overflowed or underflowed; the buffer has already been cleared.
    #[error("ring buffer {operation} in {subsystem}")]
    OverflowUnderflow {
        subsystem: &'static str,
        operation: &'static str,
    },

    /// Configuration failed validation at startup. Fatal.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// A transient network condition (EAGAIN, timeout); caller should retry with
    /// backoff.
    #[error("transient network error on {peer}: {detail}")]
    NetworkTransient { peer: String, detail: String },

    /// A peer connection failed unrecoverably; the peer state machine returns to
    /// `Disconnected` and reconnection attempts continue on the owning transport.
    #[error("fatal network error on {peer}: {detail}")]
    NetworkFatal { peer: String, detail: String },

    /// A peer's login challenge/response failed verification.
    #[error("authentication failed for peer {peer_id}")]
    AuthFailure { peer_id: u32 },

    /// Underlying I/O failure (serial port, socket).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Standard result alias used by the affiliation/network/lookup/config layers.
pub type Result<T> = std::result::Result<T, Error>;
