//! Forward error correction and checksum primitives shared by the DMR, P25, and NXDN
//! codecs: Galois field arithmetic, BCH/Golay/Hamming/QR/Reed-Solomon block codes, rate
//! 1/2 and 3/4 trellis coding, a rate-1/2 convolutional code, CRC-8/9/12/16/32, SHA-256,
//! and the handful of LFSR scramblers the air interfaces use to whiten their sync/status
//! bits.

#[macro_use]
pub mod galois;

pub mod bch;
pub mod bmcf;
pub mod bptc19696;
pub mod conv;
pub mod crc;
pub mod golay;
pub mod hamming;
pub mod qr1676;
pub mod reed_solomon;
pub mod rs129;
pub mod scramble;
pub mod sha256;
pub mod trellis;
