//! NXDN logical channels: Common Access (CAC), Fast Associated Control Channel 1
//! (FACCH1), Slow Associated Control Channel (SACCH), and User Data Channel (UDCH)
//! (spec.md §4.4), grounded on
//! `src/common/nxdn/channel/{CAC,FACCH1,SACCH,UDCH}.h`.
//!
//! Each channel wraps a fixed-size raw byte buffer and exposes `decode`/`encode`
//! pairs operating on the deinterleaved message bytes, with `decode` validating the
//! trailing CRC-12 the standard appends to every one of these logical channels. The
//! over-the-air form additionally wraps that message in `edac::conv`'s rate-1/2
//! convolutional code; `decode_fec`/`encode_fec` apply that layer, grounded on
//! `src/common/nxdn/edac/Convolution.h`'s `encode`/`decode` pair.

use crate::edac::conv;
use crate::edac::crc::CRC12;
use crate::error::{Error, Result};

fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    let mut out = Vec::with_capacity(bytes.len() * 8);
    for &b in bytes {
        for i in (0..8).rev() {
            out.push(b >> i & 1 == 1);
        }
    }
    out
}

fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8).map(|c| c.iter().fold(0u8, |acc, &b| acc << 1 | b as u8)).collect()
}

/// Channel structure field shared by CAC/SACCH (single/double/idle burst framing).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChStructure {
    SrRcch,
    SrCch,
    UdCh,
    FrCch,
}

impl ChStructure {
    fn from_bits(bits: u8) -> ChStructure {
        match bits & 0b11 {
            0b00 => ChStructure::SrRcch,
            0b01 => ChStructure::SrCch,
            0b10 => ChStructure::UdCh,
            _ => ChStructure::FrCch,
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            ChStructure::SrRcch => 0b00,
            ChStructure::SrCch => 0b01,
            ChStructure::UdCh => 0b10,
            ChStructure::FrCch => 0b11,
        }
    }
}

/// Common Access Channel (10 bytes: RAN/structure header + 8 bytes of payload + CRC-12
/// trailer over the header and payload).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cac {
    pub ran: u8,
    pub structure: ChStructure,
    pub long_inbound: bool,
    pub idle_busy: bool,
    pub tx_continuous: bool,
    pub receive: bool,
    pub data: [u8; 8],
}

pub const CAC_LENGTH_BYTES: usize = 10;

impl Cac {
    pub fn decode(raw: &[u8; CAC_LENGTH_BYTES], long_inbound: bool) -> Result<Cac> {
        let header = raw[0];
        let cac = Cac {
            ran: header >> 3,
            structure: ChStructure::from_bits(header >> 1),
            long_inbound,
            idle_busy: header & 0x01 != 0,
            tx_continuous: raw[1] & 0x02 != 0,
            receive: raw[1] & 0x01 != 0,
            data: raw[2..10].try_into().unwrap(),
        };

        check_crc12(&raw[..8], raw[8], raw[9])?;
        Ok(cac)
    }

    pub fn encode(&self) -> [u8; CAC_LENGTH_BYTES] {
        let mut out = [0u8; CAC_LENGTH_BYTES];
        out[0] = (self.ran << 3) | (self.structure.to_bits() << 1) | (self.idle_busy as u8);
        out[1] = ((self.tx_continuous as u8) << 1) | (self.receive as u8);
        out[2..10].copy_from_slice(&self.data);

        let (hi, lo) = compute_crc12(&out[..8]);
        out[8] = hi;
        out[9] = lo;
        out
    }

    /// Decode a convolutionally-coded air frame, applying the Viterbi/chainback stage
    /// ahead of the CRC-12 check.
    pub fn decode_fec(coded: &[bool], long_inbound: bool) -> Result<Cac> {
        let bits = conv::decode(coded, CAC_LENGTH_BYTES * 8)
            .ok_or(Error::CrcMismatch { subsystem: "nxdn_channel" })?;
        let raw: [u8; CAC_LENGTH_BYTES] = bits_to_bytes(&bits).try_into().unwrap();
        Cac::decode(&raw, long_inbound)
    }

    /// Encode through the rate-1/2 convolutional code, ready for on-air transmission.
    pub fn encode_fec(&self) -> Vec<bool> {
        conv::encode(&bytes_to_bits(&self.encode()))
    }
}

/// Fast Associated Control Channel 1 (9 bytes: 7 bytes of message + CRC-12 trailer).
pub const FACCH1_LENGTH_BYTES: usize = 9;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Facch1 {
    pub data: [u8; 7],
}

impl Facch1 {
    pub fn decode(raw: &[u8; FACCH1_LENGTH_BYTES]) -> Result<Facch1> {
        check_crc12(&raw[..7], raw[7], raw[8])?;
        Ok(Facch1 {
            data: raw[..7].try_into().unwrap(),
        })
    }

    pub fn encode(&self) -> [u8; FACCH1_LENGTH_BYTES] {
        let mut out = [0u8; FACCH1_LENGTH_BYTES];
        out[..7].copy_from_slice(&self.data);
        let (hi, lo) = compute_crc12(&out[..7]);
        out[7] = hi;
        out[8] = lo;
        out
    }

    pub fn decode_fec(coded: &[bool]) -> Result<Facch1> {
        let bits = conv::decode(coded, FACCH1_LENGTH_BYTES * 8)
            .ok_or(Error::CrcMismatch { subsystem: "nxdn_channel" })?;
        let raw: [u8; FACCH1_LENGTH_BYTES] = bits_to_bytes(&bits).try_into().unwrap();
        Facch1::decode(&raw)
    }

    pub fn encode_fec(&self) -> Vec<bool> {
        conv::encode(&bytes_to_bits(&self.encode()))
    }
}

/// Slow Associated Control Channel (4 bytes: RAN/structure byte + 1 byte message +
/// CRC-12 trailer).
pub const SACCH_LENGTH_BYTES: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sacch {
    pub ran: u8,
    pub structure: u8,
    pub data: u8,
}

impl Sacch {
    pub fn decode(raw: &[u8; SACCH_LENGTH_BYTES]) -> Result<Sacch> {
        check_crc12(&raw[..2], raw[2], raw[3])?;
        Ok(Sacch {
            ran: raw[0] >> 2,
            structure: raw[0] & 0x03,
            data: raw[1],
        })
    }

    pub fn encode(&self) -> [u8; SACCH_LENGTH_BYTES] {
        let mut out = [0u8; SACCH_LENGTH_BYTES];
        out[0] = (self.ran << 2) | (self.structure & 0x03);
        out[1] = self.data;
        let (hi, lo) = compute_crc12(&out[..2]);
        out[2] = hi;
        out[3] = lo;
        out
    }

    pub fn decode_fec(coded: &[bool]) -> Result<Sacch> {
        let bits = conv::decode(coded, SACCH_LENGTH_BYTES * 8)
            .ok_or(Error::CrcMismatch { subsystem: "nxdn_channel" })?;
        let raw: [u8; SACCH_LENGTH_BYTES] = bits_to_bytes(&bits).try_into().unwrap();
        Sacch::decode(&raw)
    }

    pub fn encode_fec(&self) -> Vec<bool> {
        conv::encode(&bytes_to_bits(&self.encode()))
    }
}

/// User Data Channel (18 bytes: RAN byte + 15 bytes of payload + CRC-12 trailer).
pub const UDCH_LENGTH_BYTES: usize = 18;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Udch {
    pub ran: u8,
    pub data: [u8; 15],
}

impl Udch {
    pub fn decode(raw: &[u8; UDCH_LENGTH_BYTES]) -> Result<Udch> {
        check_crc12(&raw[..16], raw[16], raw[17])?;
        Ok(Udch {
            ran: raw[0],
            data: raw[1..16].try_into().unwrap(),
        })
    }

    pub fn encode(&self) -> [u8; UDCH_LENGTH_BYTES] {
        let mut out = [0u8; UDCH_LENGTH_BYTES];
        out[0] = self.ran;
        out[1..16].copy_from_slice(&self.data);
        let (hi, lo) = compute_crc12(&out[..16]);
        out[16] = hi;
        out[17] = lo;
        out
    }

    pub fn decode_fec(coded: &[bool]) -> Result<Udch> {
        let bits = conv::decode(coded, UDCH_LENGTH_BYTES * 8)
            .ok_or(Error::CrcMismatch { subsystem: "nxdn_channel" })?;
        let raw: [u8; UDCH_LENGTH_BYTES] = bits_to_bytes(&bits).try_into().unwrap();
        Udch::decode(&raw)
    }

    pub fn encode_fec(&self) -> Vec<bool> {
        conv::encode(&bytes_to_bits(&self.encode()))
    }
}

fn compute_crc12(data: &[u8]) -> (u8, u8) {
    let crc = CRC12::new().feed_bytes(data.iter().cloned()).finish() as u16;
    (((crc >> 8) & 0x0F) as u8, (crc & 0xFF) as u8)
}

fn check_crc12(data: &[u8], hi: u8, lo: u8) -> Result<()> {
    let (want_hi, want_lo) = compute_crc12(data);
    if want_hi == hi && want_lo == lo {
        Ok(())
    } else {
        Err(Error::CrcMismatch { subsystem: "nxdn_channel" })
    }
}
