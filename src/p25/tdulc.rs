//! P25 terminator data unit with link control (TDULC): closes out a voice call carrying
//! one final link-control-shaped opcode. Protected the same way LDU1's common LC word
//! is — RS(24,12,13) over GF(2^6) — and then, since the TDULC has no voice frame to
//! ride along with, the resulting 144-bit codeword is itself split into 12 Golay(24,12,8)
//! blocks and interleaved across the TDU slot.

use crate::bits::Hexbit;
use crate::edac::golay;
use crate::edac::reed_solomon::rs241213;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tdulc {
    pub protect: bool,
    pub lco: u8,
    pub mf_id: u8,
    pub src_id: u32,
    pub dst_id: u32,
    pub emergency: bool,
    pub encrypted: bool,
    pub group: bool,
}

impl Tdulc {
    fn to_value(&self) -> u128 {
        let svc = (self.emergency as u8) << 7 | (self.encrypted as u8) << 6 | (self.group as u8) << 5;

        (self.protect as u128) << 71
            | (self.lco as u128 & 0x3F) << 64
            | (self.mf_id as u128) << 56
            | (svc as u128) << 48
            | (self.dst_id as u128 & 0xFF_FFFF) << 24
            | (self.src_id as u128 & 0xFF_FFFF)
    }

    fn from_value(value: u128) -> Tdulc {
        let svc = (value >> 48) as u8;
        Tdulc {
            protect: value >> 71 & 1 == 1,
            lco: (value >> 64) as u8 & 0x3F,
            mf_id: (value >> 56) as u8,
            src_id: (value & 0xFF_FFFF) as u32,
            dst_id: (value >> 24 & 0xFF_FFFF) as u32,
            emergency: svc & 0x80 != 0,
            encrypted: svc & 0x40 != 0,
            group: svc & 0x20 != 0,
        }
    }

    fn to_hexbits(&self) -> [Hexbit; 24] {
        let value = self.to_value();
        let mut buf = [Hexbit::new(0); 24];
        for (i, slot) in buf.iter_mut().take(12).enumerate() {
            *slot = Hexbit::new((value >> (6 * (11 - i)) & 0x3F) as u8);
        }
        buf
    }

    fn from_hexbits(data: &[Hexbit]) -> Tdulc {
        let mut value = 0u128;
        for slot in data.iter().take(12) {
            value = value << 6 | slot.bits() as u128;
        }
        Tdulc::from_value(value)
    }

    /// Encode to the 12 Golay(24,12,8) blocks transmitted across the TDU slot: the
    /// 72-bit value is first RS(24,12,13)-protected into a 144-bit codeword, then that
    /// codeword is interleaved 12 bits at a time.
    pub fn encode(&self) -> [u32; 12] {
        let mut buf = self.to_hexbits();
        rs241213::encode(&mut buf);
        golay_interleave(&buf)
    }

    /// Decode 12 received Golay(24,12,8) blocks, correcting up to 3 bit errors per
    /// block plus up to 6 hexbit errors in the underlying RS(24,12,13) codeword.
    pub fn decode(blocks: &[u32; 12]) -> Option<(Tdulc, usize)> {
        let mut buf = golay_deinterleave(blocks)?;
        let (data, err) = rs241213::decode(&mut buf)?;
        Some((Tdulc::from_hexbits(data), err))
    }
}

fn hexbits_to_bits(buf: &[Hexbit; 24]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(144);
    for h in buf {
        for i in (0..6).rev() {
            bits.push(h.bits() >> i & 1 == 1);
        }
    }
    bits
}

fn bits_to_word(bits: &[bool]) -> u16 {
    bits.iter().fold(0u16, |acc, &b| acc << 1 | b as u16)
}

/// Split a 144-bit RS(24,12,13) codeword into 12 Golay(24,12,8)-protected blocks.
fn golay_interleave(buf: &[Hexbit; 24]) -> [u32; 12] {
    let bits = hexbits_to_bits(buf);
    let mut blocks = [0u32; 12];
    for (block, chunk) in blocks.iter_mut().zip(bits.chunks(12)) {
        *block = golay::encode_extended(bits_to_word(chunk));
    }
    blocks
}

/// Recover the 144-bit RS(24,12,13) codeword from 12 received Golay(24,12,8) blocks.
fn golay_deinterleave(blocks: &[u32; 12]) -> Option<[Hexbit; 24]> {
    let mut bits = Vec::with_capacity(144);
    for &word in blocks {
        let (data, _) = golay::decode_extended(word)?;
        for i in (0..12).rev() {
            bits.push(data >> i & 1 == 1);
        }
    }

    let mut buf = [Hexbit::new(0); 24];
    for (slot, chunk) in buf.iter_mut().zip(bits.chunks(6)) {
        *slot = Hexbit::new(chunk.iter().fold(0u8, |acc, &b| acc << 1 | b as u8));
    }
    Some(buf)
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> Tdulc {
        Tdulc {
            protect: false,
            lco: 0b111100,
            mf_id: 0,
            src_id: 0x001111,
            dst_id: 0x002222,
            emergency: false,
            encrypted: false,
            group: true,
        }
    }

    #[test]
    fn test_roundtrip() {
        let tdulc = sample();
        let encoded = tdulc.encode();
        let (decoded, err) = Tdulc::decode(&encoded).unwrap();
        assert_eq!(err, 0);
        assert_eq!(decoded, tdulc);
    }

    #[test]
    fn test_corrects_single_bit_error_in_golay_block() {
        let tdulc = sample();
        let mut encoded = tdulc.encode();
        // Within a single Golay(24,12,8) block's correction radius (up to 3 bits), so
        // the interleave layer absorbs it before RS ever sees a hexbit error.
        encoded[3] ^= 1;
        let (decoded, err) = Tdulc::decode(&encoded).unwrap();
        assert_eq!(err, 0);
        assert_eq!(decoded, tdulc);
    }
}
