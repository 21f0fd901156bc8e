//! P25 link control (LC): the call-control word common to the header data unit (HDU),
//! LDU1, and LDU2 voice frames. LDU1 carries the 72-bit common LC value RS(24,12,13)
//! protects; HDU and LDU2 instead carry the message indicator alongside the encryption
//! algorithm/key IDs (and, for HDU, the destination ID), sized to the wider RS(36,20,17)
//! and RS(24,16,9) codes respectively. The HDU's message indicator is additionally
//! carried per-voice-frame via shortened Golay(18,6,8).

use crate::bits::Hexbit;
use crate::edac::golay;
use crate::edac::reed_solomon::{rs24169, rs241213, rs362017};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lc {
    pub protect: bool,
    pub lco: u8,
    pub mf_id: u8,
    pub src_id: u32,
    pub dst_id: u32,
    pub grp_vch_no: u16,
    pub emergency: bool,
    pub encrypted: bool,
    pub priority: u8,
    pub group: bool,
    pub alg_id: u8,
    pub k_id: u16,
}

impl Lc {
    /// Pack into the 72-bit value RS(24,12,13) protects.
    pub fn to_rs_value(&self) -> u128 {
        let svc = (self.emergency as u8) << 7
            | (self.encrypted as u8) << 6
            | (self.priority & 0x7) << 3
            | (self.group as u8) << 2;

        (self.protect as u128) << 71
            | (self.lco as u128 & 0x3F) << 64
            | (self.mf_id as u128) << 56
            | (svc as u128) << 48
            | (self.dst_id as u128 & 0xFF_FFFF) << 24
            | (self.src_id as u128 & 0xFF_FFFF)
    }

    pub fn from_rs_value(value: u128) -> Lc {
        let svc = (value >> 48) as u8;
        Lc {
            protect: value >> 71 & 1 == 1,
            lco: (value >> 64) as u8 & 0x3F,
            mf_id: (value >> 56) as u8,
            src_id: (value & 0xFF_FFFF) as u32,
            dst_id: (value >> 24 & 0xFF_FFFF) as u32,
            grp_vch_no: 0,
            emergency: svc & 0x80 != 0,
            encrypted: svc & 0x40 != 0,
            priority: svc >> 3 & 0x7,
            group: svc & 0x04 != 0,
            alg_id: 0,
            k_id: 0,
        }
    }

    fn to_hexbits(&self) -> [Hexbit; 24] {
        let value = self.to_rs_value();
        let mut buf = [Hexbit::new(0); 24];
        for (i, slot) in buf.iter_mut().take(12).enumerate() {
            *slot = Hexbit::new((value >> (6 * (11 - i)) & 0x3F) as u8);
        }
        buf
    }

    fn from_hexbits(buf: &[Hexbit; 24]) -> Lc {
        let mut value = 0u128;
        for slot in buf.iter().take(12) {
            value = value << 6 | slot.bits() as u128;
        }
        Lc::from_rs_value(value)
    }

    /// Encode the common LC value to a 24-hexbit (144-bit) RS(24,12,13) codeword, as
    /// carried in LDU1.
    pub fn encode_ldu1(&self) -> [Hexbit; 24] {
        let mut buf = self.to_hexbits();
        rs241213::encode(&mut buf);
        buf
    }

    /// Decode a received LDU1 RS(24,12,13) codeword, correcting up to 6 hexbit errors.
    pub fn decode_ldu1(buf: &mut [Hexbit; 24]) -> Option<(Lc, usize)> {
        let (data, err) = rs241213::decode(buf)?;
        let mut fixed = [Hexbit::new(0); 24];
        fixed[..12].copy_from_slice(data);
        Some((Lc::from_hexbits(&fixed), err))
    }

    /// Pack the message indicator alongside the encryption algorithm/key IDs and
    /// destination ID into the 120-bit value RS(36,20,17) protects for the HDU.
    fn to_hdu_value(&self, mi: &[u8; 9]) -> u128 {
        let mi_val = mi.iter().fold(0u128, |acc, &b| acc << 8 | b as u128);
        mi_val << 48
            | (self.alg_id as u128) << 40
            | (self.k_id as u128) << 24
            | (self.dst_id as u128 & 0xFF_FFFF)
    }

    fn from_hdu_value(value: u128) -> ([u8; 9], u8, u16, u32) {
        let mi_val = value >> 48;
        let mut mi = [0u8; 9];
        for (i, byte) in mi.iter_mut().enumerate() {
            *byte = (mi_val >> (64 - 8 * i)) as u8;
        }

        let alg_id = (value >> 40) as u8;
        let k_id = (value >> 24) as u16;
        let dst_id = (value & 0xFF_FFFF) as u32;

        (mi, alg_id, k_id, dst_id)
    }

    fn hdu_to_hexbits(&self, mi: &[u8; 9]) -> [Hexbit; 36] {
        let value = self.to_hdu_value(mi);
        let mut buf = [Hexbit::new(0); 36];
        for (i, slot) in buf.iter_mut().take(20).enumerate() {
            *slot = Hexbit::new((value >> (6 * (19 - i)) & 0x3F) as u8);
        }
        buf
    }

    fn hdu_from_hexbits(data: &[Hexbit]) -> ([u8; 9], u8, u16, u32) {
        let mut value = 0u128;
        for slot in data.iter().take(20) {
            value = value << 6 | slot.bits() as u128;
        }
        Lc::from_hdu_value(value)
    }

    /// Encode the HDU's message indicator, algorithm ID, key ID, and destination ID to
    /// a 36-hexbit (216-bit) RS(36,20,17) codeword.
    pub fn encode_hdu(&self, mi: &[u8; 9]) -> [Hexbit; 36] {
        let mut buf = self.hdu_to_hexbits(mi);
        rs362017::encode(&mut buf);
        buf
    }

    /// Decode a received HDU RS(36,20,17) codeword, correcting up to 8 hexbit errors.
    /// Returns `(mi, alg_id, k_id, dst_id, err)`.
    pub fn decode_hdu(buf: &mut [Hexbit; 36]) -> Option<([u8; 9], u8, u16, u32, usize)> {
        let (data, err) = rs362017::decode(buf)?;
        let (mi, alg_id, k_id, dst_id) = Lc::hdu_from_hexbits(data);
        Some((mi, alg_id, k_id, dst_id, err))
    }

    /// Pack the message indicator alongside the encryption algorithm/key IDs into the
    /// 96-bit value RS(24,16,9) protects for LDU2.
    fn to_ldu2_value(&self, mi: &[u8; 9]) -> u128 {
        let mi_val = mi.iter().fold(0u128, |acc, &b| acc << 8 | b as u128);
        mi_val << 24 | (self.alg_id as u128) << 16 | (self.k_id as u128)
    }

    fn from_ldu2_value(value: u128) -> ([u8; 9], u8, u16) {
        let mi_val = value >> 24;
        let mut mi = [0u8; 9];
        for (i, byte) in mi.iter_mut().enumerate() {
            *byte = (mi_val >> (64 - 8 * i)) as u8;
        }

        let alg_id = (value >> 16) as u8;
        let k_id = value as u16;

        (mi, alg_id, k_id)
    }

    fn ldu2_to_hexbits(&self, mi: &[u8; 9]) -> [Hexbit; 24] {
        let value = self.to_ldu2_value(mi);
        let mut buf = [Hexbit::new(0); 24];
        for (i, slot) in buf.iter_mut().take(16).enumerate() {
            *slot = Hexbit::new((value >> (6 * (15 - i)) & 0x3F) as u8);
        }
        buf
    }

    fn ldu2_from_hexbits(data: &[Hexbit]) -> ([u8; 9], u8, u16) {
        let mut value = 0u128;
        for slot in data.iter().take(16) {
            value = value << 6 | slot.bits() as u128;
        }
        Lc::from_ldu2_value(value)
    }

    /// Encode LDU2's message indicator, algorithm ID, and key ID to a 24-hexbit
    /// (144-bit) RS(24,16,9) codeword.
    pub fn encode_ldu2(&self, mi: &[u8; 9]) -> [Hexbit; 24] {
        let mut buf = self.ldu2_to_hexbits(mi);
        rs24169::encode(&mut buf);
        buf
    }

    /// Decode a received LDU2 RS(24,16,9) codeword, correcting up to 4 hexbit errors.
    /// Returns `(mi, alg_id, k_id, err)`.
    pub fn decode_ldu2(buf: &mut [Hexbit; 24]) -> Option<([u8; 9], u8, u16, usize)> {
        let (data, err) = rs24169::decode(buf)?;
        let (mi, alg_id, k_id) = Lc::ldu2_from_hexbits(data);
        Some((mi, alg_id, k_id, err))
    }

    /// Encrypt message indicator (9 bytes), protected by 8 parallel shortened
    /// Golay(18,6,8) codewords across the HDU's voice frame, one per 3-bit MI nibble.
    pub fn encode_hdu_mi(mi: &[u8; 9]) -> [u32; 24] {
        let mut out = [0u32; 24];
        let mut bit = 0usize;
        let total_bits = 72;
        for slot in out.iter_mut() {
            let mut data = 0u8;
            for i in 0..6 {
                let b = bit + i;
                let v = if b < total_bits { mi[b / 8] >> (7 - b % 8) & 1 } else { 0 };
                data = data << 1 | v;
            }
            *slot = golay::shortened::encode(data);
            bit += 6;
        }
        out
    }

    pub fn decode_hdu_mi(codewords: &[u32; 24]) -> Option<[u8; 9]> {
        let mut bits = [false; 144];
        let mut pos = 0;
        for word in codewords {
            let (data, _) = golay::shortened::decode(*word)?;
            for i in (0..6).rev() {
                bits[pos] = data >> i & 1 == 1;
                pos += 1;
            }
        }

        let mut mi = [0u8; 9];
        for (i, byte) in mi.iter_mut().enumerate() {
            let mut v = 0u8;
            for b in 0..8 {
                v = v << 1 | bits[i * 8 + b] as u8;
            }
            *byte = v;
        }
        Some(mi)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> Lc {
        Lc {
            protect: false,
            lco: 0b000000,
            mf_id: 0,
            src_id: 0x001234,
            dst_id: 0x005678,
            grp_vch_no: 0,
            emergency: false,
            encrypted: true,
            priority: 3,
            group: true,
            alg_id: 0,
            k_id: 0,
        }
    }

    #[test]
    fn test_rs_value_roundtrip() {
        let lc = sample();
        let roundtripped = Lc::from_rs_value(lc.to_rs_value());
        assert_eq!(roundtripped.src_id, lc.src_id);
        assert_eq!(roundtripped.dst_id, lc.dst_id);
        assert_eq!(roundtripped.encrypted, lc.encrypted);
        assert_eq!(roundtripped.group, lc.group);
    }

    #[test]
    fn test_ldu1_encode_decode_roundtrip() {
        let lc = sample();
        let mut encoded = lc.encode_ldu1();
        let (decoded, err) = Lc::decode_ldu1(&mut encoded).unwrap();
        assert_eq!(err, 0);
        assert_eq!(decoded.src_id, lc.src_id);
        assert_eq!(decoded.dst_id, lc.dst_id);
    }

    #[test]
    fn test_hdu_mi_roundtrip() {
        let mi = [1u8, 2, 3, 4, 5, 6, 7, 8, 9];
        let encoded = Lc::encode_hdu_mi(&mi);
        let decoded = Lc::decode_hdu_mi(&encoded).unwrap();
        assert_eq!(decoded, mi);
    }

    #[test]
    fn test_hdu_encode_decode_roundtrip() {
        let mut lc = sample();
        lc.alg_id = 0xAA;
        lc.k_id = 0x1234;
        let mi = [9u8, 8, 7, 6, 5, 4, 3, 2, 1];

        let mut encoded = lc.encode_hdu(&mi);
        let (dec_mi, alg_id, k_id, dst_id, err) = Lc::decode_hdu(&mut encoded).unwrap();
        assert_eq!(err, 0);
        assert_eq!(dec_mi, mi);
        assert_eq!(alg_id, lc.alg_id);
        assert_eq!(k_id, lc.k_id);
        assert_eq!(dst_id, lc.dst_id);
    }

    #[test]
    fn test_ldu2_encode_decode_roundtrip() {
        let mut lc = sample();
        lc.alg_id = 0x55;
        lc.k_id = 0x4321;
        let mi = [1u8, 1, 2, 3, 5, 8, 13, 21, 34];

        let mut encoded = lc.encode_ldu2(&mi);
        let (dec_mi, alg_id, k_id, err) = Lc::decode_ldu2(&mut encoded).unwrap();
        assert_eq!(err, 0);
        assert_eq!(dec_mi, mi);
        assert_eq!(alg_id, lc.alg_id);
        assert_eq!(k_id, lc.k_id);
    }
}
