//! P25 Alternate Multi-Block Trunking (AMBT): a TSBK-shaped opcode carried over a PDU
//! data header plus one or more data blocks instead of a single control-channel block.
//! `original_source`'s `AMBT` is a `TSBK` subclass whose `toValue` helper folds a
//! `DataHeader` and the reassembled PDU user data into the same 64-bit value `Tsbk`
//! packs from its own header/payload; here that's a pair of free functions instead of an
//! inheritance relationship.

use crate::p25::data_header::DataHeader;
use crate::p25::tsbk::{Tsbk, TsbkHeader};

/// Fold a PDU data header and its reassembled user data into the 64-bit TSBK-shaped
/// value an AMBT opcode is decoded from, mirroring `Tsbk::to_bytes`'s payload packing.
pub fn to_value(header: &DataHeader, pdu_user_data: &[u8]) -> u64 {
    let mut word = (header.blocks_to_follow as u64) << 56;
    for (i, b) in pdu_user_data.iter().take(7).enumerate() {
        word |= (*b as u64) << (8 * (6 - i));
    }
    word
}

/// Recover an AMBT opcode from the 64-bit value `to_value` produced, using the same
/// opcode dispatch as a normal single-block `Tsbk`.
pub fn from_value(tsbk_header: TsbkHeader, value: u64) -> Tsbk {
    let mut buf = [0u8; 12];
    buf[0] = (tsbk_header.last_block as u8) << 7 | (tsbk_header.protected as u8) << 6 | (tsbk_header.opcode & 0x3F);
    buf[1] = tsbk_header.mfg;
    for i in 0..8 {
        buf[2 + i] = (value >> (8 * (7 - i))) as u8;
    }

    let crc = crate::edac::crc::CRC16::new().feed_bytes(buf[..10].iter().cloned()).finish() as u16;
    buf[10] = (crc >> 8) as u8;
    buf[11] = crc as u8;

    Tsbk::from_bytes(&buf).expect("freshly computed CRC always validates")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_to_value_from_value_roundtrip() {
        let header = DataHeader { blocks_to_follow: 2, ..DataHeader::default() };
        let value = to_value(&header, b"payload");
        let tsbk_header = TsbkHeader { last_block: true, protected: false, opcode: 0b010101, mfg: 0 };
        let tsbk = from_value(tsbk_header, value);
        assert_eq!(tsbk.header(), tsbk_header);
    }
}
