//! P25 PDU data block: a 16-user-byte payload fragment, rate-3/4 trellis coded for
//! transmission. Confirmed blocks add a serial number and a 9-bit CRC on top of the
//! 16 bytes so an individual block can be retransmitted; unconfirmed blocks carry the
//! 16 bytes with no such overhead.

use crate::edac::crc::CRC9;
use crate::edac::trellis;

/// Bytes of user payload carried by a single block, confirmed or not.
pub const BLOCK_PAYLOAD_LEN: u32 = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataBlock {
    Unconfirmed { last_block: bool, payload: [u8; 16] },
    Confirmed { last_block: bool, serial_no: u8, payload: [u8; 16] },
}

impl DataBlock {
    pub fn last_block(&self) -> bool {
        match *self {
            DataBlock::Unconfirmed { last_block, .. } => last_block,
            DataBlock::Confirmed { last_block, .. } => last_block,
        }
    }

    fn to_raw(&self) -> Vec<u8> {
        match self {
            DataBlock::Unconfirmed { last_block, payload } => {
                let mut payload = *payload;
                payload[0] = payload[0] & 0x7F | (*last_block as u8) << 7;
                payload.to_vec()
            }
            DataBlock::Confirmed { last_block, serial_no, payload } => {
                let mut buf = [0u8; 19];
                buf[0] = (*last_block as u8) << 7 | (serial_no & 0x7F);
                buf[1..17].copy_from_slice(payload);

                let crc = CRC9::new().feed_bytes(payload.iter().cloned()).finish() as u16;
                buf[17] = (crc >> 1) as u8;
                buf[18] = (crc as u8 & 1) << 7;
                buf.to_vec()
            }
        }
    }

    fn from_raw(raw: &[u8], confirmed: bool) -> Option<DataBlock> {
        if confirmed {
            let raw: &[u8; 19] = raw.get(..19)?.try_into().ok()?;
            let last_block = raw[0] & 0x80 != 0;
            let serial_no = raw[0] & 0x7F;
            let mut payload = [0u8; 16];
            payload.copy_from_slice(&raw[1..17]);

            let crc = CRC9::new().feed_bytes(payload.iter().cloned()).finish() as u16;
            let want = (raw[17] as u16) << 1 | (raw[18] >> 7) as u16;
            if crc != want {
                return None;
            }

            Some(DataBlock::Confirmed { last_block, serial_no, payload })
        } else {
            let raw: &[u8; 16] = raw.get(..16)?.try_into().ok()?;
            let last_block = raw[0] & 0x80 != 0;
            let mut payload = *raw;
            payload[0] &= 0x7F;
            Some(DataBlock::Unconfirmed { last_block, payload })
        }
    }

    /// Encode to the rate-3/4 trellis-coded air frame.
    pub fn encode(&self) -> Vec<u8> {
        trellis::encode34(&self.to_raw())
    }

    /// Decode a trellis-coded air frame, validating the CRC-9 if this is a confirmed
    /// block per the preceding data header's format.
    pub fn decode(coded: &[u8], confirmed: bool) -> Option<DataBlock> {
        let raw = trellis::decode34(coded)?;
        DataBlock::from_raw(&raw, confirmed)
    }
}

/// Trailing zero-pad byte count for a packet of `packet_length` user bytes carried in
/// `fmt`-format blocks of [`BLOCK_PAYLOAD_LEN`] bytes each.
///
/// `fmt` is accepted (as in the data header it's paired with) so callers can key off it
/// if a future format ever changes the per-block payload size; today every format shares
/// the same 16-byte block.
pub fn calculate_pad_length(_fmt: u8, packet_length: u32) -> u32 {
    if packet_length == 0 {
        return 0;
    }

    let blocks = (packet_length + BLOCK_PAYLOAD_LEN - 1) / BLOCK_PAYLOAD_LEN;
    blocks * BLOCK_PAYLOAD_LEN - packet_length
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_unconfirmed_roundtrip() {
        let block = DataBlock::Unconfirmed { last_block: false, payload: *b"hello, world 123" };
        let coded = block.encode();
        assert_eq!(DataBlock::decode(&coded, false), Some(block));
    }

    #[test]
    fn test_confirmed_roundtrip() {
        let block = DataBlock::Confirmed {
            last_block: true,
            serial_no: 12,
            payload: *b"abcdefghijklmnop",
        };
        let coded = block.encode();
        assert_eq!(DataBlock::decode(&coded, true), Some(block));
    }

    #[test]
    fn test_confirmed_rejects_corrupted_payload() {
        let block = DataBlock::Confirmed {
            last_block: false,
            serial_no: 1,
            payload: *b"abcdefghijklmnop",
        };
        let mut coded = block.encode();
        coded[2] ^= 0xff;
        assert_eq!(DataBlock::decode(&coded, true), None);
    }

    #[test]
    fn test_calculate_pad_length() {
        assert_eq!(calculate_pad_length(0, 0), 0);
        assert_eq!(calculate_pad_length(0, 16), 0);
        assert_eq!(calculate_pad_length(0, 17), 15);
        assert_eq!(calculate_pad_length(0, 43), 5);
    }
}
