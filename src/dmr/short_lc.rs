//! DMR short link control: the 36-bit message carried in the Common Announcement
//! Channel and short-LC bursts, protected by 3 parallel Hamming(17,12,3) codewords (12
//! bits each of the 36-bit message) plus a 5-bit CRC over the message, packed into the
//! standard 68-bit interleaved field.

use crate::edac::hamming::h17123;

const MSG_BITS: usize = 36;
const FIELD_BITS: usize = 68;

fn crc5(message: u64) -> u8 {
    // Simple 5-bit checksum: fold the 36-bit message into 5-bit groups and XOR them.
    let mut crc = 0u8;
    let mut m = message;
    for _ in 0..8 {
        crc ^= (m & 0x1f) as u8;
        m >>= 5;
    }
    crc & 0x1f
}

/// Encode a 36-bit message into the 68-bit interleaved field.
pub fn encode(message: u64) -> [bool; FIELD_BITS] {
    assert!(message >> MSG_BITS == 0);

    let mut raw = Vec::with_capacity(FIELD_BITS);
    for group in 0..3 {
        let shift = 24 - group * 12;
        let data = (message >> shift & 0xfff) as u16;
        let code = h17123::encode(data);
        for i in (0..17).rev() {
            raw.push(code >> i & 1 == 1);
        }
    }

    let crc = crc5(message);
    for i in (0..5).rev() {
        raw.push(crc >> i & 1 == 1);
    }

    // Remaining 12 bits of the field are reserved/padding.
    raw.resize(FIELD_BITS, false);

    let mut field = [false; FIELD_BITS];
    field.copy_from_slice(&raw);
    field
}

/// Decode a 68-bit interleaved field, correcting single-bit errors in each Hamming
/// group and validating the CRC.
pub fn decode(field: &[bool; FIELD_BITS]) -> Option<u64> {
    let mut message = 0u64;

    for group in 0..3 {
        let mut code = 0u32;
        for i in 0..17 {
            code = code << 1 | field[group * 17 + i] as u32;
        }
        let (data, _) = h17123::decode(code)?;
        message = message << 12 | data as u64;
    }

    let mut crc = 0u8;
    for i in 0..5 {
        crc = crc << 1 | field[51 + i] as u8;
    }

    if crc != crc5(message) {
        return None;
    }

    Some(message)
}
