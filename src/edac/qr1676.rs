//! QR(16,7,6), the quadratic-residue code DMR uses for embedded (short) link control in
//! the voice superframe's signalling bursts.
//!
//! Built as the even-weight extension of the (15,7,5) two-error-correcting binary BCH
//! code generated by g(x) = x^8+x^7+x^6+x^4+1: encode the 7 data bits cyclically against
//! g(x) to get a 15-bit systematic codeword, then append an overall parity bit. With only
//! 128 codewords, decoding is exact nearest-codeword search rather than a syndrome-table
//! walk.

use once_cell::sync::Lazy;

/// g(x) = x^8+x^7+x^6+x^4+1.
const GEN: u16 = 0b1_1101_0001;

/// Encode 7 data bits into the 15-bit cyclic (BCH) codeword, data in the high 7 bits.
fn encode15(data: u8) -> u16 {
    assert!(data >> 7 == 0);
    let word = (data as u16) << 8;

    // Polynomial long division of data*x^8 by g(x); the remainder is the parity.
    let mut reg = word;
    for shift in (0..7).rev() {
        if reg >> (shift + 8) & 1 == 1 {
            reg ^= GEN << shift;
        }
    }

    word | (reg & 0xff)
}

/// Encode 7 data bits into the 16-bit extended codeword.
pub fn encode(data: u8) -> u16 {
    let w = encode15(data);
    let parity = (w.count_ones() & 1) as u16;
    w << 1 | parity
}

static TABLE: Lazy<Vec<(u16, u8)>> = Lazy::new(|| {
    (0u8..1 << 7).map(|d| (encode(d), d)).collect()
});

/// Decode the given 16-bit word to the nearest codeword, correcting up to 2 bit errors.
pub fn decode(word: u16) -> Option<(u8, usize)> {
    let mut best: Option<(u32, u8)> = None;
    let mut ties = false;

    for &(cw, data) in TABLE.iter() {
        let dist = (word ^ cw).count_ones();

        match best {
            Some((d, _)) if dist < d => { best = Some((dist, data)); ties = false; }
            Some((d, _)) if dist == d => { ties = true; }
            None => { best = Some((dist, data)); }
            _ => {}
        }
    }

    match best {
        Some((dist, data)) if dist <= 2 && !ties => Some((data, dist as usize)),
        _ => None,
    }
}
