//! Golay(23,12,7), its even-weight extension Golay(24,12,8), and the (18,6,8) shortened
//! code DMR derives from it by fixing 6 of the 12 message bits to zero and not
//! transmitting them.
//!
//! The generator matrix is built at runtime from the classical quadratic-residue (Paley)
//! construction for the extended binary Golay code rather than hand-copied from a
//! reference table: G = [I<sub>12</sub> | B], where B is the 12x12 "bordered" matrix
//! whose (i, j) entry (for i, j > 0) is 1 iff (j - i) mod 11 is a quadratic residue mod
//! 11, and whose border row/column is all 1s except the corner. This produces the
//! unique-up-to-equivalence (24,12,8) self-dual doubly-even code; decoding is by
//! brute-force nearest-codeword search, which is exact and, at a few thousand codewords
//! per table, cheap enough that there's no need for the Paley-structure-aware decoding
//! shortcuts real-time Golay decoders use.

use once_cell::sync::Lazy;

/// Quadratic residues mod 11: the nonzero squares {1, 3, 4, 5, 9}.
const QR11: [u32; 5] = [1, 3, 4, 5, 9];

/// Rows of the B half of G = [I12 | B], each a 12-bit value with column 0 at the MSB.
static B: Lazy<[u32; 12]> = Lazy::new(|| {
    let mut rows = [0u32; 12];

    rows[0] = 0b0111_1111_1111;

    for i in 1..12 {
        let mut row = 1 << 11; // column 0 is 1 for every row but row 0
        for j in 1..12 {
            let d = (j as i32 - i as i32).rem_euclid(11) as u32;
            if QR11.contains(&d) {
                row |= 1 << (11 - j);
            }
        }
        rows[i] = row;
    }

    rows
});

/// Compute the 12-bit parity for a 12-bit message using the generator rows above.
fn parity(data: u32) -> u32 {
    (0..12).fold(0u32, |par, i| {
        if data >> (11 - i) & 1 == 1 { par ^ B[i] } else { par }
    })
}

/// Encode 12 data bits into the 24-bit extended Golay codeword.
pub fn encode_extended(data: u16) -> u32 {
    assert!(data >> 12 == 0);
    (data as u32) << 12 | parity(data as u32)
}

/// Encode 12 data bits into the 23-bit (unextended) Golay codeword, by puncturing the
/// trailing overall-parity coordinate of the extended code.
pub fn encode_standard(data: u16) -> u32 {
    encode_extended(data) >> 1
}

static EXTENDED_TABLE: Lazy<Vec<(u32, u16)>> = Lazy::new(|| {
    (0u32..1 << 12).map(|d| (encode_extended(d as u16), d as u16)).collect()
});

static STANDARD_TABLE: Lazy<Vec<(u32, u16)>> = Lazy::new(|| {
    (0u32..1 << 12).map(|d| (encode_standard(d as u16), d as u16)).collect()
});

/// Decode the given 24-bit word to the nearest extended Golay codeword, correcting up to
/// 3 bit errors. Returns `(data, errors)` on success.
pub fn decode_extended(word: u32) -> Option<(u16, usize)> {
    nearest(word, &EXTENDED_TABLE, 3)
}

/// Decode the given 23-bit word to the nearest (unextended) Golay codeword, correcting
/// up to 3 bit errors.
pub fn decode_standard(word: u32) -> Option<(u16, usize)> {
    nearest(word, &STANDARD_TABLE, 3)
}

fn nearest(word: u32, table: &[(u32, u16)], max_err: u32) -> Option<(u16, usize)> {
    let mut best: Option<(u32, u16)> = None;
    let mut ties = false;

    for &(cw, data) in table {
        let dist = (word ^ cw).count_ones();

        match best {
            Some((d, _)) if dist < d => { best = Some((dist, data)); ties = false; }
            Some((d, _)) if dist == d => { ties = true; }
            None => { best = Some((dist, data)); }
            _ => {}
        }
    }

    match best {
        Some((dist, data)) if dist <= max_err && !ties => Some((data, dist as usize)),
        _ => None,
    }
}

/// Encoding and decoding of the (18, 6, 8) shortened code used by DMR embedded/short LC:
/// the top 6 message bits of the (24,12,8) extended code are fixed to zero and not
/// transmitted, leaving an 18-bit (6 data + 12 parity) word.
pub mod shortened {
    use super::*;

    /// Encode 6 data bits into an 18-bit codeword.
    pub fn encode(data: u8) -> u32 {
        assert!(data >> 6 == 0);
        let full = (data as u32) << 6;
        (data as u32) << 12 | super::parity(full)
    }

    static TABLE: Lazy<Vec<(u32, u8)>> = Lazy::new(|| {
        (0u8..1 << 6).map(|d| (encode(d), d)).collect()
    });

    /// Try to decode the given 18-bit word, correcting up to 3 bit errors.
    pub fn decode(word: u32) -> Option<(u8, usize)> {
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
            Some((dist, data)) if dist <= 3 && !ties => Some((data, dist as usize)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_extended_roundtrip() {
        for data in [0u16, 1, 0b101010101010, 0b111111111111, 0xABC & 0xFFF] {
            let e = encode_extended(data);
            assert_eq!(decode_extended(e).unwrap(), (data, 0));

            for bit in 0..24 {
                assert_eq!(decode_extended(e ^ (1 << bit)).unwrap().0, data);
            }
        }
    }

    #[test]
    fn test_extended_min_distance() {
        // Every nonzero codeword should have weight >= 8 (doubly-even self-dual code).
        for data in 1u16..1 << 12 {
            assert!(encode_extended(data).count_ones() >= 8);
        }
    }

    #[test]
    fn test_standard_roundtrip() {
        let data = 0b101010101010;
        let e = encode_standard(data);

        for bit in 0..23 {
            assert_eq!(decode_standard(e ^ (1 << bit)).unwrap().0, data);
        }
    }

    #[test]
    fn test_shortened_roundtrip() {
        for data in 0u8..1 << 6 {
            let e = shortened::encode(data);
            assert_eq!(shortened::decode(e).unwrap(), (data, 0));

            for bit in 0..18 {
                assert_eq!(shortened::decode(e ^ (1 << bit)).unwrap().0, data);
            }
        }
    }
}
