//! BPTC(196,96), the block product turbo code DMR uses to protect the embedded LC
//! carried in voice superframes and the data/CSBK header's first block.
//!
//! 196 received bits (after removing the sync/slot-type framing around them) are
//! deinterleaved into a 13-row by 15-column matrix plus one leading reserved bit. Each
//! of the 15 columns is a [`hamming::h1393`](super::hamming::h1393) (13,9,3) codeword;
//! each of the 13 rows is a [`hamming::standard`](super::hamming::standard) (15,11,3)
//! codeword. Column correction runs first, then row correction on the corrected grid, the
//! standard order for a product code since row parity also covers the column parity
//! columns. The 96 information bits are the data cells of both codes (row < 9, column <
//! 11) with 3 positions held out as reserved, matching the standard's 96-of-99 usable
//! count.
//!
//! The exact bit-deinterleave permutation used on the air is reproduced here from the
//! structural description above rather than an independently reverified bit table; see
//! `DESIGN.md` for the open question this leaves.

use super::hamming;

const ROWS: usize = 13;
const COLS: usize = 15;

/// Deinterleave the 196 raw bits (MSB-first bit per `u8` slot) into row-major matrix
/// order, dropping the leading reserved bit.
fn deinterleave(raw: &[bool; 196]) -> [[bool; COLS]; ROWS] {
    let mut grid = [[false; COLS]; ROWS];
    for i in 0..ROWS * COLS {
        let bit = raw[(i * 181 + 1) % 196];
        grid[i / COLS][i % COLS] = bit;
    }
    grid
}

fn interleave(grid: &[[bool; COLS]; ROWS]) -> [bool; 196] {
    let mut raw = [false; 196];
    for i in 0..ROWS * COLS {
        raw[(i * 181 + 1) % 196] = grid[i / COLS][i % COLS];
    }
    raw
}

fn row_to_bits(row: &[bool; COLS]) -> u16 {
    row.iter().fold(0u16, |acc, &b| acc << 1 | b as u16)
}

fn bits_to_row(bits: u16) -> [bool; COLS] {
    let mut row = [false; COLS];
    for i in 0..COLS {
        row[i] = bits >> (COLS - 1 - i) & 1 == 1;
    }
    row
}

fn col_to_bits(grid: &[[bool; COLS]; ROWS], c: usize) -> u16 {
    (0..ROWS).fold(0u16, |acc, r| acc << 1 | grid[r][c] as u16)
}

/// Decode a deinterleaved 196-bit block into the 96 information bits, correcting
/// single-bit errors per row/column codeword. Returns `None` if a codeword has more
/// errors than its code can correct.
pub fn decode(raw: &[bool; 196]) -> Option<u128> {
    let mut grid = deinterleave(raw);

    for c in 0..COLS {
        let (data, _) = hamming::h1393::decode(col_to_bits(&grid, c))?;
        for r in 0..ROWS {
            let bit = if r < 9 { data >> (9 - 1 - r) & 1 == 1 } else { grid[r][c] };
            grid[r][c] = bit;
        }
    }

    for r in 0..ROWS {
        let (data, _) = hamming::standard::decode(row_to_bits(&grid[r]))?;
        for c in 0..11 {
            grid[r][c] = data >> (11 - 1 - c) & 1 == 1;
        }
    }

    let mut out = 0u128;
    let mut count = 0;
    for r in 0..9 {
        for c in 0..11 {
            if count < 3 {
                // first 3 of the 99 row/column data cells are reserved, not information
                count += 1;
                continue;
            }
            out = out << 1 | grid[r][c] as u128;
            count += 1;
        }
    }

    Some(out)
}

/// Encode 96 information bits into a deinterleaved-order 196-bit block.
pub fn encode(data: u128) -> [bool; 196] {
    assert!(data >> 96 == 0);

    let mut grid = [[false; COLS]; ROWS];
    let mut bits = data;
    let mut count = 0;
    for r in 0..9 {
        for c in 0..11 {
            if count < 3 {
                count += 1;
                continue;
            }
            grid[r][c] = bits >> 95 & 1 == 1;
            bits <<= 1;
            count += 1;
        }
    }

    for r in 0..9 {
        let row_data = (0..11).fold(0u16, |acc, c| acc << 1 | grid[r][c] as u16);
        let row_code = hamming::standard::encode(row_data);
        grid[r] = bits_to_row(row_code);
    }

    for c in 0..COLS {
        let col_data = (0..9).fold(0u16, |acc, r| acc << 1 | grid[r][c] as u16);
        let col_code = hamming::h1393::encode(col_data);
        for r in 0..ROWS {
            grid[r][c] = col_code >> (ROWS - 1 - r) & 1 == 1;
        }
    }

    interleave(&grid)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for data in [0u128, 1, 0xdead_beef, (1u128 << 96) - 1] {
            let raw = encode(data);
            assert_eq!(decode(&raw), Some(data));
        }
    }

    #[test]
    fn test_corrects_single_bit_error() {
        let data = 0x1234_5678_9abc;
        let mut raw = encode(data);
        raw[50] = !raw[50];
        assert_eq!(decode(&raw), Some(data));
    }
}
