//! GF(2<sup>6</sup>) Reed-Solomon codes used by P25: RS(24,12,13) protects the TSBK and
//! TDULC link-control word, RS(24,16,9) protects the HDU, and RS(36,20,17) protects PDU
//! confirmation headers.
//!
//! Same Berlekamp-Massey/Chien-search/Forney machinery as [`crate::edac::bch`], just
//! parameterized over a different generator matrix and error-correcting distance per
//! code.

use collect_slice::CollectSlice;

use crate::bits::Hexbit;
use crate::edac::bmcf;
use crate::edac::galois::{P25Codeword, Polynomial, PolynomialCoefs};

/// RS(24,12,13): protects the P25 TSBK/TDULC link-control word.
pub mod rs241213 {
    use crate::bits::Hexbit;

    /// Transpose of G_LC.
    const GEN: [[u8; 12]; 12] = [
        [0o62, 0o11, 0o03, 0o21, 0o30, 0o01, 0o61, 0o24, 0o72, 0o72, 0o73, 0o71],
        [0o44, 0o12, 0o01, 0o70, 0o22, 0o41, 0o76, 0o22, 0o42, 0o14, 0o65, 0o05],
        [0o03, 0o11, 0o05, 0o27, 0o03, 0o27, 0o21, 0o71, 0o05, 0o65, 0o36, 0o55],
        [0o25, 0o11, 0o75, 0o45, 0o75, 0o56, 0o55, 0o56, 0o20, 0o54, 0o61, 0o03],
        [0o14, 0o16, 0o14, 0o16, 0o15, 0o76, 0o76, 0o21, 0o43, 0o35, 0o42, 0o71],
        [0o16, 0o64, 0o06, 0o67, 0o15, 0o64, 0o01, 0o35, 0o47, 0o25, 0o22, 0o34],
        [0o27, 0o67, 0o20, 0o23, 0o33, 0o21, 0o63, 0o73, 0o33, 0o41, 0o17, 0o60],
        [0o03, 0o55, 0o44, 0o64, 0o15, 0o53, 0o35, 0o42, 0o56, 0o16, 0o04, 0o11],
        [0o53, 0o01, 0o66, 0o73, 0o51, 0o04, 0o30, 0o57, 0o01, 0o15, 0o44, 0o74],
        [0o04, 0o76, 0o06, 0o33, 0o03, 0o25, 0o13, 0o74, 0o16, 0o40, 0o20, 0o02],
        [0o36, 0o26, 0o70, 0o44, 0o53, 0o01, 0o64, 0o43, 0o13, 0o71, 0o25, 0o41],
        [0o47, 0o73, 0o66, 0o21, 0o50, 0o12, 0o70, 0o76, 0o76, 0o26, 0o05, 0o50],
    ];

    /// Compute the 12 parity hexbits for the first 12 data hexbits, writing them into
    /// the tail of `buf`.
    pub fn encode(buf: &mut [Hexbit; 24]) {
        let (data, parity) = buf.split_at_mut(12);
        super::encode(data, parity, GEN.iter().map(|r| &r[..]));
    }

    /// Correct up to 6 hexbit errors (36 bit errors). `Some((data, corrected))` on
    /// success.
    pub fn decode(buf: &mut [Hexbit; 24]) -> Option<(&[Hexbit], usize)> {
        super::decode::<super::Rs241213Coefs>(buf)
            .map(move |(poly, err)| (super::extract_data(poly, &mut buf[..12]), err))
    }
}

/// RS(24,16,9): protects the P25 HDU.
pub mod rs24169 {
    use crate::bits::Hexbit;

    /// Transpose of G_ES.
    const GEN: [[u8; 16]; 8] = [
        [0o51, 0o57, 0o05, 0o73, 0o75, 0o20, 0o02, 0o24, 0o42, 0o32, 0o65, 0o64, 0o62, 0o55, 0o24, 0o67],
        [0o45, 0o25, 0o01, 0o07, 0o15, 0o32, 0o75, 0o74, 0o64, 0o32, 0o36, 0o06, 0o63, 0o43, 0o23, 0o75],
        [0o67, 0o63, 0o31, 0o47, 0o51, 0o14, 0o43, 0o15, 0o07, 0o55, 0o25, 0o54, 0o74, 0o34, 0o23, 0o45],
        [0o15, 0o73, 0o04, 0o14, 0o51, 0o42, 0o05, 0o72, 0o22, 0o41, 0o07, 0o32, 0o70, 0o71, 0o05, 0o60],
        [0o64, 0o71, 0o16, 0o41, 0o17, 0o75, 0o01, 0o24, 0o61, 0o57, 0o50, 0o76, 0o05, 0o57, 0o50, 0o57],
        [0o67, 0o22, 0o54, 0o77, 0o67, 0o42, 0o40, 0o26, 0o20, 0o66, 0o16, 0o46, 0o27, 0o76, 0o70, 0o24],
        [0o52, 0o40, 0o25, 0o47, 0o17, 0o70, 0o12, 0o74, 0o40, 0o21, 0o40, 0o14, 0o37, 0o50, 0o42, 0o06],
        [0o12, 0o15, 0o76, 0o11, 0o57, 0o54, 0o64, 0o61, 0o65, 0o77, 0o51, 0o36, 0o46, 0o64, 0o23, 0o26],
    ];

    /// Compute the 8 parity hexbits for the first 16 data hexbits, writing them into the
    /// tail of `buf`.
    pub fn encode(buf: &mut [Hexbit; 24]) {
        let (data, parity) = buf.split_at_mut(16);
        super::encode(data, parity, GEN.iter().map(|r| &r[..]));
    }

    /// Correct up to 4 hexbit errors (24 bit errors). `Some((data, corrected))` on
    /// success.
    pub fn decode(buf: &mut [Hexbit; 24]) -> Option<(&[Hexbit], usize)> {
        super::decode::<super::Rs24169Coefs>(buf)
            .map(move |(poly, err)| (super::extract_data(poly, &mut buf[..16]), err))
    }
}

/// RS(36,20,17): protects a P25 PDU confirmation header.
pub mod rs362017 {
    use crate::bits::Hexbit;

    /// Transpose of P_HDR.
    const GEN: [[u8; 20]; 16] = [
        [0o74, 0o04, 0o07, 0o26, 0o23, 0o24, 0o52, 0o55, 0o54, 0o74, 0o54, 0o51, 0o01, 0o11, 0o06, 0o34, 0o63, 0o71, 0o02, 0o34],
        [0o37, 0o17, 0o23, 0o05, 0o73, 0o51, 0o33, 0o62, 0o51, 0o41, 0o70, 0o07, 0o65, 0o70, 0o02, 0o31, 0o43, 0o21, 0o01, 0o35],
        [0o34, 0o50, 0o37, 0o07, 0o73, 0o25, 0o14, 0o56, 0o32, 0o30, 0o11, 0o72, 0o32, 0o05, 0o65, 0o01, 0o25, 0o70, 0o53, 0o02],
        [0o06, 0o24, 0o46, 0o63, 0o41, 0o23, 0o02, 0o25, 0o65, 0o41, 0o03, 0o30, 0o70, 0o10, 0o11, 0o15, 0o44, 0o44, 0o74, 0o23],
        [0o02, 0o11, 0o56, 0o63, 0o72, 0o22, 0o20, 0o73, 0o77, 0o43, 0o13, 0o65, 0o13, 0o65, 0o41, 0o44, 0o77, 0o56, 0o02, 0o21],
        [0o07, 0o05, 0o75, 0o27, 0o34, 0o41, 0o06, 0o60, 0o12, 0o22, 0o22, 0o54, 0o44, 0o24, 0o20, 0o64, 0o63, 0o04, 0o14, 0o27],
        [0o44, 0o30, 0o43, 0o63, 0o21, 0o74, 0o14, 0o15, 0o54, 0o51, 0o16, 0o06, 0o73, 0o15, 0o45, 0o16, 0o17, 0o30, 0o52, 0o22],
        [0o64, 0o57, 0o45, 0o40, 0o51, 0o66, 0o25, 0o30, 0o13, 0o06, 0o57, 0o21, 0o24, 0o77, 0o42, 0o24, 0o17, 0o74, 0o74, 0o33],
        [0o26, 0o33, 0o55, 0o06, 0o67, 0o74, 0o52, 0o13, 0o35, 0o64, 0o03, 0o36, 0o12, 0o22, 0o46, 0o52, 0o64, 0o04, 0o12, 0o64],
        [0o14, 0o03, 0o21, 0o04, 0o16, 0o65, 0o23, 0o17, 0o32, 0o33, 0o45, 0o63, 0o52, 0o24, 0o54, 0o16, 0o14, 0o23, 0o57, 0o42],
        [0o26, 0o02, 0o50, 0o40, 0o31, 0o70, 0o35, 0o20, 0o56, 0o03, 0o72, 0o50, 0o21, 0o24, 0o35, 0o06, 0o40, 0o71, 0o24, 0o05],
        [0o44, 0o02, 0o31, 0o45, 0o74, 0o36, 0o74, 0o02, 0o12, 0o47, 0o31, 0o61, 0o55, 0o74, 0o12, 0o62, 0o74, 0o70, 0o63, 0o73],
        [0o54, 0o15, 0o45, 0o47, 0o11, 0o67, 0o75, 0o70, 0o75, 0o27, 0o30, 0o64, 0o12, 0o07, 0o40, 0o20, 0o31, 0o63, 0o15, 0o51],
        [0o13, 0o16, 0o27, 0o30, 0o21, 0o45, 0o75, 0o55, 0o01, 0o12, 0o56, 0o52, 0o35, 0o44, 0o64, 0o13, 0o72, 0o45, 0o42, 0o46],
        [0o77, 0o25, 0o71, 0o75, 0o12, 0o64, 0o43, 0o14, 0o72, 0o55, 0o35, 0o01, 0o14, 0o07, 0o65, 0o55, 0o54, 0o56, 0o52, 0o73],
        [0o05, 0o26, 0o62, 0o07, 0o21, 0o01, 0o27, 0o47, 0o63, 0o47, 0o22, 0o60, 0o72, 0o46, 0o33, 0o57, 0o06, 0o43, 0o33, 0o60],
    ];

    /// Compute the 16 parity hexbits for the first 20 data hexbits, writing them into
    /// the tail of `buf`.
    pub fn encode(buf: &mut [Hexbit; 36]) {
        let (data, parity) = buf.split_at_mut(20);
        super::encode(data, parity, GEN.iter().map(|r| &r[..]))
    }

    /// Correct up to 8 hexbit errors (48 bit errors). `Some((data, corrected))` on
    /// success.
    pub fn decode(buf: &mut [Hexbit; 36]) -> Option<(&[Hexbit], usize)> {
        super::decode::<super::Rs362017Coefs>(buf)
            .map(move |(poly, err)| (super::extract_data(poly, &mut buf[..20]), err))
    }
}

/// Encode a TSBK or TDULC link-control word with RS(24,12,13).
pub fn encode241213(buf: &mut [Hexbit; 24]) {
    rs241213::encode(buf)
}
/// Decode and correct a TSBK or TDULC link-control word encoded with RS(24,12,13).
pub fn decode241213(buf: &mut [Hexbit; 24]) -> Option<(&[Hexbit], usize)> {
    rs241213::decode(buf)
}

/// Encode an HDU payload with RS(24,16,9).
pub fn encode24169(buf: &mut [Hexbit; 24]) {
    rs24169::encode(buf)
}
/// Decode and correct an HDU payload encoded with RS(24,16,9).
pub fn decode24169(buf: &mut [Hexbit; 24]) -> Option<(&[Hexbit], usize)> {
    rs24169::decode(buf)
}

/// Encode a PDU confirmation header with RS(36,20,17).
pub fn encode362017(buf: &mut [Hexbit; 36]) {
    rs362017::encode(buf)
}
/// Decode and correct a PDU confirmation header encoded with RS(36,20,17).
pub fn decode362017(buf: &mut [Hexbit; 36]) -> Option<(&[Hexbit], usize)> {
    rs362017::decode(buf)
}

/// Compute one parity hexbit per row of `gen` against `data` and write them to `parity`.
fn encode<'g, G>(data: &[Hexbit], parity: &mut [Hexbit], gen: G)
where
    G: Iterator<Item = &'g [u8]>,
{
    gen.map(|row| {
        row.iter()
            .zip(data.iter())
            .fold(P25Codeword::default(), |s, (&col, &d)| {
                s + P25Codeword::new(d.bits()) * P25Codeword::new(col)
            })
            .bits()
    })
    .map(Hexbit::new)
    .collect_slice_checked(parity);
}

/// Try to correct a received hexbit word. `Some((poly, corrected))` on success, where
/// `poly`'s degree-0 coefficient is the word's last data symbol.
fn decode<P: PolynomialCoefs>(word: &[Hexbit]) -> Option<(Polynomial<P>, usize)> {
    // A received word's first (most significant) hexbit symbol maps to the highest
    // degree term.
    let mut poly = Polynomial::<P>::new(word.iter().rev().map(|&b| P25Codeword::new(b.bits())));
    let syn = syndromes(&poly);

    let (errors, errs) = bmcf::Errors::new(syn)?;

    let fixed = errs.fold(0, |count, (loc, val)| {
        if let Some(coef) = poly.get_mut(loc) {
            *coef = *coef + val;
        }
        count + 1
    });

    if fixed == errors {
        Some((poly, fixed))
    } else {
        None
    }
}

/// Syndrome polynomial for the given received word.
fn syndromes<P: PolynomialCoefs>(word: &Polynomial<P>) -> Polynomial<P> {
    Polynomial::new((1..=P::syndromes()).map(|pow| word.eval(P25Codeword::for_power(pow))))
}

/// Pull the data symbols out of a corrected word's polynomial form.
fn extract_data<P>(poly: Polynomial<P>, data: &mut [Hexbit]) -> &[Hexbit]
where
    P: PolynomialCoefs,
{
    poly.iter().rev().map(|coef| Hexbit::new(coef.bits())).collect_slice_fill(data);
    data
}

impl_polynomial_coefs!(Rs241213Coefs, 13, 24);
impl_polynomial_coefs!(Rs24169Coefs, 9, 24);
impl_polynomial_coefs!(Rs362017Coefs, 17, 36);

#[cfg(test)]
mod test {
    use collect_slice::CollectSlice;

    use super::*;
    use crate::bits::Hexbit;

    #[test]
    fn validate_coefs() {
        Rs241213Coefs::default().validate();
        Rs24169Coefs::default().validate();
        Rs362017Coefs::default().validate();
    }

    /// Product of (x + alpha^i) over the given consecutive roots, used to verify each
    /// generator polynomial's degree and coefficients against its published values.
    fn root_product<P: PolynomialCoefs>(powers: std::ops::RangeInclusive<usize>) -> Polynomial<P> {
        powers.fold(Polynomial::<P>::new(std::iter::once(P25Codeword::for_power(0))), |acc, i| {
            acc * Polynomial::new([P25Codeword::for_power(i), P25Codeword::for_power(0)].into_iter())
        })
    }

    #[test]
    fn verify_short_gen() {
        let p = root_product::<Rs241213Coefs>(1..=8);
        assert_eq!(p.degree().unwrap(), 8);
        let expect = [0o26, 0o06, 0o24, 0o57, 0o60, 0o45, 0o75, 0o67, 0o01];
        for (i, &e) in expect.iter().enumerate() {
            assert_eq!(p.coef(i).bits(), e);
        }
    }

    #[test]
    fn verify_med_gen() {
        let p = root_product::<Rs24169Coefs>(1..=12);
        assert_eq!(p.degree().unwrap(), 12);
        let expect = [
            0o50, 0o41, 0o02, 0o74, 0o11, 0o60, 0o34, 0o71, 0o03, 0o55, 0o05, 0o71, 0o01,
        ];
        for (i, &e) in expect.iter().enumerate() {
            assert_eq!(p.coef(i).bits(), e);
        }
    }

    #[test]
    fn verify_long_gen() {
        let p = root_product::<Rs362017Coefs>(1..=16);
        assert_eq!(p.degree().unwrap(), 16);
        let expect = [
            0o60, 0o73, 0o46, 0o51, 0o73, 0o05, 0o42, 0o64, 0o33, 0o22, 0o27, 0o21, 0o23, 0o02,
            0o35, 0o34, 0o01,
        ];
        for (i, &e) in expect.iter().enumerate() {
            assert_eq!(p.coef(i).bits(), e);
        }
    }

    #[test]
    fn test_decode_short() {
        let mut buf = [Hexbit::default(); 24];
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
            .iter()
            .map(|&b| Hexbit::new(b))
            .collect_slice(&mut buf[..]);

        rs241213::encode(&mut buf);

        buf[0] = Hexbit::new(0o00);
        buf[2] = Hexbit::new(0o60);
        buf[7] = Hexbit::new(0o42);
        buf[13] = Hexbit::new(0o14);
        buf[18] = Hexbit::new(0o56);
        buf[23] = Hexbit::new(0o72);

        let dec = rs241213::decode(&mut buf);
        let exp = [Hexbit::new(1); 1]
            .into_iter()
            .chain(std::iter::repeat(Hexbit::new(0)).take(11))
            .collect::<Vec<_>>();

        assert_eq!(dec, Some((&exp[..], 6)));
    }

    #[test]
    fn test_decode_med() {
        let mut buf = [Hexbit::default(); 24];
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
            .iter()
            .map(|&b| Hexbit::new(b))
            .collect_slice(&mut buf[..]);

        rs24169::encode(&mut buf);

        buf[0] = Hexbit::new(0o00);
        buf[10] = Hexbit::new(0o60);
        buf[16] = Hexbit::new(0o42);
        buf[23] = Hexbit::new(0o14);

        let dec = rs24169::decode(&mut buf);
        let exp = [Hexbit::new(1); 1]
            .into_iter()
            .chain(std::iter::repeat(Hexbit::new(0)).take(15))
            .collect::<Vec<_>>();

        assert_eq!(dec, Some((&exp[..], 4)));
    }

    #[test]
    fn test_decode_long() {
        let mut buf = [Hexbit::default(); 36];
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
            .iter()
            .map(|&b| Hexbit::new(b))
            .collect_slice(&mut buf[..]);

        rs362017::encode(&mut buf);

        buf[0] = Hexbit::new(0o00);
        buf[2] = Hexbit::new(0o43);
        buf[5] = Hexbit::new(0o21);
        buf[10] = Hexbit::new(0o11);
        buf[18] = Hexbit::new(0o67);
        buf[22] = Hexbit::new(0o04);
        buf[27] = Hexbit::new(0o12);
        buf[30] = Hexbit::new(0o32);

        let dec = rs362017::decode(&mut buf);
        let exp = [Hexbit::new(1); 1]
            .into_iter()
            .chain(std::iter::repeat(Hexbit::new(0)).take(19))
            .collect::<Vec<_>>();

        assert_eq!(dec, Some((&exp[..], 8)));
    }
}
