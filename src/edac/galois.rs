//! GF(2^6) field arithmetic backing the P25 BCH/Reed-Solomon codecs.
//!
//! The field is generated by the primitive polynomial x^6 + x + 1 (0b100_0011). Rather
//! than transcribing the exponent/log tables by hand, they're built once at compile time
//! from that polynomial by repeated multiply-by-alpha, which is the standard way to
//! populate a GF(2^m) table and avoids a 126-entry block of literals that can't be
//! checked by eye.

use collect_slice::CollectSlice;

/// Reduction constant for x^6 + x + 1: once a shift carries a term into the x^6 place,
/// XOR this in to fold it back down to x + 1.
const REDUCE: u32 = 0b100_0011;

const fn build_codewords() -> [u8; 63] {
    let mut table = [0u8; 63];
    let mut value: u32 = 1;
    let mut i = 0;

    while i < 63 {
        table[i] = value as u8;
        value <<= 1;
        if value & 0b100_0000 != 0 {
            value ^= REDUCE;
        }
        i += 1;
    }

    table
}

const fn build_powers(codewords: &[u8; 63]) -> [usize; 63] {
    let mut table = [0usize; 63];
    let mut i = 0;

    while i < 63 {
        table[codewords[i] as usize - 1] = i;
        i += 1;
    }

    table
}

const CODEWORDS: [u8; 63] = build_codewords();
const POWERS: [usize; 63] = build_powers(&CODEWORDS);

/// GF(2<sup>6</sup>) field characterized by α<sup>6</sup>+α+1, as used by the P25 air
/// interface's BCH and Reed-Solomon codes.
#[derive(Copy, Clone, Debug)]
pub struct P25Field;

impl GaloisField for P25Field {
    fn size() -> usize {
        63
    }

    fn valid_codeword(bits: u8) -> bool {
        bits >> 6 == 0
    }

    fn codeword(pow: usize) -> u8 {
        CODEWORDS[pow]
    }

    fn power(codeword: usize) -> usize {
        POWERS[codeword]
    }
}

/// Codeword in the P25 Galois field.
pub type P25Codeword = Codeword<P25Field>;

/// A GF(2<sup>r</sup>) Galois field.
pub trait GaloisField {
    /// Number of unique codewords in the field: 2<sup>r</sup> - 1.
    fn size() -> usize;
    /// Check if the given bit pattern is a valid codeword in the field.
    fn valid_codeword(bits: u8) -> bool;
    /// Map the given power i to codeword α<sup>i</sup>.
    fn codeword(pow: usize) -> u8;
    /// Map the given codeword a<sup>i</sup> to its power i.
    fn power(codeword: usize) -> usize;

    /// Map power `i` to its codeword, reducing `i` modulo the field's size first.
    fn codeword_modded(pow: usize) -> u8 {
        Self::codeword(pow % Self::size())
    }
}

/// Codeword in a Galois field.
#[derive(Copy, Clone)]
pub struct Codeword<F: GaloisField> {
    field: std::marker::PhantomData<F>,
    bits: u8,
}

impl<F: GaloisField> Codeword<F> {
    /// Build a codeword from a raw bit pattern. Panics if the pattern is invalid in the
    /// field.
    pub fn new(bits: u8) -> Codeword<F> {
        assert!(F::valid_codeword(bits));
        Codeword { field: std::marker::PhantomData, bits }
    }

    /// Build α<sup>m</sup> ≡ α<sup>i</sup> (mod field size) for power `i`.
    pub fn for_power(power: usize) -> Codeword<F> {
        Codeword::new(F::codeword_modded(power))
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn zero(&self) -> bool {
        self.bits == 0
    }

    /// Power i of α<sup>i</sup> for this codeword, or `None` if it's zero.
    pub fn power(&self) -> Option<usize> {
        if self.zero() {
            None
        } else {
            Some(F::power(self.bits as usize - 1))
        }
    }

    /// 1/α<sup>i</sup> for the current codeword. Panics on the zero codeword.
    pub fn invert(self) -> Codeword<F> {
        match self.power() {
            Some(p) => Codeword::for_power(F::size() - p),
            None => panic!("invert zero"),
        }
    }

    /// (α<sup>i</sup>)<sup>pow</sup>.
    pub fn pow(&self, pow: usize) -> Codeword<F> {
        match self.power() {
            Some(p) => Codeword::for_power(p * pow),
            None => Codeword::default(),
        }
    }
}

impl<F: GaloisField> Default for Codeword<F> {
    /// The additive identity α<sup>0</sup> = 1.
    fn default() -> Self {
        Codeword::new(0)
    }
}

impl<F: GaloisField> std::ops::Add for Codeword<F> {
    type Output = Codeword<F>;
    fn add(self, rhs: Codeword<F>) -> Self::Output {
        Codeword::new(self.bits ^ rhs.bits)
    }
}

/// GF(2<sup>r</sup>) subtraction is addition.
impl<F: GaloisField> std::ops::Sub for Codeword<F> {
    type Output = Codeword<F>;
    fn sub(self, rhs: Codeword<F>) -> Self::Output {
        self + rhs
    }
}

impl<F: GaloisField> std::ops::Mul for Codeword<F> {
    type Output = Codeword<F>;
    fn mul(self, rhs: Codeword<F>) -> Self::Output {
        match (self.power(), rhs.power()) {
            (Some(p), Some(q)) => Codeword::for_power(p + q),
            _ => Codeword::default(),
        }
    }
}

impl<F: GaloisField> std::ops::Div for Codeword<F> {
    type Output = Codeword<F>;
    fn div(self, rhs: Codeword<F>) -> Self::Output {
        match (self.power(), rhs.power()) {
            (Some(p), Some(q)) => Codeword::for_power(F::size() + p - q),
            (None, Some(_)) => Codeword::default(),
            (_, None) => panic!("divide by zero"),
        }
    }
}

impl<F: GaloisField> std::cmp::PartialEq for Codeword<F> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<F: GaloisField> std::cmp::Eq for Codeword<F> {}

impl<F: GaloisField> std::cmp::PartialEq<u8> for Codeword<F> {
    fn eq(&self, other: &u8) -> bool {
        self.bits == *other
    }
}

impl<F: GaloisField> std::fmt::Debug for Codeword<F> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self.power() {
            Some(p) => write!(fmt, "Codeword::for_power({p})"),
            None => write!(fmt, "Codeword::default()"),
        }
    }
}

/// Coefficient storage for a bounded-degree polynomial over a particular RS/BCH code.
pub trait PolynomialCoefs:
    Default + Copy + Clone + std::ops::Deref<Target = [P25Codeword]> + std::ops::DerefMut
{
    /// Minimum Hamming distance d in (n,k,d).
    fn distance() -> usize;

    /// Maximum correctable errors t, from d = 2t+1.
    fn errors() -> usize {
        Self::distance() / 2
    }

    /// Syndrome count, 2t.
    fn syndromes() -> usize {
        2 * Self::errors()
    }

    fn validate(&self) {
        assert!(Self::distance() % 2 == 1, "code distance must be odd");
        assert!(self.len() >= Self::syndromes(), "storage too small for syndrome polynomial");
    }
}

/// Build a fixed-size `PolynomialCoefs` implementer sized for the Berlekamp-Massey
/// recursion at the given distance (or an explicit length, for scratch polynomials that
/// don't need the full syndrome span).
macro_rules! impl_polynomial_coefs {
    ($name:ident, $dist:expr) => {
        impl_polynomial_coefs!($name, $dist, $dist + 1);
    };
    ($name:ident, $dist:expr, $len:expr) => {
        #[derive(Copy)]
        struct $name([P25Codeword; $len]);

        impl PolynomialCoefs for $name {
            fn distance() -> usize {
                $dist
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name([P25Codeword::default(); $len])
            }
        }

        impl Clone for $name {
            fn clone(&self) -> Self {
                let mut coefs = [P25Codeword::default(); $len];
                coefs.copy_from_slice(&self.0[..]);
                $name(coefs)
            }
        }

        impl std::ops::Deref for $name {
            type Target = [P25Codeword];
            fn deref(&self) -> &Self::Target {
                &self.0[..]
            }
        }

        impl std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0[..]
            }
        }
    };
}

/// Polynomial over P25's GF(2<sup>6</sup>), used by the BCH/Reed-Solomon decoders for
/// the syndrome, error-locator, and error-evaluator polynomials.
#[derive(Copy, Clone)]
pub struct Polynomial<P: PolynomialCoefs> {
    coefs: P,
    /// Index into `coefs` treated as the degree-0 term; `shift()` advances this instead
    /// of moving every coefficient down by one.
    start: usize,
}

impl<P: PolynomialCoefs> Polynomial<P> {
    /// Build p(x) = c<sub>0</sub> + c<sub>1</sub>x + ... from the given coefficients.
    pub fn new<T: Iterator<Item = P25Codeword>>(mut init: T) -> Self {
        let mut coefs = P::default();
        init.collect_slice_exhaust(&mut coefs[..]);
        Self::with_coefs(coefs)
    }

    /// Build p(x) = x<sup>n</sup>.
    pub fn unit_power(n: usize) -> Self {
        let mut coefs = P::default();
        coefs[n] = Codeword::for_power(0);
        Self::with_coefs(coefs)
    }

    fn with_coefs(coefs: P) -> Self {
        Polynomial { coefs, start: 0 }
    }

    pub fn constant(&self) -> P25Codeword {
        self.coefs[self.start]
    }

    /// deg(p(x)), or `None` if p(x) = 0. O(n).
    pub fn degree(&self) -> Option<usize> {
        self.coefs
            .iter()
            .enumerate()
            .rev()
            .find(|(_, c)| !c.zero())
            .map(|(deg, _)| deg - self.start)
    }

    /// Divide by x, shifting every coefficient down a degree. Panics unless c<sub>0</sub>
    /// = 0. O(1).
    pub fn shift(mut self) -> Polynomial<P> {
        assert!(self.constant().zero());
        self.coefs[self.start] = P25Codeword::default();
        self.start += 1;
        self
    }

    fn get(&self, idx: usize) -> P25Codeword {
        self.coefs.get(idx).copied().unwrap_or_default()
    }

    /// Coefficient c<sub>i</sub> of the x<sup>i</sup> term, 0 if i exceeds the degree.
    pub fn coef(&self, i: usize) -> P25Codeword {
        self.get(self.start + i)
    }

    /// Evaluate p(x) at `x` via Horner's method.
    pub fn eval(&self, x: P25Codeword) -> P25Codeword {
        self.iter().rev().fold(P25Codeword::default(), |s, &coef| s * x + coef)
    }

    /// Zero out every term above degree `deg`. O(n).
    pub fn truncate(mut self, deg: usize) -> Polynomial<P> {
        for i in (self.start + deg + 1)..self.coefs.len() {
            self.coefs[i] = P25Codeword::default();
        }
        self
    }

    /// Formal derivative p'(x).
    pub fn deriv(mut self) -> Polynomial<P> {
        for i in self.start..self.coefs.len() {
            self.coefs[i] =
                if (i - self.start) % 2 == 0 { self.get(i + 1) } else { P25Codeword::default() };
        }
        self
    }
}

impl<P: PolynomialCoefs> Default for Polynomial<P> {
    fn default() -> Self {
        Polynomial::new(std::iter::empty())
    }
}

impl<P: PolynomialCoefs> std::ops::Deref for Polynomial<P> {
    type Target = [P25Codeword];
    fn deref(&self) -> &Self::Target {
        &self.coefs[self.start..]
    }
}

impl<P: PolynomialCoefs> std::ops::DerefMut for Polynomial<P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.coefs[self.start..]
    }
}

impl<P: PolynomialCoefs> std::ops::Add for Polynomial<P> {
    type Output = Polynomial<P>;

    fn add(mut self, rhs: Polynomial<P>) -> Self::Output {
        for i in 0..self.coefs.len() {
            self.coefs[i] = self.coef(i) + rhs.coef(i);
        }
        self.start = 0;
        self
    }
}

impl<P: PolynomialCoefs> std::ops::Mul<P25Codeword> for Polynomial<P> {
    type Output = Polynomial<P>;

    fn mul(mut self, rhs: P25Codeword) -> Self::Output {
        for coef in self.coefs.iter_mut() {
            *coef = *coef * rhs;
        }
        self
    }
}

/// Multiply two polynomials, discarding terms beyond the storage's degree bound (i.e.
/// computing p(x)q(x) mod x<sup>n+1</sup>).
impl<P: PolynomialCoefs> std::ops::Mul<Polynomial<P>> for Polynomial<P> {
    type Output = Polynomial<P>;

    fn mul(self, rhs: Polynomial<P>) -> Self::Output {
        let mut out = Polynomial::<P>::default();

        for (i, &coef) in self.iter().enumerate() {
            for (j, &mult) in rhs.iter().enumerate() {
                if let Some(c) = out.coefs.get_mut(i + j) {
                    *c = *c + coef * mult;
                }
            }
        }

        out
    }
}

impl<P: PolynomialCoefs> std::fmt::Debug for Polynomial<P> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(fmt, "Polynomial({:?})", &self.coefs[..])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Copy, Clone, Default)]
    struct TestCoefs([P25Codeword; 24]);

    impl std::ops::Deref for TestCoefs {
        type Target = [P25Codeword];
        fn deref(&self) -> &Self::Target {
            &self.0[..]
        }
    }

    impl std::ops::DerefMut for TestCoefs {
        fn deref_mut(&mut self) -> &mut Self::Target {
            &mut self.0[..]
        }
    }

    impl PolynomialCoefs for TestCoefs {
        fn distance() -> usize {
            23
        }
    }

    type TestPolynomial = Polynomial<TestCoefs>;

    #[derive(Copy, Clone, Default)]
    struct ShortCoefs([P25Codeword; 5]);

    impl std::ops::Deref for ShortCoefs {
        type Target = [P25Codeword];
        fn deref(&self) -> &Self::Target {
            &self.0[..]
        }
    }

    impl std::ops::DerefMut for ShortCoefs {
        fn deref_mut(&mut self) -> &mut Self::Target {
            &mut self.0[..]
        }
    }

    impl PolynomialCoefs for ShortCoefs {
        fn distance() -> usize {
            3
        }
    }

    type ShortPolynomial = Polynomial<ShortCoefs>;

    #[test]
    fn table_matches_generator_recurrence() {
        // Spot-check the computed tables against hand-derived values for x^6+x+1: each
        // successive power doubles the previous bit pattern, reducing through x+1 once
        // it would carry past bit 5.
        assert_eq!(P25Codeword::for_power(0).bits(), 0b000001);
        assert_eq!(P25Codeword::for_power(1).bits(), 0b000010);
        assert_eq!(P25Codeword::for_power(6).bits(), 0b000011);
        assert_eq!(P25Codeword::for_power(62).bits(), 0b100001);
        assert_eq!(P25Codeword::for_power(63).bits(), 0b000001);
    }

    #[test]
    fn test_coefs() {
        assert_eq!(TestCoefs::errors(), 11);
        assert_eq!(TestCoefs::syndromes(), 22);
    }

    #[test]
    fn test_add_sub() {
        assert!((P25Codeword::new(0b100000) + P25Codeword::new(0b010000)) == 0b110000);
        assert!((P25Codeword::new(0b100000) - P25Codeword::new(0b010000)) == 0b110000);
        assert!((P25Codeword::new(0b100001) + P25Codeword::new(0b100001)) == 0b000000);
        assert!((P25Codeword::new(0b100001) + P25Codeword::new(0b110100)) == 0b010101);
    }

    #[test]
    fn test_mul() {
        assert!((P25Codeword::new(0b000110) * P25Codeword::new(0b000101)) == 0b011110);
        assert!((P25Codeword::new(0b000000) * P25Codeword::new(0b000101)) == 0b000000);
        assert!((P25Codeword::new(0b100001) * P25Codeword::new(0b000010)) == 0b000001);
        assert!((P25Codeword::new(0b110011) * P25Codeword::new(0b110011)) == 0b111001);
        assert!((P25Codeword::new(0b101111) * P25Codeword::new(0b101111)) == 0b100110);
    }

    #[test]
    fn test_div() {
        assert!((P25Codeword::new(0b001000) / P25Codeword::new(0b000101)) == 0b010111);
        assert!((P25Codeword::new(0b000000) / P25Codeword::new(0b101000)) == 0b000000);
        assert!((P25Codeword::new(0b011110) / P25Codeword::new(0b011110)) == 0b000001);
    }

    #[test]
    fn test_pow() {
        assert_eq!(P25Codeword::for_power(0).pow(10).power().unwrap(), 0);
        assert_eq!(P25Codeword::for_power(1).pow(10).power().unwrap(), 10);
        assert_eq!(P25Codeword::for_power(62).pow(10).power().unwrap(), 53);
        assert!(P25Codeword::default().pow(20).power().is_none());
    }

    #[test]
    fn test_eval() {
        let p = TestPolynomial::new((0..3).map(|_| P25Codeword::for_power(0)));
        assert!(p.eval(P25Codeword::for_power(1)) == 0b000111);

        let p = TestPolynomial::new((0..2).map(|_| P25Codeword::for_power(0)));
        assert_eq!(p.eval(P25Codeword::for_power(1)), 0b000011);
    }

    #[test]
    fn test_truncate() {
        let p = TestPolynomial::new((0..5).map(|_| P25Codeword::for_power(0)));
        assert_eq!(p.degree().unwrap(), 4);

        let p = p.truncate(2);
        assert_eq!(p.degree().unwrap(), 2);
        assert!(p.coefs[3].power().is_none());
    }

    #[test]
    fn test_polynomial() {
        let p = TestPolynomial::new((0..23).map(P25Codeword::for_power));
        assert!(p.degree().unwrap() == 22);
        assert!(p.constant() == P25Codeword::for_power(0));

        let q = p.clone() * P25Codeword::for_power(2);
        assert!(q.constant() == P25Codeword::for_power(2));

        let q = p.clone() + p.clone();
        for coef in q.iter() {
            assert!(coef.zero());
        }

        let p = TestPolynomial::new((0..2).map(|_| P25Codeword::for_power(0)));
        let q = TestPolynomial::new((0..4).map(|_| P25Codeword::for_power(1)));
        let r = p + q;
        assert!(r.coef(0) == P25Codeword::for_power(6));
    }

    #[test]
    fn test_poly_mul() {
        let p = TestPolynomial::new((0..2).map(|_| P25Codeword::for_power(0)));
        let q = p.clone();
        let r = p * q;

        assert_eq!(r.coef(0).power().unwrap(), 0);
        assert!(r.coef(1).power().is_none());
        assert_eq!(r.coef(2).power().unwrap(), 0);
    }

    #[test]
    fn test_deriv() {
        let p = TestPolynomial::new(
            [P25Codeword::for_power(0), P25Codeword::for_power(3), P25Codeword::for_power(58)]
                .into_iter(),
        );
        let q = p.deriv();

        assert!(q.coefs[0] == P25Codeword::for_power(3));
        assert!(q.coefs[1] == P25Codeword::default());
        assert!(q.coefs[2] == P25Codeword::default());
    }

    #[test]
    fn test_unit_power() {
        let p = TestPolynomial::unit_power(2);
        assert_eq!(p[0], Codeword::default());
        assert_eq!(p[1], Codeword::default());
        assert_eq!(p[2], Codeword::for_power(0));
        assert_eq!(p.degree().unwrap(), 2);

        let p = ShortPolynomial::unit_power(3);
        assert_eq!(p.degree().unwrap(), 3);
    }
}
