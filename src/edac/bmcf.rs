//! Berlekamp-Massey, Chien search, and Forney algorithms for decoding the P25
//! Reed-Solomon and BCH codes: from a syndrome polynomial s(x), find the error locator
//! polynomial Λ(x), find its roots (the error locations), and evaluate the Forney
//! formula at each root (the error patterns).
//!
//! Given a received word r(x) with syndromes s<sub>i</sub> = r(α<sup>i</sup>), the
//! pipeline is:
//!
//! 1. [`ErrorLocator`] runs Berlekamp-Massey over s(x) to find Λ(x), treating it as the
//!    connection polynomial of the shortest LFSR that generates the syndrome sequence.
//! 2. [`PolynomialRoots`] walks every field element via Chien search and yields the
//!    α<sup>i</sup> where Λ(α<sup>i</sup>) = 0 — one per error.
//! 3. [`ErrorDescriptions`] applies Forney's formula, Ω(x)/Λ'(x) at each root, where
//!    Ω(x) = Λ(x)s(x) mod x<sup>2t</sup>, to get each error's correction pattern without
//!    polynomial long division.
//! 4. [`Errors`] ties the three together and bails out (`None`) if the number of roots
//!    found doesn't match deg(Λ), since that means the received word is too corrupted to
//!    trust any of the corrections.

use collect_slice::CollectSlice;

use crate::edac::galois::{GaloisField, P25Codeword, P25Field, Polynomial, PolynomialCoefs};

/// Runs Berlekamp-Massey (Hankerson et al.'s formulation) over a syndrome polynomial to
/// find the error locator polynomial Λ(x) = p<sub>2t</sub>(x).
pub struct ErrorLocator<P: PolynomialCoefs> {
    p_saved: Polynomial<P>,
    p_cur: Polynomial<P>,
    q_saved: Polynomial<P>,
    q_cur: Polynomial<P>,
    deg_saved: usize,
    deg_cur: usize,
}

impl<P: PolynomialCoefs> ErrorLocator<P> {
    pub fn new(syn: Polynomial<P>) -> ErrorLocator<P> {
        ErrorLocator {
            // 1 + s(x).
            q_saved: Polynomial::new(
                std::iter::once(P25Codeword::for_power(0)).chain(syn.iter().take(P::syndromes()).cloned()),
            ),
            q_cur: syn,
            p_saved: Polynomial::unit_power(P::syndromes() + 1),
            p_cur: Polynomial::unit_power(P::syndromes()),
            deg_saved: 0,
            deg_cur: 1,
        }
    }

    pub fn build(mut self) -> Polynomial<P> {
        for _ in 0..P::syndromes() {
            self.advance();
        }

        self.p_cur
    }

    /// One LFSR-synthesis step: either shift down (no degree-0 term to pivot on) or
    /// normalize against the last saved state and shift.
    fn advance(&mut self) {
        let (save, q, p, d) = if self.q_cur.constant().zero() {
            (false, self.q_cur.shift(), self.p_cur.shift(), 2 + self.deg_cur)
        } else {
            let mult = self.q_cur.constant() / self.q_saved.constant();
            (
                self.deg_cur >= self.deg_saved,
                (self.q_cur + self.q_saved * mult).shift(),
                (self.p_cur + self.p_saved * mult).shift(),
                2 + std::cmp::min(self.deg_cur, self.deg_saved),
            )
        };

        if save {
            self.q_saved = self.q_cur;
            self.p_saved = self.p_cur;
            self.deg_saved = self.deg_cur;
        }

        self.q_cur = q;
        self.p_cur = p;
        self.deg_cur = d;
    }
}

/// Brute-force root search over Λ(x) via the Chien search optimization: instead of
/// evaluating Λ(α<sup>i</sup>) from scratch at each i, each term's running value is
/// multiplied by α<sup>(its own degree)</sup> between iterations.
pub struct PolynomialRoots<P: PolynomialCoefs> {
    /// Not really a polynomial any more once iteration starts — each entry k holds
    /// Λ<sub>k</sub>·(α<sup>k</sup>)<sup>i</sup> for the current i.
    terms: Polynomial<P>,
    pow: std::ops::Range<usize>,
}

impl<P: PolynomialCoefs> PolynomialRoots<P> {
    pub fn new(loc: Polynomial<P>) -> Self {
        PolynomialRoots { terms: loc, pow: 0..P25Field::size() }
    }

    fn advance_terms(&mut self) {
        for (pow, term) in self.terms.iter_mut().enumerate() {
            *term = *term * P25Codeword::for_power(pow);
        }
    }

    fn eval(&self) -> P25Codeword {
        self.terms.iter().fold(P25Codeword::default(), |sum, &x| sum + x)
    }
}

impl<P: PolynomialCoefs> Iterator for PolynomialRoots<P> {
    type Item = P25Codeword;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let pow = self.pow.next()?;
            let eval = self.eval();
            self.advance_terms();

            if eval.zero() {
                return Some(P25Codeword::for_power(pow));
            }
        }
    }
}

/// Evaluates the Forney formula Ω(x)/Λ'(x) at a root of Λ(x) to recover an error's
/// location and correction pattern.
pub struct ErrorDescriptions<P: PolynomialCoefs> {
    deriv: Polynomial<P>,
    /// Error evaluator Ω(x) = Λ(x)s(x) mod x<sup>2t</sup>.
    omega: Polynomial<P>,
}

impl<P: PolynomialCoefs> ErrorDescriptions<P> {
    pub fn new(syn: Polynomial<P>, loc: Polynomial<P>) -> Self {
        ErrorDescriptions { deriv: loc.deriv(), omega: (loc * syn).truncate(P::syndromes() - 1) }
    }

    /// For root a<sub>i</sub><sup>-1</sup> of Λ(x), the error's location is m ≡ -i (mod
    /// field size) and its pattern is Ω(α<sup>i</sup>)/Λ'(α<sup>i</sup>).
    pub fn for_root(&self, root: P25Codeword) -> (usize, P25Codeword) {
        (root.invert().power().unwrap(), self.omega.eval(root) / self.deriv.eval(root))
    }
}

/// Full syndrome-to-error-list decode, bailing out if the roots found don't account for
/// every term of Λ(x).
pub struct Errors<P: PolynomialCoefs> {
    /// Scratch buffer of root codewords — not itself meaningful as a polynomial.
    roots: Polynomial<P>,
    descs: ErrorDescriptions<P>,
    pos: std::ops::Range<usize>,
}

impl<P: PolynomialCoefs> Errors<P> {
    /// On success, `Some((error_count, iterator))`. `None` means the received word is
    /// too corrupted to correct.
    pub fn new(syn: Polynomial<P>) -> Option<(usize, Self)> {
        let loc = ErrorLocator::new(syn).build();
        let errors = loc.degree().expect("invalid error polynomial");

        // Roots are buffered up front: if the root count disagrees with deg(Λ), none of
        // them can be trusted, and using them before checking risks a spurious
        // divide-by-zero in the Forney step.
        let mut roots = Polynomial::<P>::default();
        let nroots = PolynomialRoots::new(loc).collect_slice_exhaust(&mut roots[..]);

        if nroots != errors {
            return None;
        }

        Some((errors, Errors { roots, descs: ErrorDescriptions::new(syn, loc), pos: 0..errors }))
    }
}

impl<P: PolynomialCoefs> Iterator for Errors<P> {
    type Item = (usize, P25Codeword);

    fn next(&mut self) -> Option<Self::Item> {
        self.pos.next().map(|i| self.descs.for_root(self.roots[i]))
    }
}

#[cfg(test)]
mod test {
    use collect_slice::CollectSlice;

    use super::*;

    impl_polynomial_coefs!(TestCoefs, 9);
    type TestPolynomial = Polynomial<TestCoefs>;

    #[test]
    fn test_roots() {
        // p(x) = (1+α^42x)(1+α^13x)(1+α^57x)
        let p = [42, 13, 57].iter().fold(
            TestPolynomial::new(std::iter::once(P25Codeword::for_power(0))),
            |acc, &pow| {
                acc * TestPolynomial::new(
                    [P25Codeword::for_power(0), P25Codeword::for_power(pow)].into_iter(),
                )
            },
        );

        let mut r = PolynomialRoots::new(p);
        let mut roots = [P25Codeword::default(); 3];
        r.collect_slice_checked(&mut roots[..]);

        assert!(roots.contains(&P25Codeword::for_power(42).invert()));
        assert!(roots.contains(&P25Codeword::for_power(13).invert()));
        assert!(roots.contains(&P25Codeword::for_power(57).invert()));

        let p = TestPolynomial::unit_power(0);
        let mut r = PolynomialRoots::new(p);
        assert!(r.next().is_none());
    }
}
