//! Polynomials over `GF(2^t)`.

use super::{Gf2t, Gf2tElement};
use crate::errors::Error;

/// A polynomial represented by its coefficient vector, lowest degree first.
///
/// The vector is kept at the length it was built with, so a polynomial
/// interpolated through `n` points always carries `n` coefficients even when
/// the leading ones vanish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial {
    coefficients: Vec<Gf2tElement>,
}

impl Polynomial {
    /// Build a polynomial from its coefficients; `coefficients[i]` belongs to
    /// `x^i`.
    pub fn new(coefficients: Vec<Gf2tElement>) -> Self {
        Self { coefficients }
    }

    /// The polynomial `P(x) = c`.
    pub fn constant(c: Gf2tElement) -> Self {
        Self::new(vec![c])
    }

    /// The coefficient vector.
    pub fn coefficients(&self) -> &[Gf2tElement] {
        &self.coefficients
    }

    /// Number of stored coefficients.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Whether no coefficients are stored.
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Index of the highest nonzero coefficient, zero for a constant.
    pub fn degree(&self) -> usize {
        self.coefficients
            .iter()
            .rposition(|c| !c.is_zero())
            .unwrap_or(0)
    }

    /// Evaluate the polynomial at `at`.
    pub fn eval(&self, field: &Gf2t, at: Gf2tElement) -> Gf2tElement {
        // Horner's rule
        self.coefficients
            .iter()
            .rev()
            .fold(field.zero(), |acc, c| field.add(field.mul(acc, at), *c))
    }

    /// The unique polynomial with `points.len()` coefficients passing through
    /// every `(x, y)` in `points`.
    pub fn interpolate(field: &Gf2t, points: &[(Gf2tElement, Gf2tElement)]) -> Result<Self, Error> {
        if points.is_empty() {
            return Err(Error::InvalidInput(
                "interpolation needs at least one point".to_string(),
            ));
        }
        let mut out = vec![field.zero(); points.len()];
        for (j, (xj, yj)) in points.iter().enumerate() {
            // Basis polynomial prod_{m != j} (x - x_m) / (x_j - x_m).
            // Subtraction is addition in characteristic two.
            let mut basis = vec![field.one()];
            let mut denominator = field.one();
            for (m, (xm, _)) in points.iter().enumerate() {
                if m == j {
                    continue;
                }
                if xm == xj {
                    return Err(Error::InvalidInput(format!(
                        "duplicate interpolation point {:#x}",
                        xj.value()
                    )));
                }
                basis = mul_linear(field, &basis, *xm);
                denominator = field.mul(denominator, field.add(*xj, *xm));
            }
            let scale = field.mul(*yj, field.inverse(denominator)?);
            for (o, b) in out.iter_mut().zip(basis.iter()) {
                *o = field.add(*o, field.mul(*b, scale));
            }
        }
        Ok(Self::new(out))
    }
}

/// `p(x) * (x + c)`
fn mul_linear(field: &Gf2t, p: &[Gf2tElement], c: Gf2tElement) -> Vec<Gf2tElement> {
    let mut out = vec![field.zero(); p.len() + 1];
    for (i, coeff) in p.iter().enumerate() {
        out[i + 1] = field.add(out[i + 1], *coeff);
        out[i] = field.add(out[i], field.mul(*coeff, c));
    }
    out
}
