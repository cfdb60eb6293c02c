//! Arithmetic in the binary extension fields `GF(2^t)` for `t` a multiple of
//! eight up to 128.
//!
//! The field width is chosen at runtime, so elements are plain bit patterns
//! and all arithmetic goes through a [`Gf2t`] value describing the field.

mod polynomial;

pub use polynomial::Polynomial;

use crate::errors::Error;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{CryptoRng, Rng};

/// Low-weight irreducible polynomials, one per supported width. Each entry
/// holds the coefficients below the leading `x^t` term.
const REDUCTION_POLYNOMIALS: [(u32, u128); 16] = [
    (8, 0x1b),
    (16, 0x2b),
    (24, 0x1b),
    (32, 0x8d),
    (40, 0x39),
    (48, 0x2d),
    (56, 0x95),
    (64, 0x1b),
    (72, 0x609),
    (80, 0x215),
    (88, 0xc5),
    (96, 0x641),
    (104, 0x1b),
    (112, 0x39),
    (120, 0x1b),
    (128, 0x87),
];

/// An element of some `GF(2^t)`, stored as its bit pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Gf2tElement(u128);

impl Gf2tElement {
    /// The bit pattern of this element.
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Whether this is the additive identity.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// The field `GF(2)[x] / f(x)` for an irreducible `f` of degree `t`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gf2t {
    bits: u32,
    reduction: u128,
}

impl Gf2t {
    /// The field of width `bits` with the built-in reduction polynomial.
    pub fn new(bits: u32) -> Result<Self, Error> {
        check_width(bits)?;
        REDUCTION_POLYNOMIALS
            .iter()
            .find(|(t, _)| *t == bits)
            .map(|&(bits, reduction)| Self { bits, reduction })
            .ok_or_else(|| Error::InvalidFieldParameters(format!("no modulus for t = {}", bits)))
    }

    /// The field of width `bits` reduced by `x^bits + reduction`. The
    /// modulus is rejected unless it is irreducible.
    pub fn with_modulus(bits: u32, reduction: u128) -> Result<Self, Error> {
        check_width(bits)?;
        if bits < 128 && reduction >> bits != 0 {
            return Err(Error::InvalidFieldParameters(
                "reduction term exceeds the field width".to_string(),
            ));
        }
        let mut f = BigUint::one() << bits as usize;
        f |= BigUint::from(reduction);
        if !is_irreducible(&f, bits) {
            return Err(Error::InvalidFieldParameters(format!(
                "x^{} + {:#x} is reducible",
                bits, reduction
            )));
        }
        Ok(Self { bits, reduction })
    }

    /// The width `t`.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Length of an encoded element, `t / 8`.
    pub fn byte_len(&self) -> usize {
        (self.bits / 8) as usize
    }

    fn mask(&self) -> u128 {
        u128::MAX >> (128 - self.bits)
    }

    /// The additive identity.
    pub fn zero(&self) -> Gf2tElement {
        Gf2tElement(0)
    }

    /// The multiplicative identity.
    pub fn one(&self) -> Gf2tElement {
        Gf2tElement(1)
    }

    /// The element with bit pattern `value`.
    pub fn element(&self, value: u128) -> Result<Gf2tElement, Error> {
        if value & !self.mask() != 0 {
            return Err(Error::InvalidInput(format!(
                "{:#x} does not fit in {} bits",
                value, self.bits
            )));
        }
        Ok(Gf2tElement(value))
    }

    /// The element whose bit pattern is the integer `i`.
    pub fn from_index(&self, i: usize) -> Result<Gf2tElement, Error> {
        self.element(i as u128)
    }

    /// Sum (and difference) of two elements.
    pub fn add(&self, a: Gf2tElement, b: Gf2tElement) -> Gf2tElement {
        Gf2tElement(a.0 ^ b.0)
    }

    /// Product of two elements.
    pub fn mul(&self, a: Gf2tElement, b: Gf2tElement) -> Gf2tElement {
        let mask = self.mask();
        let top = self.bits - 1;
        let (mut a, mut b) = (a.0, b.0);
        let mut r = 0u128;
        while b != 0 {
            if b & 1 == 1 {
                r ^= a;
            }
            b >>= 1;
            let carry = (a >> top) & 1;
            a = (a << 1) & mask;
            if carry == 1 {
                a ^= self.reduction;
            }
        }
        Gf2tElement(r)
    }

    /// Multiplicative inverse, computed as `a^(2^t - 2)`.
    pub fn inverse(&self, a: Gf2tElement) -> Result<Gf2tElement, Error> {
        if a.is_zero() {
            return Err(Error::InvalidInput("zero has no inverse".to_string()));
        }
        // 2^t - 2 = 2 + 4 + ... + 2^(t-1)
        let mut s = a;
        let mut r = self.one();
        for _ in 1..self.bits {
            s = self.mul(s, s);
            r = self.mul(r, s);
        }
        Ok(r)
    }

    /// A uniformly random element.
    pub fn random<R: Rng + CryptoRng>(&self, rng: &mut R) -> Gf2tElement {
        Gf2tElement(rng.gen::<u128>() & self.mask())
    }

    /// Big-endian encoding in exactly `t / 8` bytes.
    pub fn to_bytes(&self, a: Gf2tElement) -> Vec<u8> {
        a.0.to_be_bytes()[16 - self.byte_len()..].to_vec()
    }

    /// Decode exactly `t / 8` big-endian bytes.
    pub fn from_bytes(&self, bytes: &[u8]) -> Result<Gf2tElement, Error> {
        if bytes.len() != self.byte_len() {
            return Err(Error::InvalidInput(format!(
                "field element must be {} bytes, got {}",
                self.byte_len(),
                bytes.len()
            )));
        }
        let mut buf = [0u8; 16];
        buf[16 - bytes.len()..].copy_from_slice(bytes);
        Ok(Gf2tElement(u128::from_be_bytes(buf)))
    }
}

fn check_width(bits: u32) -> Result<(), Error> {
    if bits == 0 || bits > 128 || bits % 8 != 0 {
        return Err(Error::InvalidFieldParameters(format!(
            "field width must be a multiple of 8 in 8..=128, got {}",
            bits
        )));
    }
    Ok(())
}

// Polynomials over GF(2) packed into the bits of a BigUint.

fn gf2_reduce(mut a: BigUint, f: &BigUint) -> BigUint {
    let deg = f.bits();
    while a.bits() >= deg {
        let shift = (a.bits() - deg) as usize;
        a ^= f << shift;
    }
    a
}

fn gf2_mul_mod(a: &BigUint, b: &BigUint, f: &BigUint) -> BigUint {
    let mut r = BigUint::zero();
    for i in 0..b.bits() {
        if b.bit(i) {
            r ^= a << i as usize;
        }
    }
    gf2_reduce(r, f)
}

fn gf2_gcd(mut a: BigUint, mut b: BigUint) -> BigUint {
    while !b.is_zero() {
        let r = gf2_reduce(a, &b);
        a = b;
        b = r;
    }
    a
}

/// `x^(2^k) mod f`.
fn gf2_frobenius(k: u32, f: &BigUint) -> BigUint {
    let mut h = gf2_reduce(BigUint::from(2u32), f);
    for _ in 0..k {
        h = gf2_mul_mod(&h, &h, f);
    }
    h
}

/// Rabin's test: `f` of degree `t` is irreducible iff `x^(2^t) = x mod f`
/// and `gcd(x^(2^(t/p)) - x, f) = 1` for every prime `p` dividing `t`.
fn is_irreducible(f: &BigUint, t: u32) -> bool {
    let x = BigUint::from(2u32);
    if gf2_frobenius(t, f) != x {
        return false;
    }
    prime_factors(t).into_iter().all(|p| {
        let h = gf2_frobenius(t / p, f) ^ &x;
        gf2_gcd(f.clone(), h).is_one()
    })
}

fn prime_factors(mut n: u32) -> Vec<u32> {
    let mut out = Vec::new();
    let mut p = 2;
    while p * p <= n {
        if n % p == 0 {
            out.push(p);
            while n % p == 0 {
                n /= p;
            }
        }
        p += 1;
    }
    if n > 1 {
        out.push(n);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn aes_field_products() {
        let f = Gf2t::new(8).unwrap();
        let a = f.element(0x53).unwrap();
        let b = f.element(0xca).unwrap();
        assert_eq!(f.mul(a, b), f.one());
        assert_eq!(f.inverse(a).unwrap(), b);
        let x = f.element(0x57).unwrap();
        let y = f.element(0x83).unwrap();
        assert_eq!(f.mul(x, y).value(), 0xc1);
    }

    #[test]
    fn every_inverse_in_gf256() {
        let f = Gf2t::new(8).unwrap();
        for v in 1..256u128 {
            let a = f.element(v).unwrap();
            assert_eq!(f.mul(a, f.inverse(a).unwrap()), f.one(), "{:#x}", v);
        }
        assert!(f.inverse(f.zero()).is_err());
    }

    #[test]
    fn built_in_moduli_are_irreducible() {
        for (bits, reduction) in REDUCTION_POLYNOMIALS {
            assert!(Gf2t::with_modulus(bits, reduction).is_ok(), "t = {}", bits);
        }
    }

    #[test]
    fn reducible_moduli_are_rejected() {
        // x^8 + 1 = (x + 1)^8
        assert!(Gf2t::with_modulus(8, 0x01).is_err());
        // x^8 is divisible by x
        assert!(Gf2t::with_modulus(8, 0x00).is_err());
        // x^16 + x^8 + 1 has no root but factors over GF(4)
        assert!(Gf2t::with_modulus(16, 0x101).is_err());
        assert!(Gf2t::with_modulus(8, 0x11b).is_err(), "oversized term");
    }

    #[test]
    fn unsupported_widths_are_rejected() {
        for bits in [0, 7, 12, 81, 136] {
            assert!(matches!(
                Gf2t::new(bits),
                Err(Error::InvalidFieldParameters(_))
            ));
        }
    }

    #[test]
    fn byte_encoding_is_fixed_width() {
        let f = Gf2t::new(80).unwrap();
        let a = f.from_index(3).unwrap();
        let bytes = f.to_bytes(a);
        assert_eq!(bytes.len(), 10);
        assert_eq!(bytes[9], 3);
        assert!(bytes[..9].iter().all(|b| *b == 0));
        assert_eq!(f.from_bytes(&bytes).unwrap(), a);
        assert!(f.from_bytes(&bytes[1..]).is_err());
        assert!(f.element(1u128 << 80).is_err());
    }

    #[test]
    fn inverses_in_wide_fields() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        for bits in [64, 80, 128] {
            let f = Gf2t::new(bits).unwrap();
            for _ in 0..8 {
                let a = f.random(&mut rng);
                if a.is_zero() {
                    continue;
                }
                assert_eq!(f.mul(a, f.inverse(a).unwrap()), f.one());
            }
        }
    }

    proptest! {
        #[test]
        fn multiplication_distributes(a in any::<u128>(), b in any::<u128>(), c in any::<u128>()) {
            let f = Gf2t::new(80).unwrap();
            let mask = u128::MAX >> 48;
            let (a, b, c) = (
                f.element(a & mask).unwrap(),
                f.element(b & mask).unwrap(),
                f.element(c & mask).unwrap(),
            );
            prop_assert_eq!(f.mul(a, f.add(b, c)), f.add(f.mul(a, b), f.mul(a, c)));
            prop_assert_eq!(f.mul(a, b), f.mul(b, a));
            prop_assert_eq!(f.mul(f.mul(a, b), c), f.mul(a, f.mul(b, c)));
        }
    }
}
