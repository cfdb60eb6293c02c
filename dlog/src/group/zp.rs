//! The subgroup of quadratic residues modulo a safe prime.

use super::DlogGroup;
use crate::errors::Error;
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::{CryptoRng, Rng};

/// Bit length of `p` from which a group is treated as DDH-hard.
pub const MIN_DDH_BITS: u64 = 1024;

// RFC 2409, Section 6.2 (Oakley group 2).
const MODP_1024: &str = concat!(
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74",
    "020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437",
    "4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED",
    "EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE65381FFFFFFFFFFFFFFFF",
);

// RFC 3526, Section 3 (group 14).
const MODP_2048: &str = concat!(
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74",
    "020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437",
    "4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED",
    "EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05",
    "98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB",
    "9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B",
    "E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718",
    "3995497CEA956AE515D2261898FA051015728E5A8AACAA68FFFFFFFFFFFFFFFF",
);

/// An element of [`ZpSafePrimeGroup`], an integer in `[1, p)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ZpElement(BigUint);

impl ZpElement {
    /// The integer representing this element.
    pub fn value(&self) -> &BigUint {
        &self.0
    }
}

/// The order-`q` subgroup of `Z_p^*` for a safe prime `p = 2q + 1`.
///
/// The subgroup consists of the quadratic residues modulo `p`. Primality of
/// `p` and `q` is the caller's responsibility; the named constructors use
/// standardized primes.
#[derive(Clone, Debug)]
pub struct ZpSafePrimeGroup {
    p: BigUint,
    q: BigUint,
    g: BigUint,
    element_len: usize,
}

impl ZpSafePrimeGroup {
    /// Create the group from `p`, `q` and a generator `g` of the order-`q`
    /// subgroup.
    pub fn new(p: BigUint, q: BigUint, g: BigUint) -> Result<Self, Error> {
        if q <= BigUint::one() || p != &q * 2u32 + 1u32 {
            return Err(Error::InvalidGroupParameters(
                "p must equal 2q + 1 for some q > 1".to_string(),
            ));
        }
        if g <= BigUint::one() || g >= p {
            return Err(Error::InvalidGroupParameters(
                "generator must lie in (1, p)".to_string(),
            ));
        }
        if !g.modpow(&q, &p).is_one() {
            return Err(Error::InvalidGroupParameters(
                "generator does not lie in the order-q subgroup".to_string(),
            ));
        }
        let element_len = ((p.bits() + 7) / 8) as usize;
        Ok(Self {
            p,
            q,
            g,
            element_len,
        })
    }

    fn from_safe_prime_hex(hex: &str) -> Self {
        let p = BigUint::parse_bytes(hex.as_bytes(), 16).expect("well-formed prime constant");
        let q = (&p - 1u32) >> 1usize;
        Self::new(p, q, BigUint::from(2u32)).expect("standardized safe-prime group")
    }

    /// The 1024-bit MODP group of RFC 2409 with generator 2.
    pub fn modp_1024() -> Self {
        Self::from_safe_prime_hex(MODP_1024)
    }

    /// The 2048-bit MODP group of RFC 3526 with generator 2.
    pub fn modp_2048() -> Self {
        Self::from_safe_prime_hex(MODP_2048)
    }

    /// The modulus `p`.
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// Length in bytes of an encoded element.
    pub fn element_len(&self) -> usize {
        self.element_len
    }
}

impl DlogGroup for ZpSafePrimeGroup {
    type Element = ZpElement;

    fn name(&self) -> String {
        format!("QR(Z_p^*), |p| = {} bits", self.p.bits())
    }

    fn generator(&self) -> ZpElement {
        ZpElement(self.g.clone())
    }

    fn order(&self) -> &BigUint {
        &self.q
    }

    fn identity(&self) -> ZpElement {
        ZpElement(BigUint::one())
    }

    fn exponentiate(&self, base: &ZpElement, exponent: &BigUint) -> ZpElement {
        ZpElement(base.0.modpow(exponent, &self.p))
    }

    fn multiply(&self, a: &ZpElement, b: &ZpElement) -> ZpElement {
        ZpElement((&a.0 * &b.0) % &self.p)
    }

    fn inverse(&self, a: &ZpElement) -> ZpElement {
        // Fermat: a^(p-2) is the inverse for every unit, member or not.
        ZpElement(a.0.modpow(&(&self.p - 2u32), &self.p))
    }

    fn is_member(&self, e: &ZpElement) -> bool {
        !e.0.is_zero() && e.0 < self.p && e.0.modpow(&self.q, &self.p).is_one()
    }

    fn is_ddh_hard(&self) -> bool {
        self.p.bits() >= MIN_DDH_BITS
    }

    fn random_element<R: Rng + CryptoRng>(&self, rng: &mut R) -> ZpElement {
        // Squaring a uniform unit gives a uniform quadratic residue.
        let r = rng.gen_biguint_range(&BigUint::one(), &self.p);
        ZpElement((&r * &r) % &self.p)
    }

    fn encode(&self, e: &ZpElement) -> Vec<u8> {
        let bytes = e.0.to_bytes_be();
        let mut out = vec![0u8; self.element_len.saturating_sub(bytes.len())];
        out.extend_from_slice(&bytes);
        out
    }

    fn decode(&self, bytes: &[u8], checked: bool) -> Result<ZpElement, Error> {
        let e = ZpElement(BigUint::from_bytes_be(bytes));
        if checked {
            if bytes.len() != self.element_len {
                return Err(Error::InvalidEncoding(format!(
                    "expected {} bytes, got {}",
                    self.element_len,
                    bytes.len()
                )));
            }
            if !self.is_member(&e) {
                return Err(Error::InvalidEncoding(
                    "value is not a quadratic residue modulo p".to_string(),
                ));
            }
        }
        Ok(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::tests::check_group_laws;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn toy() -> ZpSafePrimeGroup {
        ZpSafePrimeGroup::new(23u32.into(), 11u32.into(), 4u32.into()).unwrap()
    }

    #[test]
    fn group_laws() {
        check_group_laws(&toy(), 1);
        check_group_laws(&ZpSafePrimeGroup::modp_1024(), 2);
    }

    #[test]
    fn standard_groups_are_ddh_hard() {
        assert!(ZpSafePrimeGroup::modp_1024().is_ddh_hard());
        let g = ZpSafePrimeGroup::modp_2048();
        assert!(g.is_ddh_hard());
        assert_eq!(g.element_len(), 256);
        assert!(!toy().is_ddh_hard());
    }

    #[test]
    fn rejects_bad_parameters() {
        // p != 2q + 1
        assert!(ZpSafePrimeGroup::new(23u32.into(), 7u32.into(), 4u32.into()).is_err());
        // 5 is not a quadratic residue modulo 23
        assert!(ZpSafePrimeGroup::new(23u32.into(), 11u32.into(), 5u32.into()).is_err());
        assert!(ZpSafePrimeGroup::new(23u32.into(), 11u32.into(), 1u32.into()).is_err());
        assert!(ZpSafePrimeGroup::new(23u32.into(), 11u32.into(), 23u32.into()).is_err());
    }

    #[test]
    fn membership_matches_quadratic_residues() {
        let g = toy();
        let residues: Vec<u32> = (1..23u32).map(|x| x * x % 23).collect();
        for v in 0..30u32 {
            let e = g.decode(&[v as u8], false).unwrap();
            assert_eq!(g.is_member(&e), v < 23 && residues.contains(&v), "{}", v);
        }
    }

    #[test]
    fn checked_decode_rejects_non_members() {
        let g = ZpSafePrimeGroup::modp_1024();
        // -1 is a non-residue since p = 3 mod 4.
        let minus_one = g.modulus() - 1u32;
        let bytes = g.encode(&ZpElement(minus_one));
        assert!(matches!(
            g.decode(&bytes, true),
            Err(Error::InvalidEncoding(_))
        ));
        assert!(g.decode(&bytes, false).is_ok());
        assert!(g.decode(&vec![0u8; g.element_len()], true).is_err());
        assert!(g.decode(&[1u8], true).is_err(), "short encoding");
        let too_big = g.encode(&ZpElement(g.modulus().clone()));
        assert!(g.decode(&too_big, true).is_err());
    }

    #[test]
    fn negation_leaves_the_group() {
        let g = ZpSafePrimeGroup::modp_1024();
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let e = g.random_element(&mut rng);
        let negated = ZpElement(g.modulus() - e.value());
        assert!(g.is_member(&e));
        assert!(!g.is_member(&negated));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]
        #[test]
        fn encode_decode_round_trip(seed in any::<u64>()) {
            let g = ZpSafePrimeGroup::modp_1024();
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let e = g.random_element(&mut rng);
            let bytes = g.encode(&e);
            prop_assert_eq!(bytes.len(), g.element_len());
            prop_assert_eq!(g.decode(&bytes, true).unwrap(), e);
        }
    }
}
