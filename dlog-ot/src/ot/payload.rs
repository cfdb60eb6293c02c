use crate::errors::Error;
use dlog::{DlogGroup, HkdfSha256, KeyDerivation};
use std::fmt::Debug;

/// A value that can be transferred: masked under a group element by the
/// sender and unmasked with the same element by the receiver.
pub trait Payload<G: DlogGroup>: Clone + Debug + Send + Sized {
    /// Check the sender's own input pair before anything is sent.
    fn validate_pair(x0: &Self, x1: &Self, group: &G) -> Result<(), Error>;

    /// Mask `self` under `key`.
    fn mask(&self, group: &G, key: &G::Element) -> Result<Vec<u8>, Error>;

    /// Undo [`Payload::mask`].
    fn unmask(masked: &[u8], group: &G, key: &G::Element) -> Result<Self, Error>;

    /// Check the shape of a received pair of masked values.
    fn check_masked_pair(c0: &[u8], c1: &[u8], group: &G) -> Result<(), Error>;
}

fn kdf() -> HkdfSha256 {
    HkdfSha256::new(b"dlog-ot payload mask")
}

fn xor_pad<G: DlogGroup>(data: &[u8], group: &G, key: &G::Element) -> Result<Vec<u8>, Error> {
    let pad = kdf().derive_key(&group.map_to_bytes(key), data.len())?;
    Ok(data.iter().zip(pad.iter()).map(|(a, b)| a ^ b).collect())
}

/// Byte strings, masked by XOR with a pad derived from the key.
impl<G: DlogGroup> Payload<G> for Vec<u8> {
    fn validate_pair(x0: &Self, x1: &Self, _: &G) -> Result<(), Error> {
        if x0.len() != x1.len() {
            return Err(Error::InvalidInput(format!(
                "inputs must have equal length (got {} and {})",
                x0.len(),
                x1.len()
            )));
        }
        Ok(())
    }

    fn mask(&self, group: &G, key: &G::Element) -> Result<Vec<u8>, Error> {
        xor_pad(self, group, key)
    }

    fn unmask(masked: &[u8], group: &G, key: &G::Element) -> Result<Self, Error> {
        xor_pad(masked, group, key)
    }

    fn check_masked_pair(c0: &[u8], c1: &[u8], _: &G) -> Result<(), Error> {
        if c0.len() != c1.len() {
            log::warn!("masked strings differ in length");
            return Err(Error::CheatDetected(
                "masked strings differ in length".to_string(),
            ));
        }
        Ok(())
    }
}

/// A group element, masked by multiplication with the key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementPayload<E>(pub E);

impl<G: DlogGroup> Payload<G> for ElementPayload<G::Element> {
    fn validate_pair(x0: &Self, x1: &Self, group: &G) -> Result<(), Error> {
        if !group.is_member(&x0.0) || !group.is_member(&x1.0) {
            return Err(Error::InvalidInput(
                "inputs must be group members".to_string(),
            ));
        }
        Ok(())
    }

    fn mask(&self, group: &G, key: &G::Element) -> Result<Vec<u8>, Error> {
        Ok(group.encode(&group.multiply(&self.0, key)))
    }

    fn unmask(masked: &[u8], group: &G, key: &G::Element) -> Result<Self, Error> {
        let c = group.decode(masked, true)?;
        Ok(ElementPayload(group.multiply(&c, &group.inverse(key))))
    }

    fn check_masked_pair(c0: &[u8], c1: &[u8], group: &G) -> Result<(), Error> {
        for c in [c0, c1] {
            if group.decode(c, true).is_err() {
                log::warn!("masked element is not a group member");
                return Err(Error::CheatDetected(
                    "masked element is not a group member".to_string(),
                ));
            }
        }
        Ok(())
    }
}
