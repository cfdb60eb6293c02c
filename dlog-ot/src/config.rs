use crate::errors::Error;
use dlog::{DlogGroup, Gf2t};
use serde::{Deserialize, Serialize};

/// Parameters shared by every protocol instance a party runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Challenge length `t` of the Sigma protocols, in bits. A cheating
    /// prover succeeds with probability about `2^-t`.
    pub soundness_bits: u32,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self { soundness_bits: 80 }
    }
}

impl ProtocolConfig {
    /// A configuration with the given soundness parameter.
    pub fn new(soundness_bits: u32) -> Self {
        Self { soundness_bits }
    }

    /// Check that the soundness parameter can be used with `group` and return
    /// the field in which challenges live.
    ///
    /// Challenges are read as exponents, so `2^t` must stay below the group
    /// order.
    pub fn challenge_field<G: DlogGroup>(&self, group: &G) -> Result<Gf2t, Error> {
        let field = Gf2t::new(self.soundness_bits)?;
        if u64::from(self.soundness_bits) >= group.order().bits() {
            return Err(Error::ConfigurationError(format!(
                "soundness parameter {} must be smaller than the {}-bit group order",
                self.soundness_bits,
                group.order().bits()
            )));
        }
        Ok(field)
    }

    /// Reject groups in which DDH is not believed to be hard.
    pub fn require_ddh_hard<G: DlogGroup>(&self, group: &G) -> Result<(), Error> {
        if !group.is_ddh_hard() {
            return Err(Error::ConfigurationError(format!(
                "group {} is not DDH-hard",
                group.name()
            )));
        }
        Ok(())
    }
}
