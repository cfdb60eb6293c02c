//! Security levels of the OT engine.
//!
//! A level is a zero-sized tag selecting which tuple the receiver builds and
//! which extra checks and sub-protocols run.

/// A security level for [`OtSender`](super::OtSender) and
/// [`OtReceiver`](super::OtReceiver).
pub trait SecurityLevel: Send + Sync + 'static {
    /// Name used in log messages.
    const NAME: &'static str;
    /// Whether the receiver sends a quadruple `(x, y, z0, z1)` instead of a
    /// pair `(h0, h1)`.
    const QUADRUPLE: bool;
    /// Whether the receiver proves knowledge of `log_g x`.
    const PROVES_KNOWLEDGE: bool;
}

/// Security against semi-honest adversaries.
#[derive(Clone, Copy, Debug, Default)]
pub struct SemiHonest;

/// Privacy for both parties against malicious adversaries, without
/// simulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrivacyOnly;

/// Simulation against a malicious receiver, privacy against a malicious
/// sender.
#[derive(Clone, Copy, Debug, Default)]
pub struct OneSidedSimulation;

impl SecurityLevel for SemiHonest {
    const NAME: &'static str = "semi-honest";
    const QUADRUPLE: bool = false;
    const PROVES_KNOWLEDGE: bool = false;
}

impl SecurityLevel for PrivacyOnly {
    const NAME: &'static str = "privacy-only";
    const QUADRUPLE: bool = true;
    const PROVES_KNOWLEDGE: bool = false;
}

impl SecurityLevel for OneSidedSimulation {
    const NAME: &'static str = "one-sided simulation";
    const QUADRUPLE: bool = true;
    const PROVES_KNOWLEDGE: bool = true;
}
