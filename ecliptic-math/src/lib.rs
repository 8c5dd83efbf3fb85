#![deny(clippy::all)]
#![deny(clippy::dbg_macro)]

mod curve;
mod group;
pub mod hash;
pub mod modular;
pub mod named;
mod order;
mod point;
pub mod rng;
mod signature;

pub use curve::{Curve, CurveForm};
pub use group::GroupElement;
pub use point::Point;
pub use signature::{Signature, MAX_NONCE_ATTEMPTS};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("modular inverse does not exist")]
    NonInvertibleElement,
    #[error("point is not on the curve")]
    InvalidCurvePoint,
    #[error("baby-step giant-step found no consistent group order")]
    OrderDiscoveryFailure,
    #[error("signature cannot be verified: s has no inverse modulo the group order")]
    SignatureUnverifiable,
    #[error("modulus is not prime ({0} failed)")]
    ModulusNotPrime(&'static str),
    #[error("group order is unknown")]
    UnknownOrder,
    #[error("group elements belong to different curves")]
    CurveMismatch,
    #[error("modulus is too small")]
    InvalidModulus,
    #[error("invalid group order")]
    InvalidOrder,
    #[error("no usable nonce found in {0} attempts")]
    NonceExhausted(usize),
}

impl Error {
    /// Expected but unlikely failures that may succeed when retried with
    /// fresh randomness. Everything else points at invalid input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NonInvertibleElement)
    }
}
