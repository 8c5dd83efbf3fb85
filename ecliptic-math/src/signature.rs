use crate::hash::hash_message;
use crate::modular::{add_mod, mod_inverse, mul_mod};
use crate::rng::random_nonzero_below;
use crate::{Error, GroupElement};

use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Upper bound on fresh nonces drawn for a single signature.
pub const MAX_NONCE_ATTEMPTS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(r: {}, s: {})", self.r, self.s)
    }
}

impl Signature {
    pub fn new(r: BigUint, s: BigUint) -> Self {
        Self { r, s }
    }

    pub fn r(&self) -> &BigUint {
        &self.r
    }

    pub fn s(&self) -> &BigUint {
        &self.s
    }
}

impl GroupElement {
    /// Signs `msg` with `private_key`, treating `self` as the generator.
    pub fn sign<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        msg: &[u8],
        private_key: &BigUint,
    ) -> Result<Signature, Error> {
        let order = self.require_order()?;
        let hash = hash_message(msg) % order;
        let private_key = private_key % order;
        for attempt in 1..=MAX_NONCE_ATTEMPTS {
            let nonce = random_nonzero_below(rng, order)?;
            let nonce_inverse = match mod_inverse(&nonce, order) {
                Ok(inverse) => inverse,
                Err(err) if err.is_retryable() => {
                    tracing::warn!(attempt, error = %err, "nonce rejected, retrying");
                    continue;
                }
                Err(err) => return Err(err),
            };
            let commitment = self.multiply(&nonce)?;
            let r = match commitment.x() {
                Some(x) => x % order,
                None => continue,
            };
            if r.is_zero() {
                continue;
            }
            let s = mul_mod(
                &nonce_inverse,
                &add_mod(&hash, &mul_mod(&r, &private_key, order), order),
                order,
            );
            if s.is_zero() {
                continue;
            }
            return Ok(Signature { r, s });
        }
        Err(Error::NonceExhausted(MAX_NONCE_ATTEMPTS))
    }

    /// Checks `signature` over `msg` against `public_key`, treating `self` as
    /// the generator.
    ///
    /// Components outside `[1, order)` are rejected with `Ok(false)`; an `s`
    /// without inverse modulo the order is reported as
    /// [`Error::SignatureUnverifiable`].
    pub fn verify(
        &self,
        msg: &[u8],
        signature: &Signature,
        public_key: &GroupElement,
    ) -> Result<bool, Error> {
        let order = self.require_order()?;
        let in_range = |value: &BigUint| !value.is_zero() && value < order;
        if !in_range(&signature.r) || !in_range(&signature.s) {
            return Ok(false);
        }
        let w = mod_inverse(&signature.s, order).map_err(|err| match err {
            Error::NonInvertibleElement => Error::SignatureUnverifiable,
            other => other,
        })?;
        let hash = hash_message(msg) % order;
        let u1 = self.multiply(&mul_mod(&hash, &w, order))?;
        let u2 = public_key.multiply(&mul_mod(&signature.r, &w, order))?;
        let check = u1.add(&u2)?;
        Ok(match check.x() {
            Some(x) => &(x % order) == signature.r(),
            None => false,
        })
    }
}
