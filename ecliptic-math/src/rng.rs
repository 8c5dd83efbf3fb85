use crate::Error;

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand_core::{CryptoRng, RngCore};

/// Uniform non-zero integer below `2^bits`.
pub fn random_bits<R: RngCore + CryptoRng>(rng: &mut R, bits: u64) -> BigUint {
    loop {
        let candidate = rng.gen_biguint(bits.max(1));
        if !candidate.is_zero() {
            return candidate;
        }
    }
}

/// Uniform integer in `[1, bound)`.
pub fn random_nonzero_below<R: RngCore + CryptoRng>(
    rng: &mut R,
    bound: &BigUint,
) -> Result<BigUint, Error> {
    if bound <= &BigUint::one() {
        return Err(Error::InvalidOrder);
    }
    Ok(rng.gen_biguint_range(&BigUint::one(), bound))
}
