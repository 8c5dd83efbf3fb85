use crate::Error;

use num_bigint::{BigInt, BigUint};
use num_integer::{ExtendedGcd, Integer};
use num_traits::{One, Zero};

/// Maps any integer into `[0, modulus)`.
pub fn to_positive_residue(number: &BigInt, modulus: &BigUint) -> BigUint {
    let modulus = BigInt::from(modulus.clone());
    // mod_floor with a positive modulus is never negative
    number.mod_floor(&modulus).into_parts().1
}

pub fn add_mod(lhs: &BigUint, rhs: &BigUint, modulus: &BigUint) -> BigUint {
    (lhs + rhs) % modulus
}

pub fn sub_mod(lhs: &BigUint, rhs: &BigUint, modulus: &BigUint) -> BigUint {
    let lhs = lhs % modulus;
    let rhs = rhs % modulus;
    if lhs >= rhs {
        lhs - rhs
    } else {
        modulus - rhs + lhs
    }
}

pub fn neg_mod(number: &BigUint, modulus: &BigUint) -> BigUint {
    sub_mod(&BigUint::zero(), number, modulus)
}

pub fn mul_mod(lhs: &BigUint, rhs: &BigUint, modulus: &BigUint) -> BigUint {
    (lhs * rhs) % modulus
}

/// Returns the unique `x` in `[0, modulus)` with `number * x = 1 (mod modulus)`.
///
/// Fails with [`Error::NonInvertibleElement`] whenever `number` and `modulus`
/// share a factor, which includes `number = 0 (mod modulus)`.
pub fn mod_inverse(number: &BigUint, modulus: &BigUint) -> Result<BigUint, Error> {
    if modulus.is_zero() {
        return Err(Error::InvalidModulus);
    }
    let signed_modulus = BigInt::from(modulus.clone());
    let number = BigInt::from(number % modulus);
    let ExtendedGcd { gcd, x, .. } = number.extended_gcd(&signed_modulus);
    if !gcd.is_one() {
        return Err(Error::NonInvertibleElement);
    }
    Ok(to_positive_residue(&x, modulus))
}

/// Euler's criterion: `number^((p - 1) / 2) mod p` is either `1` or `p - 1`.
///
/// Zero is reported as a residue since it is its own (trivial) square root.
pub fn is_quadratic_residue(number: &BigUint, prime: &BigUint) -> Result<bool, Error> {
    if prime < &BigUint::from(2u32) {
        return Err(Error::InvalidModulus);
    }
    let number = number % prime;
    if number.is_zero() {
        return Ok(true);
    }
    let exponent = (prime - 1u32) >> 1;
    let symbol = number.modpow(&exponent, prime);
    if symbol.is_one() {
        Ok(true)
    } else if symbol == prime - 1u32 {
        Ok(false)
    } else {
        Err(Error::ModulusNotPrime("euler's criterion"))
    }
}

/// Element `x + y * omega` of the quadratic extension used by Cipolla's
/// algorithm, where `omega^2` is a fixed non-residue.
type ExtensionElement = (BigUint, BigUint);

fn extension_mul(
    lhs: &ExtensionElement,
    rhs: &ExtensionElement,
    omega_squared: &BigUint,
    modulus: &BigUint,
) -> ExtensionElement {
    let real = (&lhs.0 * &rhs.0 + &lhs.1 * &rhs.1 * omega_squared) % modulus;
    let imaginary = (&lhs.0 * &rhs.1 + &rhs.0 * &lhs.1) % modulus;
    (real, imaginary)
}

/// Computes both square roots `{r, p - r}` of `number` modulo `prime` with
/// Cipolla's algorithm.
///
/// Returns `Ok(None)` when `number` is a non-residue.
pub fn modular_square_root(
    number: &BigUint,
    prime: &BigUint,
) -> Result<Option<(BigUint, BigUint)>, Error> {
    if !is_quadratic_residue(number, prime)? {
        return Ok(None);
    }
    let number = number % prime;
    if number.is_zero() {
        return Ok(Some((BigUint::zero(), BigUint::zero())));
    }
    if prime == &BigUint::from(2u32) {
        return Ok(Some((number.clone(), number)));
    }

    // smallest witness whose discriminant is a non-residue
    let mut witness = BigUint::zero();
    let omega_squared = loop {
        let discriminant = sub_mod(&(&witness * &witness), &number, prime);
        if !is_quadratic_residue(&discriminant, prime)? {
            break discriminant;
        }
        witness += 1u32;
        if &witness >= prime {
            return Err(Error::ModulusNotPrime("cipolla witness search"));
        }
    };

    let mut exponent: BigUint = (prime + 1u32) >> 1;
    let mut result: ExtensionElement = (BigUint::one(), BigUint::zero());
    let mut base: ExtensionElement = (witness, BigUint::one());
    while !exponent.is_zero() {
        if exponent.is_odd() {
            result = extension_mul(&result, &base, &omega_squared, prime);
        }
        base = extension_mul(&base, &base, &omega_squared, prime);
        exponent >>= 1;
    }

    let (root, imaginary) = result;
    if !imaginary.is_zero() || mul_mod(&root, &root, prime) != number {
        return Err(Error::ModulusNotPrime("cipolla root check"));
    }
    let other = neg_mod(&root, prime);
    Ok(Some((root, other)))
}
