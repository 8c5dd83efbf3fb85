use crate::{Curve, Error, GroupElement};

use num_bigint::BigUint;

const SECP256K1_PRIME_MODULUS: &[u8] =
    b"fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f";
const SECP256K1_ORDER: &[u8] = b"fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";
const SECP256K1_GENERATOR_X: &[u8] =
    b"79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
const SECP256K1_GENERATOR_Y: &[u8] =
    b"483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";

fn from_hex(hex: &[u8]) -> Result<BigUint, Error> {
    BigUint::parse_bytes(hex, 16).ok_or(Error::InvalidModulus)
}

/// The secp256k1 base point with its known prime order.
pub fn secp256k1() -> Result<GroupElement, Error> {
    let curve = Curve::weierstrass(0, 7, from_hex(SECP256K1_PRIME_MODULUS)?)?;
    let generator = curve.point(
        from_hex(SECP256K1_GENERATOR_X)?,
        from_hex(SECP256K1_GENERATOR_Y)?,
    )?;
    GroupElement::with_order(curve, generator, from_hex(SECP256K1_ORDER)?)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn generator_has_prime_order() {
        let g = secp256k1().unwrap();
        assert_eq!(g.require_order().unwrap().bits(), 256);
        assert!(g.curve().is_on_curve(g.point()));
        let order_minus_one = g.require_order().unwrap() - 1u32;
        assert_eq!(g.multiply(&order_minus_one).unwrap(), g.negate());
    }
}
