use crate::modular::{
    add_mod, mod_inverse, modular_square_root, mul_mod, sub_mod, to_positive_residue,
};
use crate::{Error, Point};

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::sync::Arc;

/// Defining equation of a [`Curve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveForm {
    /// `y^2 = x^3 + a*x + b`
    Weierstrass,
    /// `y^2 + x*y = x^3 + a*x^2 + b`
    ///
    /// This equation usually lives over binary fields. Over a prime field
    /// the resulting chord-and-tangent formulas do not keep points on the
    /// curve, so only construction is validated for this form.
    Koblitz,
}

/// An immutable curve description over the prime field `GF(modulus)`.
///
/// Coefficients are stored reduced into `[0, modulus)`. The modulus is
/// assumed to be prime and this is never checked eagerly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Curve {
    form: CurveForm,
    a: BigUint,
    b: BigUint,
    modulus: BigUint,
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.form {
            CurveForm::Weierstrass => write!(
                f,
                "y^2 = x^3 + {}x + {} (mod {})",
                self.a, self.b, self.modulus
            ),
            CurveForm::Koblitz => write!(
                f,
                "y^2 + xy = x^3 + {}x^2 + {} (mod {})",
                self.a, self.b, self.modulus
            ),
        }
    }
}

impl Curve {
    pub fn new(
        form: CurveForm,
        a: impl Into<BigInt>,
        b: impl Into<BigInt>,
        modulus: impl Into<BigUint>,
    ) -> Result<Arc<Self>, Error> {
        let modulus = modulus.into();
        if modulus < BigUint::from(3u32) {
            return Err(Error::InvalidModulus);
        }
        let a = to_positive_residue(&a.into(), &modulus);
        let b = to_positive_residue(&b.into(), &modulus);
        Ok(Arc::new(Self {
            form,
            a,
            b,
            modulus,
        }))
    }

    pub fn weierstrass(
        a: impl Into<BigInt>,
        b: impl Into<BigInt>,
        modulus: impl Into<BigUint>,
    ) -> Result<Arc<Self>, Error> {
        Self::new(CurveForm::Weierstrass, a, b, modulus)
    }

    pub fn koblitz(
        a: impl Into<BigInt>,
        b: impl Into<BigInt>,
        modulus: impl Into<BigUint>,
    ) -> Result<Arc<Self>, Error> {
        Self::new(CurveForm::Koblitz, a, b, modulus)
    }

    pub fn form(&self) -> CurveForm {
        self.form
    }

    pub fn a(&self) -> &BigUint {
        &self.a
    }

    pub fn b(&self) -> &BigUint {
        &self.b
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Builds an affine point after reducing the coordinates, rejecting it
    /// when it does not satisfy the curve equation.
    pub fn point(&self, x: impl Into<BigInt>, y: impl Into<BigInt>) -> Result<Point, Error> {
        let point = Point::new(
            to_positive_residue(&x.into(), &self.modulus),
            to_positive_residue(&y.into(), &self.modulus),
        );
        if self.is_on_curve(&point) {
            Ok(point)
        } else {
            Err(Error::InvalidCurvePoint)
        }
    }

    pub fn is_on_curve(&self, point: &Point) -> bool {
        match point {
            Point::Infinity => true,
            Point::Affine { x, y } => {
                if x >= &self.modulus || y >= &self.modulus {
                    return false;
                }
                let lhs = match self.form {
                    CurveForm::Weierstrass => mul_mod(y, y, &self.modulus),
                    CurveForm::Koblitz => (y * y + x * y) % &self.modulus,
                };
                lhs == self.right_hand_side(x)
            }
        }
    }

    /// The cubic side of the defining equation at `x`.
    pub fn right_hand_side(&self, x: &BigUint) -> BigUint {
        let p = &self.modulus;
        let x = x % p;
        let cube = (&x * &x * &x) % p;
        let middle = match self.form {
            CurveForm::Weierstrass => mul_mod(&self.a, &x, p),
            CurveForm::Koblitz => (&self.a * &x * &x) % p,
        };
        add_mod(&add_mod(&cube, &middle, p), &self.b, p)
    }

    /// All `y` with `(x, y)` on the curve, or `None` when `x` has no point.
    ///
    /// Both roots coincide when the point is its own negation.
    pub fn solve_y(&self, x: &BigUint) -> Result<Option<(BigUint, BigUint)>, Error> {
        let p = &self.modulus;
        let x = x % p;
        let rhs = self.right_hand_side(&x);
        match self.form {
            CurveForm::Weierstrass => modular_square_root(&rhs, p),
            CurveForm::Koblitz => {
                // (2y + x)^2 = x^2 + 4 * rhs
                let discriminant = add_mod(
                    &mul_mod(&x, &x, p),
                    &mul_mod(&BigUint::from(4u32), &rhs, p),
                    p,
                );
                let (r1, r2) = match modular_square_root(&discriminant, p)? {
                    Some(roots) => roots,
                    None => return Ok(None),
                };
                let half = mod_inverse(&BigUint::from(2u32), p)?;
                let y1 = mul_mod(&sub_mod(&r1, &x, p), &half, p);
                let y2 = mul_mod(&sub_mod(&r2, &x, p), &half, p);
                Ok(Some((y1, y2)))
            }
        }
    }

    /// Tangent slope at `(x, y)`, or `None` for a vertical tangent.
    pub fn slope_at_doubling(&self, x: &BigUint, y: &BigUint) -> Result<Option<BigUint>, Error> {
        let p = &self.modulus;
        let three_x_squared = (BigUint::from(3u32) * x * x) % p;
        let two_y = (BigUint::from(2u32) * y) % p;
        let (numerator, denominator) = match self.form {
            CurveForm::Weierstrass => (add_mod(&three_x_squared, &self.a, p), two_y),
            CurveForm::Koblitz => {
                let two_a_x = (BigUint::from(2u32) * &self.a * x) % p;
                (
                    sub_mod(&add_mod(&three_x_squared, &two_a_x, p), y, p),
                    add_mod(&two_y, x, p),
                )
            }
        };
        if denominator.is_zero() {
            return Ok(None);
        }
        Ok(Some(mul_mod(&numerator, &mod_inverse(&denominator, p)?, p)))
    }

    /// Secant slope through two points, or `None` when they share `x`.
    pub fn slope_through(
        &self,
        x1: &BigUint,
        y1: &BigUint,
        x2: &BigUint,
        y2: &BigUint,
    ) -> Result<Option<BigUint>, Error> {
        let p = &self.modulus;
        let dx = sub_mod(x2, x1, p);
        if dx.is_zero() {
            return Ok(None);
        }
        let dy = sub_mod(y2, y1, p);
        Ok(Some(mul_mod(&dy, &mod_inverse(&dx, p)?, p)))
    }

    pub fn addition_x(&self, slope: &BigUint, x1: &BigUint, x2: &BigUint) -> BigUint {
        let p = &self.modulus;
        let mut x = mul_mod(slope, slope, p);
        if self.form == CurveForm::Koblitz {
            x = add_mod(&x, slope, p);
        }
        sub_mod(&sub_mod(&x, x1, p), x2, p)
    }

    pub fn addition_y(&self, slope: &BigUint, x1: &BigUint, y1: &BigUint, x: &BigUint) -> BigUint {
        let p = &self.modulus;
        sub_mod(&mul_mod(slope, &sub_mod(x1, x, p), p), y1, p)
    }
}
