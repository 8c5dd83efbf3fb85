use crate::modular::neg_mod;
use crate::{Curve, Error};

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use std::fmt;

/// A curve point in affine coordinates, or the group identity.
///
/// A `Point` does not know its curve; [`Curve`] validates and combines them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Point {
    Affine { x: BigUint, y: BigUint },
    Infinity,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Affine { x, y } => write!(f, "({}, {})", x, y),
            Self::Infinity => write!(f, "Infinity"),
        }
    }
}

impl Point {
    /// Unchecked constructor, see [`Curve::point`] for the validated one.
    pub fn new(x: BigUint, y: BigUint) -> Self {
        Self::Affine { x, y }
    }

    pub fn x(&self) -> Option<&BigUint> {
        match self {
            Self::Affine { x, .. } => Some(x),
            Self::Infinity => None,
        }
    }

    pub fn y(&self) -> Option<&BigUint> {
        match self {
            Self::Affine { y, .. } => Some(y),
            Self::Infinity => None,
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Infinity)
    }
}

impl Curve {
    pub fn add(&self, lhs: &Point, rhs: &Point) -> Result<Point, Error> {
        let (x1, y1, x2, y2) = match (lhs, rhs) {
            (Point::Infinity, _) => return Ok(rhs.clone()),
            (_, Point::Infinity) => return Ok(lhs.clone()),
            (Point::Affine { x: x1, y: y1 }, Point::Affine { x: x2, y: y2 }) => (x1, y1, x2, y2),
        };
        if lhs == rhs {
            return self.double(lhs);
        }
        match self.slope_through(x1, y1, x2, y2)? {
            Some(slope) => {
                let x = self.addition_x(&slope, x1, x2);
                let y = self.addition_y(&slope, x1, y1, &x);
                Ok(Point::new(x, y))
            }
            None => Ok(Point::Infinity),
        }
    }

    pub fn double(&self, point: &Point) -> Result<Point, Error> {
        let (x1, y1) = match point {
            Point::Infinity => return Ok(Point::Infinity),
            Point::Affine { x, y } => (x, y),
        };
        match self.slope_at_doubling(x1, y1)? {
            Some(slope) => {
                let x = self.addition_x(&slope, x1, x1);
                let y = self.addition_y(&slope, x1, y1, &x);
                Ok(Point::new(x, y))
            }
            None => Ok(Point::Infinity),
        }
    }

    pub fn negate(&self, point: &Point) -> Point {
        match point {
            Point::Infinity => Point::Infinity,
            Point::Affine { x, y } => Point::new(x.clone(), neg_mod(y, self.modulus())),
        }
    }

    /// Double-and-add over the bits of `scalar`, most significant first.
    pub fn multiply(&self, point: &Point, scalar: &BigUint) -> Result<Point, Error> {
        let mut result = Point::Infinity;
        for i in (0..scalar.bits()).rev() {
            result = self.double(&result)?;
            if scalar.bit(i) {
                result = self.add(&result, point)?;
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use std::sync::Arc;

    fn toy_curve() -> Arc<Curve> {
        Curve::weierstrass(0, 7, 199u32).unwrap()
    }

    fn mul(curve: &Curve, point: &Point, k: u32) -> Point {
        curve.multiply(point, &BigUint::from(k)).unwrap()
    }

    #[test]
    fn scalar_multiples() {
        let curve = toy_curve();
        let g = curve.point(1, 40).unwrap();
        assert_eq!(mul(&curve, &g, 0), Point::Infinity);
        assert_eq!(mul(&curve, &g, 1), g);
        assert_eq!(mul(&curve, &g, 2), curve.point(104, 83).unwrap());
        assert_eq!(mul(&curve, &g, 3), curve.point(50, 154).unwrap());
        assert_eq!(mul(&curve, &g, 5), curve.point(70, 145).unwrap());
        assert_eq!(mul(&curve, &g, 7), curve.point(60, 106).unwrap());
        assert_eq!(mul(&curve, &g, 35), curve.point(148, 41).unwrap());
        // G has order 63
        assert_eq!(mul(&curve, &g, 63), Point::Infinity);
        assert_eq!(mul(&curve, &g, 64), g);
        assert_eq!(curve.double(&g).unwrap(), mul(&curve, &g, 2));
    }

    #[test]
    fn infinity_is_identity() {
        let curve = toy_curve();
        let g = curve.point(1, 40).unwrap();
        assert_eq!(curve.add(&g, &Point::Infinity).unwrap(), g);
        assert_eq!(curve.add(&Point::Infinity, &g).unwrap(), g);
        assert_eq!(
            curve.add(&g, &curve.negate(&g)).unwrap(),
            Point::Infinity
        );
        assert_eq!(curve.double(&Point::Infinity).unwrap(), Point::Infinity);
        assert_eq!(
            curve.multiply(&Point::Infinity, &BigUint::from(12u32)).unwrap(),
            Point::Infinity
        );
        assert!(Point::Infinity.is_identity());
        assert!(Point::Infinity.x().is_none());
    }

    #[test]
    fn addition_is_commutative_and_on_curve() {
        let curve = toy_curve();
        let p = curve.point(1, 40).unwrap();
        let q = curve.point(5, 27).unwrap();
        let sum = curve.add(&p, &q).unwrap();
        assert_eq!(sum, curve.point(17, 12).unwrap());
        assert_eq!(curve.add(&q, &p).unwrap(), sum);

        let mut current = p.clone();
        for _ in 0..70 {
            assert!(curve.is_on_curve(&current));
            assert!(curve.is_on_curve(&curve.double(&current).unwrap()));
            current = curve.add(&current, &q).unwrap();
        }
    }

    #[test]
    fn scalar_linearity() {
        let curve = toy_curve();
        let g = curve.point(7, 56).unwrap();
        for (a, b) in [(3u32, 11u32), (20, 43), (0, 17), (31, 32)] {
            let lhs = mul(&curve, &g, a + b);
            let rhs = curve
                .add(&mul(&curve, &g, a), &mul(&curve, &g, b))
                .unwrap();
            assert_eq!(lhs, rhs);
        }
        // 5 * (7 * G) == 7 * (5 * G)
        let g = curve.point(1, 40).unwrap();
        let five_seven = mul(&curve, &mul(&curve, &g, 7), 5);
        let seven_five = mul(&curve, &mul(&curve, &g, 5), 7);
        assert_eq!(five_seven, seven_five);
    }

    #[test]
    fn order_three_point_wraps() {
        let curve = toy_curve();
        let p = curve.point(0, 87).unwrap();
        let doubled = curve.double(&p).unwrap();
        assert_eq!(doubled, curve.negate(&p));
        assert_eq!(curve.add(&doubled, &p).unwrap(), Point::Infinity);
    }

    #[test]
    fn koblitz_arithmetic() {
        let curve = Curve::koblitz(1, 3, 199u32).unwrap();
        let p = curve.point(2, 3).unwrap();
        let q = curve.point(3, 14).unwrap();
        assert_eq!(curve.double(&p).unwrap(), Point::new(78u32.into(), 172u32.into()));
        let sum = curve.add(&p, &q).unwrap();
        assert_eq!(sum, Point::new(127u32.into(), 15u32.into()));
        assert_eq!(curve.add(&q, &p).unwrap(), sum);
        assert_eq!(
            mul(&curve, &p, 3),
            Point::new(42u32.into(), 128u32.into())
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            Point::new(1u32.into(), 40u32.into()).to_string(),
            "(1, 40)"
        );
        assert_eq!(Point::Infinity.to_string(), "Infinity");
    }
}
