use crate::modular::mul_mod;
use crate::{Curve, Error, Point};

use num_bigint::BigUint;
use num_traits::Zero;

use std::fmt;
use std::sync::Arc;

/// A point bound to its curve, together with the order of the cyclic
/// subgroup it generates once that order is known.
#[derive(Debug, Clone)]
pub struct GroupElement {
    curve: Arc<Curve>,
    point: Point,
    order: Option<BigUint>,
}

impl PartialEq for GroupElement {
    fn eq(&self, other: &Self) -> bool {
        self.same_curve(other) && self.point == other.point
    }
}

impl Eq for GroupElement {}

impl fmt::Display for GroupElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.point)
    }
}

impl GroupElement {
    /// Binds `point` to `curve` with an unknown order.
    pub fn new(curve: Arc<Curve>, point: Point) -> Result<Self, Error> {
        if !curve.is_on_curve(&point) {
            return Err(Error::InvalidCurvePoint);
        }
        Ok(Self {
            curve,
            point,
            order: None,
        })
    }

    /// Binds `point` to `curve` with a known order. The order must
    /// annihilate the point, although minimality is not checked.
    pub fn with_order(curve: Arc<Curve>, point: Point, order: BigUint) -> Result<Self, Error> {
        let element = Self::new(curve, point)?;
        if order.is_zero() || !element.curve.multiply(&element.point, &order)?.is_identity() {
            return Err(Error::InvalidOrder);
        }
        Ok(Self {
            order: Some(order),
            ..element
        })
    }

    /// Binds `point` to `curve` and discovers its order with baby-step
    /// giant-step.
    pub fn discover(curve: Arc<Curve>, point: Point) -> Result<Self, Error> {
        Self::new(curve, point)?.with_discovered_order()
    }

    pub fn curve(&self) -> &Arc<Curve> {
        &self.curve
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn order(&self) -> Option<&BigUint> {
        self.order.as_ref()
    }

    pub fn require_order(&self) -> Result<&BigUint, Error> {
        self.order.as_ref().ok_or(Error::UnknownOrder)
    }

    pub fn x(&self) -> Option<&BigUint> {
        self.point.x()
    }

    pub fn y(&self) -> Option<&BigUint> {
        self.point.y()
    }

    pub fn is_identity(&self) -> bool {
        self.point.is_identity()
    }

    pub fn same_curve(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.curve, &other.curve) || self.curve == other.curve
    }

    /// A multiple of this element. It stays in the same subgroup, so the
    /// order is carried over.
    pub fn multiply(&self, scalar: &BigUint) -> Result<Self, Error> {
        Ok(Self {
            curve: Arc::clone(&self.curve),
            point: self.curve.multiply(&self.point, scalar)?,
            order: self.order.clone(),
        })
    }

    /// Point addition. The order of the sum is generally unrelated to the
    /// operands' unless both share the same subgroup order.
    pub fn add(&self, other: &Self) -> Result<Self, Error> {
        if !self.same_curve(other) {
            return Err(Error::CurveMismatch);
        }
        let order = match (&self.order, &other.order) {
            (Some(lhs), Some(rhs)) if lhs == rhs => Some(lhs.clone()),
            _ => None,
        };
        Ok(Self {
            curve: Arc::clone(&self.curve),
            point: self.curve.add(&self.point, &other.point)?,
            order,
        })
    }

    pub fn negate(&self) -> Self {
        Self {
            curve: Arc::clone(&self.curve),
            point: self.curve.negate(&self.point),
            order: self.order.clone(),
        }
    }

    pub fn subtract(&self, other: &Self) -> Result<Self, Error> {
        self.add(&other.negate())
    }

    /// The `x * y mod p` value derived from a shared point. The identity has
    /// no coordinates and therefore no secret.
    pub fn secret(&self) -> Option<BigUint> {
        match &self.point {
            Point::Affine { x, y } => Some(mul_mod(x, y, self.curve.modulus())),
            Point::Infinity => None,
        }
    }
}
