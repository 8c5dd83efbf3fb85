use crate::{Curve, Error, GroupElement, Point};

use num_bigint::{BigInt, BigUint};
use num_integer::{Integer, Roots};
use num_traits::{One, ToPrimitive, Zero};

use std::collections::HashMap;
use std::sync::Arc;

impl GroupElement {
    /// Searches the Hasse interval `p + 1 +- 2m^2` with `m = ceil(p^(1/4)) + 1`
    /// for a multiple of the order, then reduces it to the exact order.
    pub fn find_order(&self) -> Result<BigUint, Error> {
        let curve = self.curve();
        let point = self.point();
        if point.is_identity() {
            return Ok(BigUint::one());
        }
        let p = curve.modulus();
        let m_big = fourth_root_ceil(p) + 1u32;
        let m = m_big.to_u64().ok_or(Error::OrderDiscoveryFailure)?;
        let steps = m
            .checked_mul(2)
            .and_then(|steps| steps.checked_add(1))
            .ok_or(Error::OrderDiscoveryFailure)?;

        // x(jP) -> j for j in 1..=m, first occurrence wins
        let mut giant = HashMap::<BigUint, u64>::new();
        let mut current = Point::Infinity;
        for j in 1..=m {
            current = curve.add(&current, point)?;
            match current.x() {
                Some(x) => {
                    giant.entry(x.clone()).or_insert(j);
                }
                None => {
                    tracing::debug!(order = j, "order found among giant steps");
                    return Ok(BigUint::from(j));
                }
            }
        }

        let two_m = &m_big << 1;
        let stride = curve.multiply(point, &two_m)?;
        let q = curve.multiply(point, &(p + 1u32))?;
        // Q - m * stride = (p + 1 - 2m^2) P
        let mut current = curve.add(&q, &curve.negate(&curve.multiply(&stride, &m_big)?))?;
        let two_m = BigInt::from(two_m);
        let mut base = BigInt::from(p + 1u32) - &two_m * BigInt::from(m_big);

        for _ in 0..steps {
            let candidates = match current.x() {
                None => vec![base.clone()],
                Some(x) => match giant.get(x) {
                    Some(&j) => vec![&base - j, &base + j],
                    None => Vec::new(),
                },
            };
            for candidate in candidates {
                let candidate = match candidate.to_biguint() {
                    Some(candidate) if !candidate.is_zero() => candidate,
                    _ => continue,
                };
                if curve.multiply(point, &candidate)?.is_identity() {
                    let order = reduce_order(curve, point, candidate)?;
                    tracing::debug!(modulus = %p, order = %order, "discovered group order");
                    return Ok(order);
                }
            }
            current = curve.add(&current, &stride)?;
            base += &two_m;
        }

        tracing::debug!(modulus = %p, "no order candidate in the hasse interval");
        Err(Error::OrderDiscoveryFailure)
    }

    /// Baby-step giant-step for an order known to be at most `bound`.
    pub fn find_order_bounded(&self, bound: u64) -> Result<BigUint, Error> {
        if bound == 0 {
            return Err(Error::OrderDiscoveryFailure);
        }
        let curve = self.curve();
        let point = self.point();
        let mut m = bound.sqrt();
        if m * m < bound {
            m += 1;
        }

        let mut baby = HashMap::<Point, u64>::with_capacity(m.min(1 << 16) as usize);
        let mut current = Point::Infinity;
        for j in 0..m {
            if j > 0 && current.is_identity() {
                return Ok(BigUint::from(j));
            }
            baby.insert(current.clone(), j);
            current = curve.add(&current, point)?;
        }
        if current.is_identity() {
            return Ok(BigUint::from(m));
        }

        // i * m * P = j * P with j < m gives the order i * m - j
        let giant_step = current;
        let mut giant = Point::Infinity;
        for i in 1..=(bound / m + u64::from(bound % m != 0)) {
            giant = curve.add(&giant, &giant_step)?;
            if let Some(&j) = baby.get(&giant) {
                let order = BigUint::from(i) * m - j;
                tracing::debug!(bound, order = %order, "discovered bounded group order");
                return Ok(order);
            }
        }
        Err(Error::OrderDiscoveryFailure)
    }

    /// Consumes the element and returns it with its discovered order.
    pub fn with_discovered_order(self) -> Result<Self, Error> {
        let order = self.find_order()?;
        GroupElement::with_order(Arc::clone(self.curve()), self.point().clone(), order)
    }
}

/// Divides prime factors out of `multiple` while the quotient still
/// annihilates `point`.
fn reduce_order(curve: &Curve, point: &Point, multiple: BigUint) -> Result<BigUint, Error> {
    let mut order = multiple;
    for factor in prime_factors(&order) {
        while (&order % &factor).is_zero() {
            let reduced = &order / &factor;
            if !curve.multiply(point, &reduced)?.is_identity() {
                break;
            }
            order = reduced;
        }
    }
    Ok(order)
}

const TRIAL_DIVISION_LIMIT: u32 = 1 << 10;
const WITNESSES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Distinct prime factors in increasing order.
fn prime_factors(number: &BigUint) -> Vec<BigUint> {
    let mut factors = Vec::new();
    if number.is_zero() {
        return factors;
    }
    let mut rest = number.clone();
    for divisor in 2..TRIAL_DIVISION_LIMIT {
        if rest.is_one() {
            break;
        }
        if (&rest % divisor).is_zero() {
            while (&rest % divisor).is_zero() {
                rest /= divisor;
            }
            factors.push(BigUint::from(divisor));
        }
    }

    let mut pending = vec![rest];
    while let Some(composite) = pending.pop() {
        if composite.is_one() {
            continue;
        }
        if is_probable_prime(&composite) {
            factors.push(composite);
            continue;
        }
        // rho needs about sqrt(q) steps to split q^2
        let root = composite.sqrt();
        if &root * &root == composite {
            pending.push(root);
            continue;
        }
        let divisor = pollard_rho(&composite);
        pending.push(&composite / &divisor);
        pending.push(divisor);
    }
    factors.sort();
    factors.dedup();
    factors
}

/// Miller-Rabin with the first twelve primes as witnesses, deterministic
/// below 3.3 * 10^24.
fn is_probable_prime(number: &BigUint) -> bool {
    if number < &BigUint::from(2u32) {
        return false;
    }
    for witness in WITNESSES {
        if number == &BigUint::from(witness) {
            return true;
        }
        if (number % witness).is_zero() {
            return false;
        }
    }

    let minus_one = number - 1u32;
    let shift = minus_one.trailing_zeros().unwrap_or(0);
    let odd = &minus_one >> shift;
    'witness: for witness in WITNESSES {
        let mut x = BigUint::from(witness).modpow(&odd, number);
        if x.is_one() || x == minus_one {
            continue;
        }
        for _ in 1..shift {
            x = &x * &x % number;
            if x == minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Nontrivial divisor of a composite `number` with Floyd cycle detection on
/// `x^2 + c`, bumping `c` whenever a cycle closes without a split.
fn pollard_rho(number: &BigUint) -> BigUint {
    if number.is_even() {
        return BigUint::from(2u32);
    }
    let mut increment = BigUint::one();
    loop {
        let step = |value: &BigUint| (value * value + &increment) % number;
        let mut tortoise = BigUint::from(2u32);
        let mut hare = tortoise.clone();
        let mut divisor = BigUint::one();
        while divisor.is_one() {
            tortoise = step(&tortoise);
            hare = step(&step(&hare));
            let distance = if tortoise > hare {
                &tortoise - &hare
            } else {
                &hare - &tortoise
            };
            divisor = distance.gcd(number);
        }
        if &divisor != number {
            return divisor;
        }
        increment += 1u32;
    }
}

fn fourth_root_ceil(number: &BigUint) -> BigUint {
    let root = number.nth_root(4);
    if root.pow(4) < *number {
        root + 1u32
    } else {
        root
    }
}
