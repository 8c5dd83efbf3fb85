use crate::{Error, Party};
use ecliptic_math::GroupElement;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    /// Own key pair generated, nothing sent or received.
    Initialized,
    /// Public key handed to the peer, remote key still missing.
    KeySent,
    /// Remote key received and the shared key computed.
    SharedEstablished,
}

/// Result of comparing the shared keys of two sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedKeyComparison {
    /// Leading decimal digits both coordinates have in common, the smaller
    /// count of x and y.
    pub equal_digits: usize,
    pub equal: bool,
}

#[derive(Debug, Clone)]
pub struct KeyExchange {
    generator: GroupElement,
    actor: Party,
    key_sent: bool,
    remote: Option<Party>,
    shared: Option<GroupElement>,
}

impl fmt::Display for KeyExchange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Public key: {}", self.actor.public_key())?;
        if let Some(remote) = &self.remote {
            write!(f, ", Remote key: {}", remote.public_key())?;
        }
        if let Some(shared) = &self.shared {
            write!(f, ", Shared key: {}", shared)?;
        }
        Ok(())
    }
}

impl KeyExchange {
    pub fn new(generator: &GroupElement, actor: Party) -> Result<Self, Error> {
        if !actor.is_local() {
            return Err(Error::MissingPrivateKey);
        }
        if actor.generator() != generator {
            return Err(Error::GeneratorMismatch);
        }
        Ok(Self {
            generator: generator.clone(),
            actor,
            key_sent: false,
            remote: None,
            shared: None,
        })
    }

    pub fn state(&self) -> ExchangeState {
        if self.shared.is_some() {
            ExchangeState::SharedEstablished
        } else if self.key_sent {
            ExchangeState::KeySent
        } else {
            ExchangeState::Initialized
        }
    }

    pub fn generator(&self) -> &GroupElement {
        &self.generator
    }

    pub fn actor(&self) -> &Party {
        &self.actor
    }

    pub fn remote(&self) -> Option<&Party> {
        self.remote.as_ref()
    }

    pub fn shared(&self) -> Option<&GroupElement> {
        self.shared.as_ref()
    }

    /// Hands the public half of the local key pair to `peer`, which derives
    /// its shared key from it.
    pub fn send_public_key_to(&mut self, peer: &mut KeyExchange) -> Result<(), Error> {
        peer.generate_shared_key(self.actor.to_public())?;
        self.key_sent = true;
        tracing::debug!(state = ?self.state(), "public key sent");
        Ok(())
    }

    /// Stores `remote` and computes `private * remote_public`. A session is
    /// never re-keyed.
    pub fn generate_shared_key(&mut self, remote: Party) -> Result<(), Error> {
        if self.shared.is_some() {
            return Err(Error::AlreadyEstablished);
        }
        if remote.generator() != &self.generator {
            return Err(Error::GeneratorMismatch);
        }
        let shared = self.actor.derive(remote.public_key())?;
        tracing::debug!(remote = %remote.public_key(), "shared key established");
        self.remote = Some(remote.to_public());
        self.shared = Some(shared);
        Ok(())
    }

    /// Compares the shared keys of two completed sessions.
    pub fn check_equality(&self, other: &KeyExchange) -> Result<SharedKeyComparison, Error> {
        let (lhs, rhs) = match (&self.shared, &other.shared) {
            (Some(lhs), Some(rhs)) => (lhs, rhs),
            _ => return Err(Error::KeyExchangeIncomplete),
        };
        let equal_digits = match (lhs.x().zip(lhs.y()), rhs.x().zip(rhs.y())) {
            (Some((lx, ly)), Some((rx, ry))) => std::cmp::min(
                equal_leading_digits(&lx.to_string(), &rx.to_string()),
                equal_leading_digits(&ly.to_string(), &ry.to_string()),
            ),
            _ => 0,
        };
        Ok(SharedKeyComparison {
            equal_digits,
            equal: lhs == rhs,
        })
    }
}

fn equal_leading_digits(lhs: &str, rhs: &str) -> usize {
    lhs.chars()
        .zip(rhs.chars())
        .take_while(|(l, r)| l == r)
        .count()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Parameters;
    use ecliptic_math::Curve;
    use num_bigint::BigUint;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn toy_generator() -> GroupElement {
        let curve = Curve::weierstrass(0, 7, 199u32).unwrap();
        let point = curve.point(1, 40).unwrap();
        GroupElement::with_order(curve, point, BigUint::from(63u32)).unwrap()
    }

    fn session(g: &GroupElement, private_key: u32) -> KeyExchange {
        let party = Party::from_private(g, BigUint::from(private_key)).unwrap();
        KeyExchange::new(g, party).unwrap()
    }

    #[test]
    fn state_transitions() {
        let g = toy_generator();
        let mut alice = session(&g, 5);
        let mut bob = session(&g, 7);
        assert_eq!(alice.state(), ExchangeState::Initialized);
        assert!(matches!(
            alice.check_equality(&bob),
            Err(Error::KeyExchangeIncomplete)
        ));

        alice.send_public_key_to(&mut bob).unwrap();
        assert_eq!(alice.state(), ExchangeState::KeySent);
        assert_eq!(bob.state(), ExchangeState::SharedEstablished);
        assert!(!bob.remote().unwrap().is_local());

        bob.send_public_key_to(&mut alice).unwrap();
        assert_eq!(alice.state(), ExchangeState::SharedEstablished);

        let comparison = alice.check_equality(&bob).unwrap();
        assert!(comparison.equal);
        // 35 * G = (148, 41)
        assert_eq!(comparison.equal_digits, 2);
        assert_eq!(alice.shared(), Some(&g.multiply(&BigUint::from(35u32)).unwrap()));
        assert_eq!(
            alice.to_string(),
            "Public key: (70, 145), Remote key: (60, 106), Shared key: (148, 41)"
        );

        assert!(matches!(
            bob.send_public_key_to(&mut alice),
            Err(Error::AlreadyEstablished)
        ));
    }

    #[test]
    fn mismatching_sessions() {
        let g = toy_generator();
        let mut alice = session(&g, 5);
        let mut carol = session(&g, 11);
        let mut bob = session(&g, 7);
        alice.send_public_key_to(&mut bob).unwrap();
        carol.send_public_key_to(&mut alice).unwrap();
        let comparison = alice.check_equality(&bob).unwrap();
        assert!(!comparison.equal);

        assert!(matches!(
            KeyExchange::new(&g, alice.actor().to_public()),
            Err(Error::MissingPrivateKey)
        ));
    }

    #[test]
    fn random_parties_agree() {
        let mut rng = StdRng::seed_from_u64(99);
        let g = ecliptic_math::named::secp256k1().unwrap();
        let parameters = Parameters::default();
        let alice_party = Party::new(&mut rng, &g, &parameters).unwrap();
        let bob_party = Party::new(&mut rng, &g, &parameters).unwrap();
        let mut alice = KeyExchange::new(&g, alice_party).unwrap();
        let mut bob = KeyExchange::new(&g, bob_party).unwrap();
        alice.send_public_key_to(&mut bob).unwrap();
        bob.send_public_key_to(&mut alice).unwrap();
        let comparison = alice.check_equality(&bob).unwrap();
        assert!(comparison.equal);
        let shared = alice.shared().unwrap();
        let digits = std::cmp::min(
            shared.x().unwrap().to_string().len(),
            shared.y().unwrap().to_string().len(),
        );
        assert_eq!(comparison.equal_digits, digits);
        assert_eq!(shared.secret(), bob.shared().unwrap().secret());
    }

    #[test]
    fn leading_digits() {
        assert_eq!(equal_leading_digits("12345", "12399"), 3);
        assert_eq!(equal_leading_digits("1", "12"), 1);
        assert_eq!(equal_leading_digits("", "12"), 0);
    }
}
