use crate::{Error, Parameters};
use ecliptic_math::rng::random_bits;
use ecliptic_math::{GroupElement, Signature, MAX_NONCE_ATTEMPTS};

use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};

use std::fmt;

/// A key holder: a public group element and, for local parties, the private
/// scalar it was derived from.
#[derive(Clone)]
pub struct Party {
    private_key: Option<BigUint>,
    generator: GroupElement,
    public_key: GroupElement,
}

impl fmt::Debug for Party {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Party")
            .field("local", &self.is_local())
            .field("generator", &self.generator)
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.private_key {
            Some(private_key) => write!(f, "Private: {}, Public: {}", private_key, self.public_key),
            None => write!(f, "Public: {}", self.public_key),
        }
    }
}

impl Party {
    /// A fresh key pair with a private scalar of the configured bit length.
    pub fn new<R: RngCore + CryptoRng>(
        rng: &mut R,
        generator: &GroupElement,
        parameters: &Parameters,
    ) -> Result<Self, Error> {
        for _ in 0..MAX_NONCE_ATTEMPTS {
            let private_key = random_bits(rng, parameters.key_bit_length());
            let public_key = generator.multiply(&private_key)?;
            // multiples of the generator order give the identity
            if !public_key.is_identity() {
                return Ok(Self {
                    private_key: Some(private_key),
                    generator: generator.clone(),
                    public_key,
                });
            }
        }
        Err(ecliptic_math::Error::NonceExhausted(MAX_NONCE_ATTEMPTS).into())
    }

    pub fn from_private(generator: &GroupElement, private_key: BigUint) -> Result<Self, Error> {
        if private_key.is_zero() {
            return Err(Error::InvalidPrivateKey);
        }
        let public_key = generator.multiply(&private_key)?;
        if public_key.is_identity() {
            return Err(Error::InvalidPrivateKey);
        }
        Ok(Self {
            private_key: Some(private_key),
            generator: generator.clone(),
            public_key,
        })
    }

    /// A counterparty known only by its public key.
    pub fn public_only(generator: &GroupElement, public_key: GroupElement) -> Result<Self, Error> {
        if !generator.same_curve(&public_key) {
            return Err(Error::GeneratorMismatch);
        }
        if public_key.is_identity() {
            return Err(ecliptic_math::Error::InvalidCurvePoint.into());
        }
        Ok(Self {
            private_key: None,
            generator: generator.clone(),
            public_key,
        })
    }

    /// Strips the private key.
    pub fn to_public(&self) -> Self {
        Self {
            private_key: None,
            generator: self.generator.clone(),
            public_key: self.public_key.clone(),
        }
    }

    pub fn is_local(&self) -> bool {
        self.private_key.is_some()
    }

    pub fn generator(&self) -> &GroupElement {
        &self.generator
    }

    pub fn public_key(&self) -> &GroupElement {
        &self.public_key
    }

    pub(crate) fn private_key(&self) -> Result<&BigUint, Error> {
        self.private_key.as_ref().ok_or(Error::MissingPrivateKey)
    }

    /// Whether both parties work over the same generator.
    pub fn shares_generator(&self, other: &Party) -> bool {
        self.generator == other.generator
    }

    /// Multiplies `element` by the private key.
    pub fn derive(&self, element: &GroupElement) -> Result<GroupElement, Error> {
        Ok(element.multiply(self.private_key()?)?)
    }

    pub fn sign_message<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        message: &str,
    ) -> Result<Signature, Error> {
        Ok(self
            .generator
            .sign(rng, message.as_bytes(), self.private_key()?)?)
    }

    /// Checks a signature made by `signer` over `message`.
    pub fn verify_signature(
        &self,
        message: &str,
        signature: &Signature,
        signer: &Party,
    ) -> Result<bool, Error> {
        if !self.shares_generator(signer) {
            return Err(Error::GeneratorMismatch);
        }
        Ok(self
            .generator
            .verify(message.as_bytes(), signature, &signer.public_key)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ecliptic_math::named::secp256k1;
    use ecliptic_math::{Curve, Point};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn toy_generator() -> GroupElement {
        let curve = Curve::weierstrass(0, 7, 199u32).unwrap();
        let point = curve.point(1, 40).unwrap();
        GroupElement::discover(curve, point).unwrap()
    }

    #[test]
    fn fresh_key_pair() {
        let mut rng = StdRng::seed_from_u64(5);
        let g = toy_generator();
        let parameters = Parameters::new(16).unwrap();
        for _ in 0..20 {
            let party = Party::new(&mut rng, &g, &parameters).unwrap();
            assert!(party.is_local());
            assert!(!party.public_key().is_identity());
            let private_key = party.private_key().unwrap();
            assert!(private_key.bits() <= 16);
            assert_eq!(party.public_key(), &g.multiply(private_key).unwrap());
        }
    }

    #[test]
    fn key_generation_gives_up_on_identity_generator() {
        let mut rng = StdRng::seed_from_u64(3);
        let curve = Curve::weierstrass(0, 7, 199u32).unwrap();
        let identity = GroupElement::new(curve, Point::Infinity).unwrap();
        let parameters = Parameters::new(8).unwrap();
        assert!(matches!(
            Party::new(&mut rng, &identity, &parameters),
            Err(Error::Math(ecliptic_math::Error::NonceExhausted(
                MAX_NONCE_ATTEMPTS
            )))
        ));
    }

    #[test]
    fn public_copy_has_no_private_key() {
        let g = toy_generator();
        let party = Party::from_private(&g, BigUint::from(5u32)).unwrap();
        let public = party.to_public();
        assert!(!public.is_local());
        assert_eq!(public.public_key(), party.public_key());
        assert!(matches!(public.private_key(), Err(Error::MissingPrivateKey)));
        assert!(matches!(
            public.derive(&g),
            Err(Error::MissingPrivateKey)
        ));
        assert_eq!(party.to_string(), "Private: 5, Public: (70, 145)");
        assert_eq!(public.to_string(), "Public: (70, 145)");
        assert!(!format!("{:?}", party).contains("Private"));
    }

    #[test]
    fn invalid_keys() {
        let g = toy_generator();
        assert!(matches!(
            Party::from_private(&g, BigUint::zero()),
            Err(Error::InvalidPrivateKey)
        ));
        // the generator order annihilates the generator
        assert!(matches!(
            Party::from_private(&g, BigUint::from(63u32)),
            Err(Error::InvalidPrivateKey)
        ));
        let identity = g.multiply(&BigUint::zero()).unwrap();
        assert!(matches!(
            Party::public_only(&g, identity),
            Err(Error::Math(ecliptic_math::Error::InvalidCurvePoint))
        ));
        let other_curve = Curve::weierstrass(0, 7, 211u32).unwrap();
        let foreign = GroupElement::new(other_curve, Point::Infinity).unwrap();
        assert!(matches!(
            Party::public_only(&g, foreign),
            Err(Error::GeneratorMismatch)
        ));
    }

    #[test]
    fn derive_is_commutative() {
        let g = toy_generator();
        let alice = Party::from_private(&g, BigUint::from(5u32)).unwrap();
        let bob = Party::from_private(&g, BigUint::from(7u32)).unwrap();
        let alice_shared = alice.derive(bob.public_key()).unwrap();
        let bob_shared = bob.derive(alice.public_key()).unwrap();
        assert_eq!(alice_shared, bob_shared);
        assert_eq!(alice_shared, g.multiply(&BigUint::from(35u32)).unwrap());
    }

    #[test]
    fn signatures() {
        let mut rng = StdRng::seed_from_u64(17);
        let g = secp256k1().unwrap();
        let parameters = Parameters::default();
        let signer = Party::new(&mut rng, &g, &parameters).unwrap();
        let verifier = Party::new(&mut rng, &g, &parameters).unwrap();
        let signature = signer.sign_message(&mut rng, "pay bob 10").unwrap();
        assert!(verifier
            .verify_signature("pay bob 10", &signature, &signer.to_public())
            .unwrap());
        assert!(!verifier
            .verify_signature("pay bob 100", &signature, &signer)
            .unwrap());
        assert!(!verifier
            .verify_signature("pay bob 10", &signature, &verifier)
            .unwrap());
        assert!(matches!(
            signer.to_public().sign_message(&mut rng, "nope"),
            Err(Error::MissingPrivateKey)
        ));

        let toy = Party::from_private(&toy_generator(), BigUint::from(3u32)).unwrap();
        assert!(matches!(
            verifier.verify_signature("pay bob 10", &signature, &toy),
            Err(Error::GeneratorMismatch)
        ));
    }
}
