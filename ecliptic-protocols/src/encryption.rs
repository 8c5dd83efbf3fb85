use crate::{Error, MessageCodec, Party};
use ecliptic_math::rng::random_nonzero_below;
use ecliptic_math::{GroupElement, Point};

use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};

use std::sync::Arc;

/// One encrypted message point: `c1 = k * G` and `c2 = k * P + m`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiphertextBlock {
    c1: GroupElement,
    c2: GroupElement,
}

impl CiphertextBlock {
    pub fn new(c1: GroupElement, c2: GroupElement) -> Self {
        Self { c1, c2 }
    }

    pub fn c1(&self) -> &GroupElement {
        &self.c1
    }

    pub fn c2(&self) -> &GroupElement {
        &self.c2
    }
}

/// Blocks in message order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ciphertext(Vec<CiphertextBlock>);

impl Ciphertext {
    pub fn new(blocks: Vec<CiphertextBlock>) -> Self {
        Self(blocks)
    }

    pub fn blocks(&self) -> &[CiphertextBlock] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<CiphertextBlock>> for Ciphertext {
    fn from(blocks: Vec<CiphertextBlock>) -> Self {
        Self(blocks)
    }
}

#[derive(Debug, Clone)]
pub struct EncryptionClient {
    generator: GroupElement,
    actor: Party,
    codec: MessageCodec,
}

impl EncryptionClient {
    pub fn new(generator: &GroupElement, actor: Party) -> Result<Self, Error> {
        if actor.generator() != generator {
            return Err(Error::GeneratorMismatch);
        }
        Ok(Self {
            generator: generator.clone(),
            actor,
            codec: MessageCodec::new(generator)?,
        })
    }

    pub fn actor(&self) -> &Party {
        &self.actor
    }

    pub fn codec(&self) -> &MessageCodec {
        &self.codec
    }

    /// Encrypts `message` to the public key of `recipient`.
    pub fn encrypt_to<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        message: &str,
        recipient: &Party,
    ) -> Result<Ciphertext, Error> {
        if !self.actor.shares_generator(recipient) {
            return Err(Error::GeneratorMismatch);
        }
        self.encrypt(rng, message, recipient.public_key())
    }

    /// Encrypts `message` to the key pair derived from `secret_key`.
    pub fn encrypt_with<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        message: &str,
        secret_key: &BigUint,
    ) -> Result<Ciphertext, Error> {
        let public_key = self.generator.multiply(secret_key)?;
        self.encrypt(rng, message, &public_key)
    }

    /// Decrypts a ciphertext addressed to this client's party.
    pub fn decrypt(&self, ciphertext: &Ciphertext) -> Result<String, Error> {
        self.decrypt_points(ciphertext, |c1| self.actor.derive(c1))
    }

    /// Decrypts with an explicit secret key instead of the party's own.
    pub fn decrypt_with(
        &self,
        ciphertext: &Ciphertext,
        secret_key: &BigUint,
    ) -> Result<String, Error> {
        self.decrypt_points(ciphertext, |c1| Ok(c1.multiply(secret_key)?))
    }

    fn encrypt<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        message: &str,
        public_key: &GroupElement,
    ) -> Result<Ciphertext, Error> {
        let order = self.generator.require_order()?;
        let blocks = self
            .codec
            .encode(message)?
            .into_iter()
            .map(|point| -> Result<CiphertextBlock, Error> {
                let message_point = GroupElement::new(Arc::clone(self.generator.curve()), point)?;
                let nonce = random_nonzero_below(rng, order)?;
                let c1 = self.generator.multiply(&nonce)?;
                let c2 = public_key.multiply(&nonce)?.add(&message_point)?;
                Ok(CiphertextBlock { c1, c2 })
            })
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(blocks = blocks.len(), "message encrypted");
        Ok(Ciphertext(blocks))
    }

    fn decrypt_points<F>(&self, ciphertext: &Ciphertext, shared: F) -> Result<String, Error>
    where
        F: Fn(&GroupElement) -> Result<GroupElement, Error>,
    {
        let points = ciphertext
            .blocks()
            .iter()
            .map(|block| -> Result<Point, Error> {
                let mask = shared(&block.c1)?;
                Ok(block.c2.subtract(&mask)?.point().clone())
            })
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(blocks = points.len(), "ciphertext decrypted");
        self.codec.decode(&points)
    }
}
