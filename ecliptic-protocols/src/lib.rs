#![deny(clippy::all)]
#![deny(clippy::dbg_macro)]

pub mod codec;
pub mod encryption;
pub mod exchange;
pub mod parameters;
pub mod party;

pub use codec::MessageCodec;
pub use encryption::{Ciphertext, CiphertextBlock, EncryptionClient};
pub use exchange::{ExchangeState, KeyExchange, SharedKeyComparison};
pub use parameters::Parameters;
pub use party::Party;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("chunk {0} cannot be mapped to a curve point")]
    UnmappableMessage(u32),
    #[error("generator order is too small to carry message bytes")]
    OrderTooSmall,
    #[error("party holds no private key")]
    MissingPrivateKey,
    #[error("private key must be non-zero")]
    InvalidPrivateKey,
    #[error("parties use different generators")]
    GeneratorMismatch,
    #[error("shared key already established")]
    AlreadyEstablished,
    #[error("key exchange has not completed")]
    KeyExchangeIncomplete,
    #[error("invalid message encoding: {0}")]
    InvalidEncoding(String),
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Math(#[from] ecliptic_math::Error),
}
