use crate::Error;
use ecliptic_math::{Curve, CurveForm};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};

use std::sync::Arc;

pub const DEFAULT_KEY_BIT_LENGTH: u64 = 200;
pub const DEFAULT_MODULUS: u32 = 23;

/// Prefix of the environment variables read by [`Parameters::from_env`].
pub const ENV_PREFIX: &str = "ECLIPTIC";

/// Key generation and curve construction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    key_bit_length: u64,
    modulus: BigUint,
}

/// Loader view of [`Parameters`], the modulus is a decimal string since it
/// may not fit any primitive integer.
#[derive(Deserialize)]
struct RawParameters {
    key_bit_length: Option<u64>,
    modulus: Option<String>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            key_bit_length: DEFAULT_KEY_BIT_LENGTH,
            modulus: BigUint::from(DEFAULT_MODULUS),
        }
    }
}

impl Parameters {
    pub fn new(key_bit_length: u64) -> Result<Self, Error> {
        if key_bit_length == 0 {
            return Err(Error::InvalidParameters(
                "key bit length must be positive".to_string(),
            ));
        }
        Ok(Self {
            key_bit_length,
            ..Self::default()
        })
    }

    pub fn with_modulus(self, modulus: impl Into<BigUint>) -> Self {
        Self {
            modulus: modulus.into(),
            ..self
        }
    }

    pub fn key_bit_length(&self) -> u64 {
        self.key_bit_length
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// A curve over the configured modulus.
    pub fn curve(
        &self,
        form: CurveForm,
        a: impl Into<BigInt>,
        b: impl Into<BigInt>,
    ) -> Result<Arc<Curve>, Error> {
        Ok(Curve::new(form, a, b, self.modulus.clone())?)
    }

    /// Reads `ECLIPTIC_KEY_BIT_LENGTH` and `ECLIPTIC_MODULUS`, falling back
    /// to the defaults for unset variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::load(Config::builder().add_source(Environment::with_prefix(ENV_PREFIX)))
    }

    /// Reads `key_bit_length` and `modulus` from a TOML document.
    pub fn from_toml(document: &str) -> Result<Self, Error> {
        Self::load(Config::builder().add_source(File::from_str(document, FileFormat::Toml)))
    }

    fn load(builder: ConfigBuilder<DefaultState>) -> Result<Self, Error> {
        let raw: RawParameters = builder.build()?.try_deserialize()?;
        let mut parameters = match raw.key_bit_length {
            Some(bits) => Self::new(bits)?,
            None => Self::default(),
        };
        if let Some(modulus) = raw.modulus {
            let modulus = BigUint::parse_bytes(modulus.trim().as_bytes(), 10).ok_or_else(|| {
                Error::InvalidParameters(format!("modulus {:?} is not decimal", modulus))
            })?;
            parameters = parameters.with_modulus(modulus);
        }
        Ok(parameters)
    }
}
