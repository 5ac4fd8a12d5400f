use crate::error::{BloomError, BloomResult};
use crate::hash::{HashFunction, default_hash_function};
use derive_builder::Builder;

/// Target false positive rate used when the caller does not pick one.
pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 1e-7;

/// Configuration of a [`crate::Filter`]
#[derive(Clone, Debug, Builder)]
#[builder(pattern = "owned")]
pub struct FilterConfig {
    /// Expected number of elements
    #[builder(default = "1_000_000")]
    pub capacity: usize,

    /// Target false positive rate (0.0 to 1.0, exclusive)
    #[builder(default = "DEFAULT_FALSE_POSITIVE_RATE")]
    pub false_positive_rate: f64,

    /// Seeded hash function the hash family is built from
    #[builder(default = "default_hash_function")]
    pub hash_function: HashFunction,
}

impl FilterConfig {
    pub fn validate(&self) -> BloomResult<()> {
        if self.capacity == 0 {
            return Err(BloomError::InvalidConfig(
                "Capacity must be > 0".into(),
            ));
        }
        if !(self.false_positive_rate > 0.0 && self.false_positive_rate < 1.0) {
            return Err(BloomError::InvalidConfig(
                "FPR must be between 0 and 1".into(),
            ));
        }
        Ok(())
    }
}

/// Settings of the `bloomguard` binary, read from the environment.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, PartialEq)]
pub struct GuardConfig {
    pub false_positive_rate: f64,
    pub delimiter: char,
}

#[cfg(feature = "cli")]
impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            false_positive_rate: DEFAULT_FALSE_POSITIVE_RATE,
            delimiter: ',',
        }
    }
}

#[cfg(feature = "cli")]
impl GuardConfig {
    pub const FPR_VAR: &'static str = "BLOOMGUARD_FPR";
    pub const DELIMITER_VAR: &'static str = "BLOOMGUARD_DELIMITER";

    /// Loads `.env` if present, then reads `BLOOMGUARD_FPR` and
    /// `BLOOMGUARD_DELIMITER`. Unset variables keep their defaults.
    pub fn from_env() -> BloomResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> BloomResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(Self::FPR_VAR) {
            config.false_positive_rate =
                value.trim().parse().map_err(|e: std::num::ParseFloatError| {
                    BloomError::EnvParseError {
                        var_name: Self::FPR_VAR.to_string(),
                        value: value.clone(),
                        error: e.to_string(),
                    }
                })?;
        }

        if let Some(value) = lookup(Self::DELIMITER_VAR) {
            let mut chars = value.chars();
            config.delimiter = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(BloomError::EnvParseError {
                        var_name: Self::DELIMITER_VAR.to_string(),
                        value,
                        error: "expected a single character".to_string(),
                    });
                }
            };
        }

        Ok(config)
    }
}
