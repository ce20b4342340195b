#![forbid(unsafe_code)]

//! Environment-driven configuration for the wrap cache.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `UNBLESSED_WRAP_CACHE_CAPACITY` | Maximum entries in the default cache (positive integer) |

use tracing::warn;

use crate::error::TextError;

/// Environment variable holding the default cache capacity.
pub const ENV_WRAP_CACHE_CAPACITY: &str = "UNBLESSED_WRAP_CACHE_CAPACITY";

/// Default maximum number of cached wrap results.
pub const DEFAULT_WRAP_CACHE_CAPACITY: usize = 1000;

/// Settings for a [`WrapCache`](crate::wrap_cache::WrapCache).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapCacheConfig {
    /// Maximum number of entries. Zero is clamped to one by the cache.
    pub capacity: usize,
}

impl Default for WrapCacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_WRAP_CACHE_CAPACITY,
        }
    }
}

impl WrapCacheConfig {
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Read the process environment, ignoring malformed values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an injectable lookup.
    ///
    /// Malformed values are logged and replaced by the default.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match Self::try_from_env_with(get_env) {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "ignoring wrap cache configuration");
                Self::default()
            }
        }
    }

    /// Strict variant of [`from_env_with`](Self::from_env_with).
    pub fn try_from_env_with<F>(get_env: F) -> Result<Self, TextError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = get_env(ENV_WRAP_CACHE_CAPACITY) {
            config.capacity = parse_capacity(&value).ok_or_else(|| TextError::InvalidConfig {
                key: ENV_WRAP_CACHE_CAPACITY.to_string(),
                value: value.clone(),
            })?;
        }
        Ok(config)
    }
}

fn parse_capacity(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn map_env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn get_env<'a>(map: &'a HashMap<String, String>) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| map.get(key).cloned()
    }

    #[test]
    fn absent_variable_uses_default() {
        let env = map_env(&[]);
        let config = WrapCacheConfig::from_env_with(get_env(&env));
        assert_eq!(config.capacity, DEFAULT_WRAP_CACHE_CAPACITY);
    }

    #[test]
    fn capacity_from_env() {
        let env = map_env(&[(ENV_WRAP_CACHE_CAPACITY, " 250 ")]);
        assert_eq!(WrapCacheConfig::from_env_with(get_env(&env)).capacity, 250);
    }

    #[test]
    fn malformed_value_is_an_error_when_strict() {
        let env = map_env(&[(ENV_WRAP_CACHE_CAPACITY, "lots")]);
        let err = WrapCacheConfig::try_from_env_with(get_env(&env)).unwrap_err();
        assert_eq!(
            err,
            TextError::InvalidConfig {
                key: ENV_WRAP_CACHE_CAPACITY.into(),
                value: "lots".into(),
            }
        );
    }

    #[test]
    fn zero_is_rejected() {
        let env = map_env(&[(ENV_WRAP_CACHE_CAPACITY, "0")]);
        assert!(WrapCacheConfig::try_from_env_with(get_env(&env)).is_err());
        assert_eq!(
            WrapCacheConfig::from_env_with(get_env(&env)),
            WrapCacheConfig::default()
        );
    }
}
