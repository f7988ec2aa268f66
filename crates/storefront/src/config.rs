//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `TECHSPHERE_CATALOG_URL` - Product listing endpoint (default: `http://localhost:5000/api/products`)
//! - `TECHSPHERE_DATA_DIR` - Directory holding the durable cart and wishlist slots (default: `.techsphere`)
//! - `TECHSPHERE_FALLBACK_DELAY_MS` - Simulated delay before serving the embedded catalog (default: 800)
//! - `TECHSPHERE_CATALOG_CACHE_TTL_SECS` - Product list cache TTL (default: 300)
//! - `TECHSPHERE_DISCOUNT_THRESHOLD` - Subtotal the cart must exceed for the discount (default: 5000)
//! - `TECHSPHERE_DISCOUNT_AMOUNT` - Flat cart discount (default: 300)
//! - `GEMINI_API_KEY` - Gemini API key; the assistant answers with its fallback message when unset
//! - `GEMINI_MODEL` - Gemini model name (default: `gemini-3-flash-preview`)
//! - `GEMINI_API_BASE` - Gemini API base URL (default: `https://generativelanguage.googleapis.com`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use crate::cart::{DISCOUNT_AMOUNT, DISCOUNT_THRESHOLD, DiscountRule};

const DEFAULT_CATALOG_URL: &str = "http://localhost:5000/api/products";
const DEFAULT_DATA_DIR: &str = ".techsphere";
const DEFAULT_FALLBACK_DELAY_MS: &str = "800";
const DEFAULT_CACHE_TTL_SECS: &str = "300";
const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Remote catalog configuration
    pub catalog: CatalogConfig,
    /// Directory holding durable key-value slots
    pub data_dir: PathBuf,
    /// Cart discount rule
    pub discount: DiscountRule,
    /// Chat assistant configuration
    pub assistant: AssistantConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Remote catalog configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Product listing endpoint; single products live at `{base_url}/{id}`
    pub base_url: Url,
    /// Delay applied before serving the embedded dataset
    pub fallback_delay: Duration,
    /// TTL of the cached product list
    pub cache_ttl: Duration,
}

/// Chat assistant (Gemini) configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct AssistantConfig {
    /// API key; `None` disables remote calls
    pub api_key: Option<SecretString>,
    /// Model name
    pub model: String,
    /// API base URL
    pub api_base: Url,
}

impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("api_base", &self.api_base.as_str())
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or if the API key fails
    /// validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let catalog = CatalogConfig {
            base_url: env.url_or_default("TECHSPHERE_CATALOG_URL", DEFAULT_CATALOG_URL)?,
            fallback_delay: Duration::from_millis(
                env.parse_or_default("TECHSPHERE_FALLBACK_DELAY_MS", DEFAULT_FALLBACK_DELAY_MS)?,
            ),
            cache_ttl: Duration::from_secs(
                env.parse_or_default("TECHSPHERE_CATALOG_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
            ),
        };

        let data_dir = PathBuf::from(env.get_or_default("TECHSPHERE_DATA_DIR", DEFAULT_DATA_DIR));

        let discount = DiscountRule {
            threshold: env.amount_or_default("TECHSPHERE_DISCOUNT_THRESHOLD", DISCOUNT_THRESHOLD)?,
            amount: env.amount_or_default("TECHSPHERE_DISCOUNT_AMOUNT", DISCOUNT_AMOUNT)?,
        };

        let assistant = AssistantConfig {
            api_key: env.optional_validated_secret("GEMINI_API_KEY")?,
            model: env.get_or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            api_base: env.url_or_default("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE)?,
        };

        Ok(Self {
            catalog,
            data_dir,
            discount,
            assistant,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Environment lookup wrapper; empty values count as unset.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_or_default<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    fn amount_or_default(&self, key: &str, default: Decimal) -> Result<Decimal, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(default);
        };
        let amount = raw
            .trim()
            .parse::<Decimal>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if amount.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("amount cannot be negative (got {amount})"),
            ));
        }
        Ok(amount)
    }

    fn url_or_default(&self, key: &str, default: &str) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.get_or_default(key, default))
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(url)
    }

    fn optional_validated_secret(&self, key: &str) -> Result<Option<SecretString>, ConfigError> {
        self.optional(key)
            .map(|value| {
                validate_secret_strength(&value, key)?;
                Ok(SecretString::from(value))
            })
            .transpose()
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API keys are random
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

impl AssistantConfig {
    /// Expose the API key, if configured.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(ExposeSecret::expose_secret)
    }
}
