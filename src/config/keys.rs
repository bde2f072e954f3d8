//! Well-known property keys and their defaults
//!
//! These keys are read from the store itself, so they can be set in any
//! document or programmatically like ordinary properties.

/// Comma-separated regular expressions; matching key names are redacted in dumps
pub const SENSITIVE_CONFIG_KEYS: &str = "strata.security.sensitive-config-keys";

/// Patterns used when [`SENSITIVE_CONFIG_KEYS`] is unset
pub const SENSITIVE_CONFIG_KEYS_DEFAULT: &str = "secret$,password$,ssl.keystore.pass$,\
credential$,oauth.*token$,strata.security.sensitive-config-keys";

/// Replacement text for redacted values
pub const REDACTED_TEXT: &str = "<redacted>";

/// Comma-separated credential provider URIs consulted by `get_password`
pub const CREDENTIAL_PROVIDER_PATH: &str = "strata.security.credential.provider.path";

/// Whether `get_password` may fall back to the plain property value
pub const CREDENTIAL_CLEAR_TEXT_FALLBACK: &str =
    "strata.security.credential.clear-text-fallback";

/// Default resource loaded first by stores created with defaults
pub const DEFAULT_RESOURCE: &str = "strata-default.xml";

/// Site resource loaded after [`DEFAULT_RESOURCE`]
pub const SITE_RESOURCE: &str = "strata-site.xml";

/// Prefix that forces a substitution lookup into the process environment
pub const ENV_LOOKUP_PREFIX: &str = "env.";
