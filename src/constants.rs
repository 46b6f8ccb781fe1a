//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// User-Agent sent with every request unless the user overrides it
pub const DEFAULT_UA: &str = concat!("HTTPie/", env!("CARGO_PKG_VERSION"));

/// Separator for `key:value` items (headers, auth, proxies)
pub const SEP_COMMON: char = ':';

/// Separator for `key=value` data items
pub const SEP_DATA: char = '=';

/// Content type assigned for form-encoded bodies
pub const TYPE_FORM: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Content type assigned for JSON bodies
pub const TYPE_JSON: &str = "application/json; charset=utf-8";

/// Scheme prepended to URLs given without one
pub const DEFAULT_SCHEME: &str = "http://";

/// Environment variable holding the log level
pub const LOG_ENV: &str = "HTTPIE_LOG";

/// Directory (under the home directory) holding the optional config file
pub const CONFIG_DIR: &str = ".httpie";

/// Config file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.yaml";
