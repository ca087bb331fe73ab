#![forbid(unsafe_code)]

//! Environment variable names shared by the kensa library, its engine
//! processes, and the test helpers that impersonate those processes.

/// Environment variable override for the feature engine executable.
///
/// # Examples
///
/// ```
/// use kensa_env::ENGINE_ENV;
/// assert_eq!(ENGINE_ENV, "KENSA_ENGINE");
/// ```
pub const ENGINE_ENV: &str = "KENSA_ENGINE";

/// Variable exported to engine processes naming the entry point being run.
///
/// Engines use it as the glue identity when locating step definitions.
pub const ENTRY_POINT_ENV: &str = "KENSA_ENTRY_POINT";

/// Prefix of the variables carrying capability values to engine processes.
///
/// A capability `browser` is exported as `KENSA_CAPABILITY_BROWSER`.
pub const CAPABILITY_ENV_PREFIX: &str = "KENSA_CAPABILITY_";

/// Build the environment variable name carrying capability `key`.
///
/// Keys are upper-cased and any character outside `[A-Za-z0-9_]` becomes `_`.
///
/// # Examples
///
/// ```
/// use kensa_env::capability_var;
/// assert_eq!(capability_var("browser"), "KENSA_CAPABILITY_BROWSER");
/// assert_eq!(capability_var("base-url"), "KENSA_CAPABILITY_BASE_URL");
/// ```
#[must_use]
pub fn capability_var(key: &str) -> String {
    let suffix: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{CAPABILITY_ENV_PREFIX}{suffix}")
}
