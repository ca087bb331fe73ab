//! Redaction helpers for engine command lines and capability values.
//! Provides the `CommandArg` wrapper used when logging engine invocations.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArg(String);
impl CommandArg {
    #[must_use]
    pub const fn new(arg: String) -> Self {
        Self(arg)
    }
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

const REDACTED: &str = "***REDACTED***";

/// Return `true` when `key` names a credential-like value.
///
/// Matching is case-insensitive and also catches compound keys such as
/// `db_password` or `api-token`.
#[must_use]
pub fn is_sensitive_key(key: &str) -> bool {
    const SENSITIVE_KEYS: [&str; 7] = [
        "password",
        "token",
        "secret",
        "api_key",
        "apikey",
        "auth",
        "authorization",
    ];
    let lower = key.trim().to_ascii_lowercase();
    SENSITIVE_KEYS
        .iter()
        .any(|candidate| lower == *candidate || lower.contains(candidate))
}

/// Check if `arg` is a `key=value` pair whose key is sensitive.
#[must_use]
pub fn contains_sensitive_keyword(arg: &CommandArg) -> bool {
    arg.as_str()
        .split_once('=')
        .is_some_and(|(key, _)| is_sensitive_key(key.trim_start_matches('-')))
}

/// Redact the value of a sensitive `key=value` argument, preserving the key.
#[must_use]
pub fn redact_argument(arg: &CommandArg) -> CommandArg {
    if !contains_sensitive_keyword(arg) {
        return arg.clone();
    }
    let redacted = arg.as_str().split_once('=').map_or_else(
        || REDACTED.to_owned(),
        |(key, _)| format!("{key}={REDACTED}"),
    );
    CommandArg::new(redacted)
}

/// Redact sensitive information from all `args`.
#[must_use]
pub fn redact_sensitive_args(args: &[CommandArg]) -> Vec<CommandArg> {
    args.iter().map(redact_argument).collect()
}

/// Render a capability value for logs, hiding credential-like values.
#[must_use]
pub fn redact_capability<'a>(key: &str, value: &'a str) -> &'a str {
    if is_sensitive_key(key) { REDACTED } else { value }
}
