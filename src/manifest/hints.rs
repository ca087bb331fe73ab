//! Suggestions attached to common YAML mistakes, keyed by a lower-case
//! fragment of the parser message.

pub(crate) const YAML_HINTS: [(&str, &str); 5] = [
    (
        "did not find expected '-'",
        "List entries under `entry_points` and `features` each start with '-'.",
    ),
    (
        "expected ':'",
        "Follow every key with ':' before its value.",
    ),
    (
        "mapping values are not allowed",
        "Quote values that contain ':' such as URLs in `capabilities`.",
    ),
    (
        "found character that cannot start any token",
        "Remove stray characters and indent with spaces only.",
    ),
    (
        "unknown escape character",
        "Use single quotes for Windows paths or escape the backslash.",
    ),
];
