//! YAML parse diagnostics.
//!
//! Turns `serde_saphyr` errors into [`miette`] reports that underline the
//! character the parser stopped at and, where a manifest mistake is
//! recognisable, suggest a fix.

#![allow(clippy::allow_attributes, clippy::allow_attributes_without_reason)]

use super::{ManifestName, ManifestSource};
use crate::manifest::hints::YAML_HINTS;
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_saphyr::Error as YamlError;
use thiserror::Error;

const TAB_ADVICE: &str = "Use spaces for indentation; tabs are invalid in YAML.";

/// One line of the manifest, without its terminator, and where it starts.
#[derive(Debug, Clone, Copy)]
struct SourceLine<'src> {
    start: usize,
    text: &'src str,
}

impl<'src> SourceLine<'src> {
    /// Find the one-based `line` of `src`; `None` past the last line.
    fn nth(src: &'src str, line: u64) -> Option<Self> {
        let skip = usize::try_from(line.checked_sub(1)?).ok()?;
        let start = std::iter::once(0)
            .chain(src.match_indices('\n').map(|(at, _)| at + 1))
            .nth(skip)?;
        let rest = src.get(start..)?;
        let text = rest.split('\n').next().unwrap_or(rest);
        Some(Self {
            start,
            text: text.strip_suffix('\r').unwrap_or(text),
        })
    }

    /// Byte offset in the whole source of the one-based character `column`,
    /// clamped to the end of the line.
    fn offset(self, column: u64) -> usize {
        let skip = usize::try_from(column.saturating_sub(1)).unwrap_or(usize::MAX);
        let within = self
            .text
            .char_indices()
            .nth(skip)
            .map_or(self.text.len(), |(at, _)| at);
        self.start + within
    }

    fn indented_with_tab(self) -> bool {
        self.text
            .chars()
            .take_while(|c| c.is_whitespace())
            .any(|c| c == '\t')
    }
}

/// Byte offset of a one-based `line`/`column` pair; lines past the end map
/// to the end of the source.
fn offset_of(src: &str, line: u64, column: u64) -> usize {
    SourceLine::nth(src, line).map_or(src.len(), |found| found.offset(column))
}

/// Span covering the character at `line`/`column`. At a line end the span
/// falls back to the last character of the line, or is empty on a blank one.
fn span_at(src: &str, line: u64, column: u64) -> SourceSpan {
    let at = offset_of(src, line, column);
    let tail = src.get(at..).unwrap_or_default();
    let (start, len) = match tail.chars().next() {
        Some(ch) if ch != '\n' && ch != '\r' => (at, ch.len_utf8()),
        _ => src
            .get(..at)
            .and_then(|head| head.chars().next_back())
            .filter(|ch| *ch != '\n' && *ch != '\r')
            .map_or((at, 0), |ch| (at - ch.len_utf8(), ch.len_utf8())),
    };
    SourceSpan::new(start.into(), len)
}

fn advice(summary: &str, src: &str, line: Option<u64>) -> Option<String> {
    let tabbed = line
        .and_then(|number| SourceLine::nth(src, number))
        .is_some_and(SourceLine::indented_with_tab);
    if tabbed {
        return Some(TAB_ADVICE.to_owned());
    }
    let lower = summary.to_lowercase();
    YAML_HINTS
        .iter()
        .find_map(|(fragment, hint)| lower.contains(fragment).then(|| (*hint).to_owned()))
}

// FIXME: drop once the derive false positive is fixed upstream.
#[allow(unused_assignments)]
#[derive(Debug, Error, Diagnostic)]
#[error("YAML parse error at line {line}, column {column}: {summary}")]
#[diagnostic(code(kensa::yaml::parse))]
struct YamlSyntaxError {
    #[source_code]
    manifest: NamedSource<String>,
    #[label("parse error here")]
    at: Option<SourceSpan>,
    #[help]
    advice: Option<String>,
    #[source]
    cause: YamlError,
    line: u64,
    column: u64,
    summary: String,
}

/// Map a `serde_saphyr` parse error into a [`miette`] diagnostic labelled
/// with `name`, pointing at the reported location when there is one.
///
/// Errors without a location are reported at line 1, column 1 and carry no
/// label.
#[must_use]
pub fn map_yaml_error(
    err: YamlError,
    src: &ManifestSource,
    name: &ManifestName,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    let text = src.as_str();
    let position = err
        .location()
        .map(|loc| (loc.line(), loc.column()))
        .filter(|(line, _)| *line > 0);
    let summary = err.to_string();
    let (line, column) = position.unwrap_or((1, 1));

    Box::new(YamlSyntaxError {
        manifest: NamedSource::new(name.as_str(), text.to_owned()),
        at: position.map(|(l, c)| span_at(text, l, c)),
        advice: advice(&summary, text, position.map(|(l, _)| l)),
        cause: err,
        line,
        column,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow, ensure};
    use rstest::rstest;

    fn parse_failure(src: &ManifestSource) -> Result<Box<dyn Diagnostic + Send + Sync>> {
        let Err(err) = serde_saphyr::from_str::<serde_json::Value>(src.as_str()) else {
            return Err(anyhow!("expected YAML parse error"));
        };
        Ok(map_yaml_error(err, src, &ManifestName::from("kensa.yml")))
    }

    #[test]
    fn tab_indentation_gets_a_hint() -> Result<()> {
        let diag = parse_failure(&ManifestSource::from("\tkey: \"unterminated"))?;
        let help = diag.help().map(|h| h.to_string()).unwrap_or_default();
        ensure!(help.contains("Use spaces for indentation"), "help: {help}");
        Ok(())
    }

    #[test]
    fn report_names_the_manifest_and_position() -> Result<()> {
        let diag = parse_failure(&ManifestSource::from("entry_points:\n  - name: [a\n"))?;
        let code = diag.code().map(|c| c.to_string()).unwrap_or_default();
        ensure!(code == "kensa::yaml::parse", "code: {code}");
        ensure!(diag.to_string().starts_with("YAML parse error at line "), "{diag}");
        Ok(())
    }

    #[test]
    fn missing_location_defaults_to_origin() -> Result<()> {
        let src = ManifestSource::from("entry_points: [1");
        let err = serde_saphyr::Error::Eof {
            location: serde_saphyr::Location::UNKNOWN,
        };
        let diag = map_yaml_error(err, &src, &ManifestName::from("kensa.yml"));
        ensure!(diag.to_string().contains("line 1, column 1"), "{diag}");
        Ok(())
    }

    #[rstest]
    #[case("short", 1, 42, 5)]
    #[case("one\ntwo\nthree", 3, 3, 10)]
    #[case("one\r\ntwo\r\nthree", 2, 2, 6)]
    #[case("caf\u{e9}: x", 1, 5, 5)]
    #[case("one\ntwo", 7, 1, 7)]
    fn offset_walks_lines_and_chars(
        #[case] src: &str,
        #[case] line: u64,
        #[case] column: u64,
        #[case] expected: usize,
    ) {
        assert_eq!(offset_of(src, line, column), expected);
    }

    #[rstest]
    #[case("key: [", 1, 6, 5, 1)]
    #[case("na\u{ef}ve: x", 1, 3, 2, 2)]
    #[case("abc\n\nd", 2, 1, 4, 0)]
    #[case("abc\r\n", 1, 4, 2, 1)]
    fn span_covers_one_character(
        #[case] src: &str,
        #[case] line: u64,
        #[case] column: u64,
        #[case] start: usize,
        #[case] len: usize,
    ) {
        let span = span_at(src, line, column);
        assert_eq!((span.offset(), span.len()), (start, len));
    }
}
