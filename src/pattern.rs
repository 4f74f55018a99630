//! Regex-driven discovery of many locations inside one JSON document.
//!
//! A [`PathPattern`] is a list of regular expressions, one per nesting level.
//! Object keys are tested with a search (a partial match inside the key is
//! enough). Lists can only be crossed with the literal [`LIST_WILDCARD`]
//! segment, which visits every element under its `item_<N>` label.
//!
//! Each successful full-depth traversal yields a [`Match`]; destination paths
//! are then produced from templates with [`render_path`], where `<match_i_j>`
//! stands for capture `j` (0 is the whole match) of level `i`.

use crate::error::{MigrationError, Result};
use crate::path::index_token;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// The only pattern segment allowed to step into a JSON list.
pub const LIST_WILDCARD: &str = "item_*";

static CAPTURE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<match_(\d+)_(\d+)>").expect("capture reference pattern is valid"));

/// One level of a [`Match`]: the label that matched and what the regex captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedSegment {
    label: String,
    captures: Vec<String>,
}

impl MatchedSegment {
    /// The object key or `item_<N>` token this level matched.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Capture groups, excluding the whole match. Groups that did not take part
    /// in the match are empty strings.
    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.captures[1..]
    }

    /// Capture `index`, where 0 is the whole match.
    #[must_use]
    pub fn capture(&self, index: usize) -> Option<&str> {
        self.captures.get(index).map(String::as_str)
    }
}

/// One concrete location found by a [`PathPattern`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Match {
    levels: Vec<MatchedSegment>,
}

impl Match {
    #[must_use]
    pub fn levels(&self) -> &[MatchedSegment] {
        &self.levels
    }

    /// The concrete path the match walked.
    #[must_use]
    pub fn path(&self) -> Vec<String> {
        self.levels.iter().map(|l| l.label.clone()).collect()
    }

    /// Capture `group` of level `level`; group 0 is the whole match.
    #[must_use]
    pub fn capture(&self, level: usize, group: usize) -> Option<&str> {
        self.levels.get(level)?.capture(group)
    }
}

/// A compiled list of per-level regular expressions.
#[derive(Debug, Clone)]
pub struct PathPattern {
    segments: Vec<String>,
    regexes: Vec<Regex>,
}

impl PathPattern {
    /// Compiles every segment.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::InvalidPattern`] for the first segment that is
    /// not a valid regular expression.
    pub fn new(segments: Vec<String>) -> Result<Self> {
        let regexes = segments
            .iter()
            .map(|segment| {
                Regex::new(segment).map_err(|source| MigrationError::InvalidPattern {
                    pattern: segment.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { segments, regexes })
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Enumerates every location of `value` matching the pattern, depth-first in
    /// document order. An empty pattern yields a single empty match; a pattern
    /// that matches nothing yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::InvalidRegexTarget`] when a segment other than
    /// [`LIST_WILDCARD`] reaches a list.
    pub fn find(&self, value: &Value) -> Result<Vec<Match>> {
        let mut found = Vec::new();
        let mut walked = Vec::with_capacity(self.regexes.len());
        self.descend(value, 0, &mut walked, &mut found)?;
        Ok(found)
    }

    fn descend(
        &self,
        value: &Value,
        depth: usize,
        walked: &mut Vec<MatchedSegment>,
        found: &mut Vec<Match>,
    ) -> Result<()> {
        let Some(regex) = self.regexes.get(depth) else {
            found.push(Match {
                levels: walked.clone(),
            });
            return Ok(());
        };

        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let Some(caps) = regex.captures(key) else {
                        continue;
                    };
                    let captures = caps
                        .iter()
                        .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
                        .collect();
                    walked.push(MatchedSegment {
                        label: key.clone(),
                        captures,
                    });
                    self.descend(child, depth + 1, walked, found)?;
                    walked.pop();
                }
            }
            Value::Array(list) => {
                if self.segments[depth] != LIST_WILDCARD {
                    return Err(MigrationError::InvalidRegexTarget {
                        pattern: self.segments[depth].clone(),
                    });
                }
                for (index, child) in list.iter().enumerate() {
                    let label = index_token(index);
                    walked.push(MatchedSegment {
                        captures: vec![label.clone()],
                        label,
                    });
                    self.descend(child, depth + 1, walked, found)?;
                    walked.pop();
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Compiles `segments` and runs them against `value`.
///
/// # Errors
///
/// See [`PathPattern::new`] and [`PathPattern::find`].
pub fn match_pattern(value: &Value, segments: &[String]) -> Result<Vec<Match>> {
    PathPattern::new(segments.to_vec())?.find(value)
}

/// Substitutes every `<match_i_j>` placeholder in `template` with the
/// corresponding capture of `found`. Segments without placeholders pass
/// through unchanged.
///
/// # Errors
///
/// Returns [`MigrationError::InvalidCaptureReference`] if a placeholder names a
/// level or group the match does not have.
pub fn render_path(template: &[String], found: &Match) -> Result<Vec<String>> {
    template
        .iter()
        .map(|segment| render_segment(segment, found))
        .collect()
}

fn render_segment(segment: &str, found: &Match) -> Result<String> {
    let mut rendered = String::with_capacity(segment.len());
    let mut last = 0;

    for caps in CAPTURE_REFERENCE.captures_iter(segment) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let invalid = || MigrationError::InvalidCaptureReference {
            reference: whole.as_str().to_string(),
        };
        let level = caps[1].parse::<usize>().map_err(|_| invalid())?;
        let group = caps[2].parse::<usize>().map_err(|_| invalid())?;
        let value = found.capture(level, group).ok_or_else(invalid)?;

        rendered.push_str(&segment[last..whole.start()]);
        rendered.push_str(value);
        last = whole.end();
    }
    rendered.push_str(&segment[last..]);
    Ok(rendered)
}
