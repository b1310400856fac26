//! Slash-delimited repository paths.
//!
//! Paths are stored normalized (leading `/`, no trailing `/`, no empty
//! segments) so that ancestry can be decided segment by segment instead of
//! with substring arithmetic.

use std::fmt;
use std::str::FromStr;

use compact_str::CompactString;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PathError;

/// Separator between path segments.
pub const SEPARATOR: char = '/';

/// An absolute, normalized location in the content repository.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FolderPath(CompactString);

impl FolderPath {
    /// The repository root, `/`.
    pub fn root() -> Self {
        Self(CompactString::new("/"))
    }

    /// Parse and normalize an absolute path.
    ///
    /// Repeated and trailing separators are collapsed. Relative input,
    /// empty input and `.`/`..` segments are rejected.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        if input.is_empty() {
            return Err(PathError::Empty);
        }
        if !input.starts_with(SEPARATOR) {
            return Err(PathError::Relative {
                path: input.to_string(),
            });
        }

        let mut normalized = CompactString::default();
        for segment in input.split(SEPARATOR).filter(|s| !s.is_empty()) {
            check_segment(segment).map_err(|_| PathError::InvalidSegment {
                path: input.to_string(),
                segment: segment.to_string(),
            })?;
            normalized.push(SEPARATOR);
            normalized.push_str(segment);
        }

        if normalized.is_empty() {
            normalized.push(SEPARATOR);
        }
        Ok(Self(normalized))
    }

    /// Build a path from already-split segments.
    pub fn from_segments<'a, I>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        segments
            .into_iter()
            .try_fold(Self::root(), |path, segment| path.join(segment))
    }

    /// The path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this is the repository root.
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Iterate over the segments, outermost first. The root has none.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Last segment, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Immediate parent, or `None` for the root.
    pub fn parent(&self) -> Option<FolderPath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind(SEPARATOR) {
            Some(0) | None => Some(Self::root()),
            Some(idx) => Some(Self(CompactString::new(&self.0[..idx]))),
        }
    }

    /// Append a single segment.
    pub fn join(&self, segment: &str) -> Result<FolderPath, PathError> {
        check_segment(segment)?;
        Ok(self.push_segment(segment))
    }

    /// Append a segment taken from another valid path.
    pub(crate) fn push_segment(&self, segment: &str) -> FolderPath {
        let mut joined = self.0.clone();
        if !self.is_root() {
            joined.push(SEPARATOR);
        }
        joined.push_str(segment);
        Self(joined)
    }

    /// Segments of `other` below `self`.
    ///
    /// Returns `None` when `other` is not `self` or one of its descendants,
    /// and an empty vector when both are equal.
    pub fn relative_segments<'a>(&self, other: &'a FolderPath) -> Option<Vec<&'a str>> {
        let mut theirs = other.segments();
        for ours in self.segments() {
            if theirs.next()? != ours {
                return None;
            }
        }
        Some(theirs.collect())
    }

    /// Check if `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &FolderPath) -> bool {
        self.relative_segments(other)
            .is_some_and(|rest| !rest.is_empty())
    }

    /// The ancestor of `descendant` that is an immediate child of `self`.
    ///
    /// `None` unless `descendant` lies strictly below `self`.
    pub fn child_toward(&self, descendant: &FolderPath) -> Option<FolderPath> {
        let rest = self.relative_segments(descendant)?;
        rest.first().map(|first| self.push_segment(first))
    }
}

fn check_segment(segment: &str) -> Result<(), PathError> {
    if segment.is_empty() || segment == "." || segment == ".." || segment.contains(SEPARATOR) {
        return Err(PathError::InvalidName {
            name: segment.to_string(),
        });
    }
    Ok(())
}

impl Default for FolderPath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FolderPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for FolderPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for FolderPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FolderPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
