//! Paths addressing locations inside a value tree.
//!
//! The text form is JSON-Pointer-like: `""` is the root, `/todos/0/done`
//! descends through map keys and list indices, `~0`/`~1` escape `~` and
//! `/` inside keys. A token of plain digits parses as an index step;
//! resolution against a map falls back to treating it as a key.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One step along a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// A map key.
    Key(String),
    /// A list index.
    Index(usize),
}

impl Step {
    /// The map-key reading of this step. Index steps read as their
    /// decimal text, which is how pointer syntax addresses numeric keys.
    pub fn as_key(&self) -> String {
        match self {
            Step::Key(k) => k.clone(),
            Step::Index(i) => i.to_string(),
        }
    }

    /// The list-index reading of this step, if it has one.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Step::Key(_) => None,
            Step::Index(i) => Some(*i),
        }
    }
}

impl From<&str> for Step {
    fn from(key: &str) -> Self {
        Step::Key(key.to_string())
    }
}

impl From<usize> for Step {
    fn from(index: usize) -> Self {
        Step::Index(index)
    }
}

/// A path from the root of a value tree to one location inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path(Vec<Step>);

impl Path {
    /// The empty path: the tree root itself.
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a map-key step.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.0.push(Step::Key(key.into()));
        self
    }

    /// Append a list-index step.
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(Step::Index(index));
        self
    }

    pub fn push(&mut self, step: Step) {
        self.0.push(step);
    }

    pub fn pop(&mut self) -> Option<Step> {
        self.0.pop()
    }

    /// Split into parent steps and the final step. `None` at the root.
    pub fn split_last(&self) -> Option<(&[Step], &Step)> {
        self.0.split_last().map(|(last, parent)| (parent, last))
    }

    /// The enclosing path, dropping the final step. `None` at the root.
    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            return None;
        }
        Some(Path(self.0[..self.0.len() - 1].to_vec()))
    }

    /// The path to the first `depth` steps; used for error reporting
    /// partway through a traversal.
    pub fn truncated(&self, depth: usize) -> Path {
        Path(self.0[..depth.min(self.0.len())].to_vec())
    }

    /// Parse from pointer text. Alias for `FromStr`.
    pub fn parse(text: &str) -> Result<Self, PathParseError> {
        text.parse()
    }
}

impl FromIterator<Step> for Path {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.0 {
            match step {
                Step::Key(k) => {
                    let escaped = k.replace('~', "~0").replace('/', "~1");
                    write!(f, "/{escaped}")?;
                }
                Step::Index(i) => write!(f, "/{i}")?,
            }
        }
        Ok(())
    }
}

/// A malformed path pointer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathParseError {
    #[error("path must be empty or start with '/': {0:?}")]
    MissingSlash(String),
    #[error("bad escape {escape:?} in path token {token:?}")]
    BadEscape { token: String, escape: String },
}

impl FromStr for Path {
    type Err = PathParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.is_empty() {
            return Ok(Path::root());
        }
        let Some(body) = text.strip_prefix('/') else {
            return Err(PathParseError::MissingSlash(text.to_string()));
        };
        let mut steps = Vec::new();
        for token in body.split('/') {
            steps.push(parse_token(token)?);
        }
        Ok(Path(steps))
    }
}

fn parse_token(token: &str) -> Result<Step, PathParseError> {
    // Digits-only tokens are index steps. Leading zeros stay keys so
    // that "/01" round-trips through Display.
    let numeric = !token.is_empty()
        && token.bytes().all(|b| b.is_ascii_digit())
        && (token == "0" || !token.starts_with('0'));
    if numeric && let Ok(index) = token.parse::<usize>() {
        return Ok(Step::Index(index));
    }

    let mut key = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            key.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => key.push('~'),
            Some('1') => key.push('/'),
            other => {
                return Err(PathParseError::BadEscape {
                    token: token.to_string(),
                    escape: match other {
                        Some(c) => format!("~{c}"),
                        None => "~".to_string(),
                    },
                });
            }
        }
    }
    Ok(Step::Key(key))
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_empty_text() {
        assert_eq!(Path::root().to_string(), "");
        assert_eq!("".parse::<Path>().unwrap(), Path::root());
    }

    #[test]
    fn parse_mixes_keys_and_indices() {
        let path: Path = "/todos/0/done".parse().unwrap();
        assert_eq!(
            path.steps(),
            &[
                Step::Key("todos".to_string()),
                Step::Index(0),
                Step::Key("done".to_string()),
            ]
        );
        assert_eq!(path.to_string(), "/todos/0/done");
    }

    #[test]
    fn escapes_round_trip() {
        let path = Path::root().key("a/b").key("c~d");
        let text = path.to_string();
        assert_eq!(text, "/a~1b/c~0d");
        assert_eq!(text.parse::<Path>().unwrap(), path);
    }

    #[test]
    fn leading_zero_stays_a_key() {
        let path: Path = "/01".parse().unwrap();
        assert_eq!(path.steps(), &[Step::Key("01".to_string())]);
    }

    #[test]
    fn missing_slash_is_rejected() {
        assert!(matches!(
            "todos".parse::<Path>(),
            Err(PathParseError::MissingSlash(_))
        ));
    }

    #[test]
    fn bad_escape_is_rejected() {
        assert!(matches!(
            "/a~2b".parse::<Path>(),
            Err(PathParseError::BadEscape { .. })
        ));
    }

    #[test]
    fn split_last_and_parent() {
        let path: Path = "/todos/0".parse().unwrap();
        let (parent, last) = path.split_last().unwrap();
        assert_eq!(parent, &[Step::Key("todos".to_string())]);
        assert_eq!(last, &Step::Index(0));
        assert_eq!(path.parent().unwrap().to_string(), "/todos");
        assert!(Path::root().split_last().is_none());
    }

    #[test]
    fn serde_as_string() {
        let path: Path = "/a/1".parse().unwrap();
        let text = serde_json::to_string(&path).unwrap();
        assert_eq!(text, "\"/a/1\"");
        let back: Path = serde_json::from_str(&text).unwrap();
        assert_eq!(back, path);
    }
}
