use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, path::ScaffoldPath};

/// Final output of rendering one template: where it goes and what it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    path: ScaffoldPath,
    contents: Vec<u8>,
}

impl RenderedFile {
    pub fn new(path: ScaffoldPath, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path,
            contents: contents.into(),
        }
    }

    pub fn path(&self) -> &ScaffoldPath {
        &self.path
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

/// What the writer does when the target file already exists.
///
/// Deliberately has no `Default`: callers must choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Leave the existing file untouched and report it as skipped.
    Skip,
    /// Replace the existing file.
    Overwrite,
    /// Fail that template with `FileExists`.
    Error,
}

impl ConflictPolicy {
    pub const ALL: [ConflictPolicy; 3] = [Self::Skip, Self::Overwrite, Self::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Overwrite => "overwrite",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "overwrite" | "force" => Ok(Self::Overwrite),
            "error" | "fail" => Ok(Self::Error),
            other => Err(DomainError::InvalidConfiguration {
                field: "conflict_policy".into(),
                reason: format!("unknown policy '{other}' (expected skip, overwrite or error)"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Skip".parse::<ConflictPolicy>().unwrap(), ConflictPolicy::Skip);
        assert_eq!(
            "overwrite".parse::<ConflictPolicy>().unwrap(),
            ConflictPolicy::Overwrite
        );
        assert_eq!(" ERROR ".parse::<ConflictPolicy>().unwrap(), ConflictPolicy::Error);
        assert!("merge".parse::<ConflictPolicy>().is_err());
    }

    #[test]
    fn policy_display_round_trips_through_from_str() {
        for policy in ConflictPolicy::ALL {
            assert_eq!(policy.to_string().parse::<ConflictPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn rendered_file_exposes_bytes() {
        let f = RenderedFile::new(ScaffoldPath::try_new("a/b.txt").unwrap(), "NEW");
        assert_eq!(f.contents(), b"NEW");
        assert_eq!(f.len(), 3);
        assert_eq!(f.path().to_string(), "a/b.txt");
    }
}
