//! Build target descriptors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// One platform/architecture combination to compile for.
///
/// The pair is handed to the toolchain as-is; an unsupported combination
/// shows up as a compile failure for that target, not as a parse error here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildTarget {
    /// Target operating system (`GOOS`).
    pub goos: String,

    /// Target architecture (`GOARCH`).
    pub goarch: String,

    /// Human-readable platform label, e.g. "Linux x64".
    pub name: String,
}

impl BuildTarget {
    /// Create a new BuildTarget.
    pub fn new(
        goos: impl Into<String>,
        goarch: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            goos: goos.into(),
            goarch: goarch.into(),
            name: name.into(),
        }
    }

    /// Returns true if binaries for this target need the `.exe` suffix.
    pub fn is_windows(&self) -> bool {
        self.goos == "windows"
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{})", self.name, self.goos, self.goarch)
    }
}

impl FromStr for BuildTarget {
    type Err = CoreError;

    /// Parse `goos/goarch` or `goos/goarch=Label`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pair, label) = match s.split_once('=') {
            Some((pair, label)) => (pair, Some(label.trim())),
            None => (s, None),
        };

        let (goos, goarch) = pair
            .trim()
            .split_once('/')
            .ok_or_else(|| CoreError::InvalidTarget(s.to_string()))?;
        let (goos, goarch) = (goos.trim(), goarch.trim());
        if goos.is_empty() || goarch.is_empty() || goarch.contains('/') {
            return Err(CoreError::InvalidTarget(s.to_string()));
        }

        let name = match label {
            Some(label) if !label.is_empty() => label.to_string(),
            Some(_) => return Err(CoreError::InvalidTarget(s.to_string())),
            None => supported_targets()
                .into_iter()
                .find(|t| t.goos == goos && t.goarch == goarch)
                .map(|t| t.name)
                .unwrap_or_else(|| format!("{}/{}", goos, goarch)),
        };

        Ok(Self::new(goos, goarch, name))
    }
}

/// Targets advertised by `list-targets`.
pub fn supported_targets() -> Vec<BuildTarget> {
    vec![
        BuildTarget::new("windows", "amd64", "Windows x64"),
        BuildTarget::new("darwin", "amd64", "macOS x64"),
        BuildTarget::new("darwin", "arm64", "macOS ARM64"),
        BuildTarget::new("linux", "amd64", "Linux x64"),
    ]
}

/// Targets used when a request does not name any.
pub fn default_targets() -> Vec<BuildTarget> {
    vec![
        BuildTarget::new("linux", "amd64", "Linux x64"),
        BuildTarget::new("windows", "amd64", "Windows x64"),
    ]
}
