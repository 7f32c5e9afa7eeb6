//! Output file naming.
//!
//! Every target writes to its own file in the shared output directory, so the
//! name has to be a pure function of the target identity.

use std::path::{Path, PathBuf};

use crate::BuildTarget;

/// Derive the executable name for `app` built for `goos`/`goarch`.
pub fn output_file_name(app_name: &str, goos: &str, goarch: &str) -> String {
    let suffix = if goos == "windows" { ".exe" } else { "" };
    format!("{}_{}_{}{}", app_name, goos, goarch, suffix)
}

/// Resolve the full output path for a target inside `output_dir`.
pub fn output_path(output_dir: &Path, app_name: &str, target: &BuildTarget) -> PathBuf {
    output_dir.join(output_file_name(app_name, &target.goos, &target.goarch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supported_targets;
    use std::collections::HashSet;

    #[test]
    fn test_windows_gets_exe_suffix() {
        assert_eq!(output_file_name("app", "windows", "amd64"), "app_windows_amd64.exe");
    }

    #[test]
    fn test_other_platforms_have_no_suffix() {
        assert_eq!(output_file_name("app", "linux", "amd64"), "app_linux_amd64");
        assert_eq!(output_file_name("tool", "darwin", "arm64"), "tool_darwin_arm64");
    }

    #[test]
    fn test_output_path_joins_dir() {
        let target = BuildTarget::new("linux", "amd64", "Linux x64");
        let path = output_path(Path::new("bin"), "app", &target);
        assert_eq!(path, PathBuf::from("bin").join("app_linux_amd64"));
    }

    #[test]
    fn test_distinct_targets_get_distinct_paths() {
        let dir = Path::new("out");
        let paths: HashSet<PathBuf> = supported_targets()
            .iter()
            .map(|t| output_path(dir, "app", t))
            .collect();
        assert_eq!(paths.len(), supported_targets().len());
    }
}
