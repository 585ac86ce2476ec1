// FindingL - core/discovery.rs
//
// Resolve command-line inputs into the list of result files to scan.
//
// Explicit file paths are always accepted. Directories are walked with
// `walkdir` and filtered by filename globs. Only metadata is read here;
// opening files belongs to the app layer.
//
// Non-fatal problems (unreadable entries below a root) are returned as
// warnings. Missing inputs and the max_files bound are fatal.

use crate::util::error::DiscoveryError;
use std::path::{Path, PathBuf};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for resolving inputs.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Maximum directory recursion depth.
    pub max_depth: usize,

    /// Maximum number of files accepted across all inputs.
    pub max_files: usize,

    /// Glob patterns (filename-only) a file inside a directory MUST match.
    /// An empty list means "include everything that is not excluded".
    pub include_patterns: Vec<String>,

    /// Glob patterns matched against filenames AND directory names.
    /// Matching files are skipped; matching directories are not descended into.
    pub exclude_patterns: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        use crate::util::constants;
        Self {
            max_depth: constants::DEFAULT_MAX_DEPTH,
            max_files: constants::DEFAULT_MAX_FILES,
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            exclude_patterns: constants::DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

// =============================================================================
// Discovery
// =============================================================================

/// Resolve `inputs` into result files, preserving the order of `inputs`.
///
/// Files found inside one directory are sorted by path. Returns the files
/// and any non-fatal warnings.
pub fn discover_inputs(
    inputs: &[PathBuf],
    config: &DiscoveryConfig,
) -> Result<(Vec<PathBuf>, Vec<String>), DiscoveryError> {
    let include_pats = compile_patterns(&config.include_patterns, "include");
    let exclude_pats = compile_patterns(&config.exclude_patterns, "exclude");

    let mut files = Vec::new();
    let mut warnings = Vec::new();

    for input in inputs {
        if !input.exists() {
            return Err(DiscoveryError::RootNotFound {
                path: input.clone(),
            });
        }

        if input.is_dir() {
            let found = walk_directory(
                input,
                config,
                &include_pats,
                &exclude_pats,
                &mut warnings,
            )?;
            tracing::debug!(
                root = %input.display(),
                files = found.len(),
                "Directory walked"
            );
            files.extend(found);
        } else {
            files.push(input.clone());
        }

        if files.len() > config.max_files {
            return Err(DiscoveryError::MaxFilesExceeded {
                max: config.max_files,
            });
        }
    }

    tracing::info!(
        inputs = inputs.len(),
        files = files.len(),
        warnings = warnings.len(),
        "Discovery complete"
    );

    Ok((files, warnings))
}

fn walk_directory(
    root: &Path,
    config: &DiscoveryConfig,
    include_pats: &[glob::Pattern],
    exclude_pats: &[glob::Pattern],
    warnings: &mut Vec<String>,
) -> Result<Vec<PathBuf>, DiscoveryError> {
    let walker = walkdir::WalkDir::new(root)
        .max_depth(config.max_depth)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            // Never exclude the root itself.
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !is_excluded(&entry.file_name().to_string_lossy(), exclude_pats)
        });

    let mut found = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                return Err(DiscoveryError::Traversal {
                    path: root.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                let msg = format!("Skipping unreadable entry under '{}': {e}", root.display());
                tracing::warn!("{}", msg);
                warnings.push(msg);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if is_excluded(&name, exclude_pats) || !is_included(&name, include_pats) {
            continue;
        }
        found.push(entry.into_path());
    }
    Ok(found)
}

/// Compile a list of glob pattern strings into `glob::Pattern` objects.
/// Invalid patterns are logged and skipped.
fn compile_patterns(patterns: &[String], kind: &str) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(pat) => Some(pat),
            Err(e) => {
                tracing::warn!(pattern = %p, kind, error = %e, "Invalid glob pattern ignored");
                None
            }
        })
        .collect()
}

fn is_excluded(name: &str, exclude_pats: &[glob::Pattern]) -> bool {
    exclude_pats.iter().any(|p| p.matches(name))
}

fn is_included(name: &str, include_pats: &[glob::Pattern]) -> bool {
    include_pats.is_empty() || include_pats.iter().any(|p| p.matches(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_directory_walk_applies_patterns_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("Lresultsq27.csv"), "").unwrap();
        fs::write(root.join("Lresultsq125.csv"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();
        fs::write(root.join("Lresultsq9.csv.bak"), "").unwrap();

        let (files, warnings) =
            discover_inputs(&[root.to_path_buf()], &DiscoveryConfig::default()).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(names(&files), vec!["Lresultsq125.csv", "Lresultsq27.csv"]);
    }

    #[test]
    fn test_explicit_file_bypasses_include_patterns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.log");
        fs::write(&path, "").unwrap();

        let (files, _) = discover_inputs(&[path.clone()], &DiscoveryConfig::default()).unwrap();
        assert_eq!(files, vec![path]);
    }

    #[test]
    fn test_excluded_directories_are_not_descended() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("Lresultsq27.csv"), "").unwrap();
        fs::create_dir(root.join("archive")).unwrap();
        fs::write(root.join("archive").join("Lresultsq8.csv"), "").unwrap();

        let config = DiscoveryConfig {
            exclude_patterns: vec!["archive".to_string()],
            ..Default::default()
        };
        let (files, _) = discover_inputs(&[root.to_path_buf()], &config).unwrap();
        assert_eq!(names(&files), vec!["Lresultsq27.csv"]);
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let result = discover_inputs(
            &[PathBuf::from("/nonexistent/findingl-test/Lresultsq27.csv")],
            &DiscoveryConfig::default(),
        );
        assert!(matches!(result, Err(DiscoveryError::RootNotFound { .. })));
    }

    #[test]
    fn test_max_files_is_enforced() {
        let dir = tempfile::tempdir().unwrap();
        for q in [4, 8, 9] {
            fs::write(dir.path().join(format!("Lresultsq{q}.csv")), "").unwrap();
        }
        let config = DiscoveryConfig {
            max_files: 2,
            ..Default::default()
        };
        let result = discover_inputs(&[dir.path().to_path_buf()], &config);
        assert!(matches!(
            result,
            Err(DiscoveryError::MaxFilesExceeded { max: 2 })
        ));
    }
}
