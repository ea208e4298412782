//! Discovery of candidate configuration files under a location.
//!
//! The scan runs once per resolver. A location is a single file or a directory;
//! each suffix token gets the sorted list of files ending in `.{suffix}`.

use crate::error::{ResolveError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// What the configured location turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    File,
    Directory,
    /// Neither a file nor a directory; every list is empty
    Missing,
}

/// Files found per suffix token.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredFileSet {
    pub root: PathBuf,
    pub kind: LocationKind,
    /// Paths relative to `root` for a directory, the location itself for a file
    pub files: BTreeMap<String, Vec<PathBuf>>,
}

impl DiscoveredFileSet {
    /// Discovered files for `suffix`, in lookup order.
    pub fn files_for(&self, suffix: &str) -> &[PathBuf] {
        self.files.get(suffix).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The on-disk path of a discovered entry.
    pub fn full_path(&self, entry: &Path) -> PathBuf {
        match self.kind {
            LocationKind::Directory => self.root.join(entry),
            LocationKind::File | LocationKind::Missing => entry.to_path_buf(),
        }
    }

    /// True when no suffix has any file.
    pub fn is_empty(&self) -> bool {
        self.files.values().all(Vec::is_empty)
    }
}

/// Remove trailing `/` and `\\` separators, keeping a bare root intact.
pub fn strip_trailing_slash(path: &str) -> &str {
    let stripped = path.trim_end_matches(['/', '\\']);
    if stripped.is_empty() && !path.is_empty() {
        &path[..1]
    } else {
        stripped
    }
}

fn matches_suffix(name: &str, suffix: &str) -> bool {
    name.strip_suffix(suffix)
        .is_some_and(|stem| stem.ends_with('.'))
}

fn sort_paths(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
}

/// Enumerate the files under `location` for every suffix in `suffixes`.
///
/// A location that does not exist is logged and yields empty lists.
pub fn discover(location: &Path, suffixes: &[&str], recurse: bool) -> Result<DiscoveredFileSet> {
    let root = PathBuf::from(strip_trailing_slash(&location.to_string_lossy()));
    let mut files: BTreeMap<String, Vec<PathBuf>> = suffixes
        .iter()
        .map(|suffix| (suffix.to_string(), Vec::new()))
        .collect();

    let kind = if root.is_file() {
        LocationKind::File
    } else if root.is_dir() {
        LocationKind::Directory
    } else {
        LocationKind::Missing
    };

    match kind {
        LocationKind::File => {
            let name = root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            for (suffix, list) in files.iter_mut() {
                if matches_suffix(&name, suffix) {
                    list.push(root.clone());
                }
            }
        }
        LocationKind::Directory => {
            for entry in candidate_files(&root, recurse)? {
                let name = entry
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                for (suffix, list) in files.iter_mut() {
                    if matches_suffix(&name, suffix) {
                        list.push(entry.clone());
                    }
                }
            }
            for list in files.values_mut() {
                sort_paths(list);
            }
        }
        LocationKind::Missing => {
            warn!(
                location = %root.display(),
                "Configuration location does not exist, only cli args and envvars will be read"
            );
        }
    }

    debug!(
        location = %root.display(),
        kind = ?kind,
        files = files.values().map(Vec::len).sum::<usize>(),
        "Discovered configuration files"
    );

    Ok(DiscoveredFileSet { root, kind, files })
}

/// Every regular file under `root`, relative to it.
fn candidate_files(root: &Path, recurse: bool) -> Result<Vec<PathBuf>> {
    let read_error = |path: &Path, source: std::io::Error| ResolveError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    if !recurse {
        let mut names = Vec::new();
        let entries = std::fs::read_dir(root).map_err(|e| read_error(root, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| read_error(root, e))?;
            if entry.path().is_file() {
                names.push(PathBuf::from(entry.file_name()));
            }
        }
        return Ok(names);
    }

    let mut relative = Vec::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
            read_error(&path, e.into())
        })?;
        if !entry.path().is_file() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(root) {
            relative.push(rel.to_path_buf());
        }
    }
    Ok(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, "{}").unwrap();
    }

    #[test]
    fn test_strip_trailing_slash() {
        assert_eq!(strip_trailing_slash("/"), "/");
        assert_eq!(strip_trailing_slash("//"), "/");
        assert_eq!(strip_trailing_slash("/etc/app/"), "/etc/app");
        assert_eq!(strip_trailing_slash("configs"), "configs");
        assert_eq!(strip_trailing_slash(""), "");
        assert_eq!(strip_trailing_slash("configs\\"), "configs");
        assert_eq!(strip_trailing_slash("C:\\app\\/"), "C:\\app");
        assert_eq!(strip_trailing_slash("\\"), "\\");
    }

    #[test]
    fn test_directory_listing_is_sorted() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "b.json");
        touch(temp.path(), "a.json");
        touch(temp.path(), "c.yaml");
        touch(temp.path(), "notes.txt");

        let set = discover(temp.path(), &["json", "yaml", "yml"], false).unwrap();
        assert_eq!(set.kind, LocationKind::Directory);
        assert_eq!(
            set.files_for("json"),
            &[PathBuf::from("a.json"), PathBuf::from("b.json")]
        );
        assert_eq!(set.files_for("yaml"), &[PathBuf::from("c.yaml")]);
        assert!(set.files_for("yml").is_empty());
        assert!(set.files_for("toml").is_empty());
    }

    #[test]
    fn test_suffix_requires_dot() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "settingsjson");
        touch(temp.path(), "app.custom_json");

        let set = discover(temp.path(), &["json", "custom_json"], false).unwrap();
        assert!(set.files_for("json").is_empty());
        assert_eq!(set.files_for("custom_json"), &[PathBuf::from("app.custom_json")]);
    }

    #[test]
    fn test_top_level_only_without_recurse() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "top.json");
        touch(temp.path(), "nested/deep.json");

        let set = discover(temp.path(), &["json"], false).unwrap();
        assert_eq!(set.files_for("json"), &[PathBuf::from("top.json")]);
    }

    #[test]
    fn test_recurse_records_relative_paths() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "top.json");
        touch(temp.path(), "nested/deep.json");
        touch(temp.path(), "nested/more/deeper.json");

        let set = discover(temp.path(), &["json"], true).unwrap();
        assert_eq!(
            set.files_for("json"),
            &[
                PathBuf::from("nested/deep.json"),
                PathBuf::from("nested/more/deeper.json"),
                PathBuf::from("top.json"),
            ]
        );
        assert_eq!(
            set.full_path(Path::new("nested/deep.json")),
            temp.path().join("nested/deep.json")
        );
    }

    #[test]
    fn test_single_file_location() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "settings.yml");
        let file = temp.path().join("settings.yml");

        let set = discover(&file, &["json", "yaml", "yml"], false).unwrap();
        assert_eq!(set.kind, LocationKind::File);
        assert_eq!(set.files_for("yml"), &[file.clone()]);
        assert!(set.files_for("yaml").is_empty());
        assert!(set.files_for("json").is_empty());
        assert_eq!(set.full_path(&file), file);
    }

    #[test]
    #[traced_test]
    fn test_missing_location_is_empty() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");

        let set = discover(&missing, &["json", "env"], true).unwrap();
        assert_eq!(set.kind, LocationKind::Missing);
        assert!(set.is_empty());
        assert!(set.files.contains_key("json"));
        assert!(logs_contain("Configuration location does not exist"));
    }

    #[test]
    fn test_trailing_slash_location() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.json");
        let with_slash = format!("{}/", temp.path().display());

        let set = discover(Path::new(&with_slash), &["json"], false).unwrap();
        assert_eq!(set.root, temp.path());
        assert_eq!(set.files_for("json"), &[PathBuf::from("a.json")]);
    }
}
