//! Discovery and loading of role policy files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use glob::Pattern;
use static_role_store::StaticRoleStoreConfig;
use walkdir::{DirEntry, WalkDir};

/// Extensions of policy documents.
const POLICY_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Directories never descended into.
const SKIP_DIRS: &[&str] = &["target", "node_modules", ".git"];

/// Check if a path or its file name matches any exclude pattern
fn matches_exclude(path: &Path, exclude_patterns: &[Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    exclude_patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || path
                .file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
    })
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && SKIP_DIRS
            .iter()
            .any(|skip| entry.file_name().to_string_lossy() == *skip)
}

fn is_policy_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        POLICY_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

/// Find every policy file under `paths`, sorted and deduplicated.
///
/// Explicitly named files are kept even inside skipped directories.
#[must_use]
pub fn find_files(paths: &[PathBuf], exclude: &[String]) -> Vec<PathBuf> {
    let exclude_patterns: Vec<Pattern> = exclude
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pat) => Some(pat),
            Err(e) => {
                tracing::warn!(pattern = %p, error = %e, "Ignoring invalid exclude pattern");
                None
            }
        })
        .collect();

    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            if is_policy_file(path) && !matches_exclude(path, &exclude_patterns) {
                files.push(path.clone());
            }
            continue;
        }

        for entry in WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| !is_skipped_dir(entry))
            .filter_map(Result::ok)
        {
            let file_path = entry.path();
            if !file_path.is_file() || !is_policy_file(file_path) {
                continue;
            }
            if matches_exclude(file_path, &exclude_patterns) {
                tracing::debug!(path = %file_path.display(), "Excluding file");
                continue;
            }
            files.push(file_path.to_path_buf());
        }
    }

    files.sort();
    files.dedup();
    files
}

/// Parse a policy document. JSON files are read as JSON, everything else
/// as YAML.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not follow the role
/// list format.
pub fn load_policy(path: &Path) -> anyhow::Result<StaticRoleStoreConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        serde_json::from_str(&content).map_err(anyhow::Error::from)
    } else {
        serde_saphyr::from_str(&content).map_err(|e| anyhow::anyhow!("{e}"))
    };
    parsed.context("Invalid policy document")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_is_policy_file() {
        assert!(is_policy_file(Path::new("policies/hosts.yaml")));
        assert!(is_policy_file(Path::new("roles.YML")));
        assert!(is_policy_file(Path::new("roles.json")));
        assert!(!is_policy_file(Path::new("README.md")));
        assert!(!is_policy_file(Path::new("Makefile")));
    }

    #[test]
    fn test_find_files_walks_and_excludes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("policies/nested")).unwrap();
        fs::create_dir_all(root.join("target")).unwrap();
        fs::create_dir_all(root.join("policies/.git")).unwrap();
        fs::write(root.join("policies/a.yaml"), "roles: []").unwrap();
        fs::write(root.join("policies/nested/b.json"), r#"{"roles": []}"#).unwrap();
        fs::write(root.join("policies/skip.yaml"), "roles: []").unwrap();
        fs::write(root.join("policies/notes.md"), "# notes").unwrap();
        fs::write(root.join("target/c.yaml"), "roles: []").unwrap();
        fs::write(root.join("policies/.git/d.yaml"), "roles: []").unwrap();

        let files = find_files(&[root.to_path_buf()], &["skip.*".to_owned()]);
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.yaml", "b.json"]);
    }

    #[test]
    fn test_skipped_dir_can_be_scanned_as_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("target");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("roles.yaml"), "roles: []").unwrap();

        assert_eq!(find_files(&[root], &[]).len(), 1);
    }

    #[test]
    fn test_load_yaml_policy() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            "roles:\n  - id: \"acct:host:vm\"\n    annotations:\n      - name: authn-azure/subscription-id\n        value: sub"
        )
        .unwrap();

        let policy = load_policy(file.path()).unwrap();
        assert_eq!(policy.roles.len(), 1);
        assert_eq!(policy.roles[0].annotations[0].value, "sub");
    }

    #[test]
    fn test_load_json_policy_without_annotations() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        writeln!(file, r#"{{"roles": [{{"id": "acct:host:ns1/*/*"}}]}}"#).unwrap();

        let policy = load_policy(file.path()).unwrap();
        assert!(policy.roles[0].annotations.is_empty());
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        writeln!(file, r#"{{"roles": [{{"id": "x", "owner": "me"}}]}}"#).unwrap();

        let err = load_policy(file.path()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid policy document");
        assert!(format!("{err:#}").starts_with("Invalid policy document: "), "{err:#}");
    }
}
