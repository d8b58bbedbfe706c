use std::fs;
use std::path::{Path, PathBuf};

use styleguide_config::Config;
use styleguide_engine::SourceFile;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Source path not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Expand `paths` into the stylesheets to build, in a stable order.
///
/// Files named directly are always included; directories are scanned
/// recursively for the configured extensions and sorted by path.
pub fn scan_stylesheets(paths: &[PathBuf], config: &Config) -> Result<Vec<PathBuf>, SourceError> {
    let mut files = Vec::new();
    for path in paths {
        if !path.exists() {
            return Err(SourceError::NotFound(path.clone()));
        }

        if path.is_dir() {
            let mut found = Vec::new();
            scan_directory_recursive(path, config, &mut found)?;
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn scan_directory_recursive(
    dir: &Path,
    config: &Config,
    files: &mut Vec<PathBuf>,
) -> Result<(), SourceError> {
    let read_error = |source| SourceError::Read {
        path: dir.to_path_buf(),
        source,
    };
    let entries = fs::read_dir(dir).map_err(read_error)?;

    for entry in entries {
        let path = entry.map_err(read_error)?.path();

        if path.is_dir() {
            scan_directory_recursive(&path, config, files)?;
        } else if config.matches_extension(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// Read every file into a [`SourceFile`] keyed by its display path.
pub fn load_sources(paths: &[PathBuf]) -> Result<Vec<SourceFile>, SourceError> {
    paths
        .iter()
        .map(|path| {
            let contents = fs::read_to_string(path).map_err(|source| SourceError::Read {
                path: path.clone(),
                source,
            })?;
            Ok(SourceFile::new(path.display().to_string(), contents))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_scan_nested_directories_sorted() {
        // Given a styles directory with nested stylesheets and other files
        let styles = TempDir::new().unwrap();
        create_test_file(styles.path(), "forms/inputs.scss", "");
        create_test_file(styles.path(), "base.css", "");
        create_test_file(styles.path(), "forms/buttons.less", "");
        create_test_file(styles.path(), "README.md", "");

        // When scanning it
        let files = scan_stylesheets(&[styles.path().to_path_buf()], &Config::default()).unwrap();

        // Then only stylesheets are found, ordered by path
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(styles.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("base.css"),
                PathBuf::from("forms/buttons.less"),
                PathBuf::from("forms/inputs.scss"),
            ]
        );
    }

    #[test]
    fn test_explicit_files_keep_argument_order() {
        let styles = TempDir::new().unwrap();
        let b = create_test_file(styles.path(), "b.scss", "");
        let a = create_test_file(styles.path(), "a.txt", "");

        let files = scan_stylesheets(&[b.clone(), a.clone()], &Config::default()).unwrap();

        assert_eq!(files, vec![b, a]);
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let result = scan_stylesheets(&[PathBuf::from("/this/path/does/not/exist")], &Config::default());

        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[test]
    fn test_load_sources_reads_contents() {
        let styles = TempDir::new().unwrap();
        let path = create_test_file(styles.path(), "a.scss", "// A\n//\n// Styleguide 1\n");

        let sources = load_sources(std::slice::from_ref(&path)).unwrap();

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].path, path.display().to_string());
        assert_eq!(sources[0].syntax(), "scss");
        assert_eq!(sources[0].contents, "// A\n//\n// Styleguide 1\n");
    }
}
