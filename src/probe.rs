//! Filesystem probes over an application tree
//!
//! Stateless predicates used by the detection engine: does the tree carry a
//! packaged Liberty server, does its manifest declare an entry point, does it
//! look like a compiled artifact rather than exploded sources. Pure reads,
//! no mutation.
//!
//! Every probe distinguishes "artifact is absent" (a normal `false`) from
//! "artifact is present but unreadable" (an error that aborts detection for
//! this tree, carrying the offending path).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Relative path of the packaged-server descriptor, under the app root.
const WLP_SERVERS_DIR: &str = "wlp/usr/servers";

/// JAR manifest location relative to the app root.
const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Errors raised by probes. Absence of an artifact is never an error; these
/// cover artifacts that exist but cannot be read.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// An expected artifact exists but could not be read.
    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The manifest exists but is not valid JAR manifest syntax.
    #[error("malformed manifest at {path}: {reason}")]
    MalformedManifest { path: PathBuf, reason: String },
}

/// Checks whether a packaged-server descriptor exists at
/// `<app_root>/wlp/usr/servers/<server_name>/server.xml`.
pub fn has_packaged_server(app_root: &Path, server_name: &str) -> Result<bool, ProbeError> {
    let descriptor = app_root
        .join(WLP_SERVERS_DIR)
        .join(server_name)
        .join("server.xml");
    let exists = file_exists(&descriptor)?;
    debug!(path = %descriptor.display(), exists, "probed packaged-server descriptor");
    Ok(exists)
}

/// Checks whether the tree's manifest declares a `Main-Class` entry point.
///
/// A missing manifest is `false`; a manifest that exists but cannot be read
/// or parsed is an error.
pub fn manifest_has_main_class(app_root: &Path) -> Result<bool, ProbeError> {
    let path = app_root.join(MANIFEST_PATH);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(ProbeError::Io { path, source: err }),
    };
    let declared = manifest_declares(&path, &content, "Main-Class")?;
    debug!(path = %path.display(), declared, "probed manifest for Main-Class");
    Ok(declared)
}

/// Checks whether the tree is a compiled JVM application archive rather than
/// exploded sources.
///
/// A `WEB-INF/` directory marks an exploded web archive; a
/// `META-INF/application.xml` descriptor marks an enterprise archive. Raw
/// source trees carry neither.
pub fn is_jvm_application_package(app_root: &Path) -> Result<bool, ProbeError> {
    if dir_exists(&app_root.join("WEB-INF"))? {
        return Ok(true);
    }
    file_exists(&app_root.join("META-INF/application.xml"))
}

/// Stat-based existence check that treats NotFound as `false` and every other
/// failure as a probe error.
fn file_exists(path: &Path) -> Result<bool, ProbeError> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(ProbeError::Io {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

fn dir_exists(path: &Path) -> Result<bool, ProbeError> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_dir()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(ProbeError::Io {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

/// Reports whether the main section of a JAR manifest declares `key`.
///
/// JAR manifest syntax folds long values onto continuation lines that begin
/// with a single space; sections are separated by blank lines and only the
/// first (main) section carries global attributes like `Main-Class`.
fn manifest_declares(path: &Path, content: &str, key: &str) -> Result<bool, ProbeError> {
    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            // End of the main section; later sections are per-entry.
            return Ok(false);
        }
        if line.starts_with(' ') {
            // Continuation of the previous attribute's value.
            continue;
        }
        let Some((name, _value)) = line.split_once(':') else {
            return Err(ProbeError::MalformedManifest {
                path: path.to_path_buf(),
                reason: format!("attribute line without ':' separator: {line:?}"),
            });
        };
        if name.trim() == key {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_manifest(root: &Path, content: &str) {
        fs::create_dir_all(root.join("META-INF")).unwrap();
        File::create(root.join(MANIFEST_PATH))
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
    }

    #[test]
    fn test_packaged_server_descriptor_present() {
        let dir = TempDir::new().unwrap();
        let server_dir = dir.path().join("wlp/usr/servers/defaultServer");
        fs::create_dir_all(&server_dir).unwrap();
        File::create(server_dir.join("server.xml")).unwrap();

        assert!(has_packaged_server(dir.path(), "defaultServer").unwrap());
        assert!(!has_packaged_server(dir.path(), "otherServer").unwrap());
    }

    #[test]
    fn test_packaged_server_absent() {
        let dir = TempDir::new().unwrap();
        assert!(!has_packaged_server(dir.path(), "defaultServer").unwrap());
    }

    #[test]
    fn test_manifest_missing_is_false() {
        let dir = TempDir::new().unwrap();
        assert!(!manifest_has_main_class(dir.path()).unwrap());
    }

    #[test]
    fn test_manifest_with_main_class() {
        let dir = TempDir::new().unwrap();
        write_manifest(
            dir.path(),
            "Manifest-Version: 1.0\nMain-Class: com.example.Main\n",
        );
        assert!(manifest_has_main_class(dir.path()).unwrap());
    }

    #[test]
    fn test_manifest_without_main_class() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "Manifest-Version: 1.0\nBuilt-By: gradle\n");
        assert!(!manifest_has_main_class(dir.path()).unwrap());
    }

    #[test]
    fn test_manifest_continuation_lines() {
        let dir = TempDir::new().unwrap();
        write_manifest(
            dir.path(),
            "Manifest-Version: 1.0\nClass-Path: lib/a.jar\n lib/b.jar\nMain-Class: com.example.Main\n",
        );
        assert!(manifest_has_main_class(dir.path()).unwrap());
    }

    #[test]
    fn test_manifest_main_class_in_entry_section_ignored() {
        let dir = TempDir::new().unwrap();
        write_manifest(
            dir.path(),
            "Manifest-Version: 1.0\n\nName: foo.class\nMain-Class: com.example.Main\n",
        );
        assert!(!manifest_has_main_class(dir.path()).unwrap());
    }

    #[test]
    fn test_malformed_manifest_is_error() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "this is not a manifest\n");
        let err = manifest_has_main_class(dir.path()).unwrap_err();
        assert!(matches!(err, ProbeError::MalformedManifest { .. }));
    }

    #[test]
    fn test_web_inf_marks_application_package() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("WEB-INF")).unwrap();
        assert!(is_jvm_application_package(dir.path()).unwrap());
    }

    #[test]
    fn test_application_xml_marks_application_package() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("META-INF")).unwrap();
        File::create(dir.path().join("META-INF/application.xml")).unwrap();
        assert!(is_jvm_application_package(dir.path()).unwrap());
    }

    #[test]
    fn test_source_tree_is_not_application_package() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/main/java")).unwrap();
        assert!(!is_jvm_application_package(dir.path()).unwrap());
    }
}
