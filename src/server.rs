//! Packaged Liberty server introspection
//!
//! A packaged server distribution carries its own `wlp` install root. The
//! introspector answers one question about it: does the server already have
//! applications installed, either declared in its `server.xml` or dropped
//! into its `apps`/`dropins` directories? The check is a pure read.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Element names in `server.xml` that declare an installed application.
const APP_ELEMENTS: [&str; 3] = ["application", "webApplication", "enterpriseApplication"];

/// Directories under a server from which applications are loaded.
const APP_DIRS: [&str; 2] = ["apps", "dropins"];

#[derive(Debug, Error)]
pub enum ServerError {
    /// The server descriptor exists but could not be read.
    #[error("unable to read server descriptor {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The server descriptor exists but is not well-formed XML.
    #[error("unable to parse server descriptor {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
}

/// A named server within a Liberty install root.
#[derive(Debug, Clone)]
pub struct LibertyServer {
    pub install_root: PathBuf,
    pub server_name: String,
}

impl LibertyServer {
    pub fn new(install_root: &Path, server_name: &str) -> Self {
        Self {
            install_root: install_root.to_path_buf(),
            server_name: server_name.to_string(),
        }
    }

    /// Directory holding this server's configuration and applications.
    pub fn server_dir(&self) -> PathBuf {
        self.install_root
            .join("usr/servers")
            .join(&self.server_name)
    }

    /// Reports whether this server already has applications installed.
    ///
    /// Applications count as installed when `server.xml` declares one or when
    /// the `apps` or `dropins` directory contains any entry. A present but
    /// unreadable descriptor is an error, never `false`.
    pub fn has_installed_apps(&self) -> Result<bool, ServerError> {
        let descriptor = self.server_dir().join("server.xml");
        if descriptor_declares_app(&descriptor)? {
            debug!(path = %descriptor.display(), "server descriptor declares an application");
            return Ok(true);
        }

        for dir in APP_DIRS {
            let app_dir = self.server_dir().join(dir);
            if dir_has_entries(&app_dir)? {
                debug!(path = %app_dir.display(), "application directory is non-empty");
                return Ok(true);
            }
        }

        Ok(false)
    }
}

/// Parses a server descriptor and reports whether it declares any
/// application element. A missing descriptor is `false`.
fn descriptor_declares_app(path: &Path) -> Result<bool, ServerError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => {
            return Err(ServerError::Io {
                path: path.to_path_buf(),
                source: err,
            })
        }
    };

    let doc = roxmltree::Document::parse(&content).map_err(|err| ServerError::Parse {
        path: path.to_path_buf(),
        source: err,
    })?;

    Ok(doc
        .descendants()
        .any(|node| node.is_element() && APP_ELEMENTS.contains(&node.tag_name().name())))
}

fn dir_has_entries(path: &Path) -> Result<bool, ServerError> {
    let mut entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => {
            return Err(ServerError::Io {
                path: path.to_path_buf(),
                source: err,
            })
        }
    };

    match entries.next() {
        Some(Ok(_)) => Ok(true),
        Some(Err(err)) => Err(ServerError::Io {
            path: path.to_path_buf(),
            source: err,
        }),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn create_server(descriptor: &str) -> (TempDir, LibertyServer) {
        let dir = TempDir::new().unwrap();
        let server = LibertyServer::new(dir.path(), "defaultServer");
        fs::create_dir_all(server.server_dir()).unwrap();
        File::create(server.server_dir().join("server.xml"))
            .unwrap()
            .write_all(descriptor.as_bytes())
            .unwrap();
        (dir, server)
    }

    #[test]
    fn test_no_apps_anywhere() {
        let (_dir, server) = create_server(r#"<server description="test"/>"#);
        assert!(!server.has_installed_apps().unwrap());
    }

    #[test]
    fn test_web_application_declared() {
        let (_dir, server) = create_server(
            r#"<server><webApplication location="app.war" contextRoot="/"/></server>"#,
        );
        assert!(server.has_installed_apps().unwrap());
    }

    #[test]
    fn test_enterprise_application_declared() {
        let (_dir, server) =
            create_server(r#"<server><enterpriseApplication location="app.ear"/></server>"#);
        assert!(server.has_installed_apps().unwrap());
    }

    #[test]
    fn test_dropins_directory_non_empty() {
        let (_dir, server) = create_server(r#"<server/>"#);
        let dropins = server.server_dir().join("dropins");
        fs::create_dir_all(&dropins).unwrap();
        File::create(dropins.join("app.war")).unwrap();
        assert!(server.has_installed_apps().unwrap());
    }

    #[test]
    fn test_apps_directory_non_empty() {
        let (_dir, server) = create_server(r#"<server/>"#);
        let apps = server.server_dir().join("apps");
        fs::create_dir_all(&apps).unwrap();
        File::create(apps.join("app.war")).unwrap();
        assert!(server.has_installed_apps().unwrap());
    }

    #[test]
    fn test_empty_app_dirs() {
        let (_dir, server) = create_server(r#"<server/>"#);
        fs::create_dir_all(server.server_dir().join("dropins")).unwrap();
        fs::create_dir_all(server.server_dir().join("apps")).unwrap();
        assert!(!server.has_installed_apps().unwrap());
    }

    #[test]
    fn test_malformed_descriptor_is_error() {
        let (_dir, server) = create_server("<server><unclosed>");
        let err = server.has_installed_apps().unwrap_err();
        assert!(matches!(err, ServerError::Parse { .. }));
    }

    #[test]
    fn test_missing_descriptor_falls_back_to_dirs() {
        let dir = TempDir::new().unwrap();
        let server = LibertyServer::new(dir.path(), "defaultServer");
        fs::create_dir_all(server.server_dir().join("dropins")).unwrap();
        File::create(server.server_dir().join("dropins/app.war")).unwrap();
        assert!(server.has_installed_apps().unwrap());
    }
}
