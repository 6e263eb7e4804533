//! Drop-in directory linking
//!
//! Makes an application directory visible inside the Liberty runtime's
//! drop-in location without copying bytes: one symlink at
//! `<runtime_root>/usr/servers/<name>/dropins/<basename(source)>` pointing at
//! the resolved source directory.
//!
//! # Environment Variables
//!
//! [`LinkerConfig::from_env`] resolves paths once, at construction:
//! - `BPI_OL_DROPIN_DIR`: application directory to link - default:
//!   "/workspace"
//! - `BPI_OL_RUNTIME_ROOT`: root of the installed runtime layer - default:
//!   "/layers/paketo-buildpacks_open-liberty/open-liberty-runtime"
//!
//! # Idempotence
//!
//! Re-running the linker with unchanged inputs succeeds without touching the
//! filesystem: an existing symlink that already resolves to the source is
//! accepted as the desired end state. Any other occupant of the link path is
//! refused with [`LinkError::Conflict`]; the linker never replaces entries it
//! did not create.

use crate::config::{self, ConfigError, DEFAULT_SERVER_NAME};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Application directory linked when `BPI_OL_DROPIN_DIR` is unset.
pub const DEFAULT_SOURCE_DIR: &str = "/workspace";

/// Runtime layer root assumed when `BPI_OL_RUNTIME_ROOT` is unset.
pub const DEFAULT_RUNTIME_ROOT: &str =
    "/layers/paketo-buildpacks_open-liberty/open-liberty-runtime";

/// Environment variable overriding the source directory.
pub const ENV_DROPIN_DIR: &str = "BPI_OL_DROPIN_DIR";

/// Environment variable overriding the runtime root.
pub const ENV_RUNTIME_ROOT: &str = "BPI_OL_RUNTIME_ROOT";

#[derive(Debug, Error)]
pub enum LinkError {
    /// The source directory is missing or not a directory.
    #[error("source directory {0} does not exist or is not a directory")]
    SourceNotFound(PathBuf),

    /// The destination dropins directory is missing or not a directory.
    #[error("destination directory {0} does not exist or is not a directory")]
    DestinationNotFound(PathBuf),

    /// The link path is occupied by an entry the linker did not create.
    #[error("link path {path} already exists and does not point at {source_dir}")]
    Conflict { path: PathBuf, source_dir: PathBuf },

    /// The source directory name is empty or unusable as a link name.
    #[error("cannot derive a link name from source directory {0}")]
    InvalidSourceName(PathBuf),

    #[error("link creation failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Resolved inputs for one link operation.
///
/// All paths are fixed at construction; [`FileLinker::link`] reads nothing
/// from the environment.
#[derive(Debug, Clone)]
pub struct LinkerConfig {
    /// Directory to expose as a drop-in application.
    pub source_dir: PathBuf,

    /// Root of the runtime layer containing `usr/servers/<name>/dropins`.
    pub runtime_root: PathBuf,

    /// Server whose dropins directory receives the link.
    pub server_name: String,
}

impl LinkerConfig {
    pub fn new(source_dir: &Path, runtime_root: &Path) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            runtime_root: runtime_root.to_path_buf(),
            server_name: DEFAULT_SERVER_NAME.to_string(),
        }
    }

    /// Resolves linker configuration from the process environment, applying
    /// the documented defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let source_dir = config::env_or_default(ENV_DROPIN_DIR, DEFAULT_SOURCE_DIR)?;
        let runtime_root = config::env_or_default(ENV_RUNTIME_ROOT, DEFAULT_RUNTIME_ROOT)?;
        Ok(Self::new(
            Path::new(&source_dir),
            Path::new(&runtime_root),
        ))
    }

    /// The directory that receives the link.
    pub fn destination_parent(&self) -> PathBuf {
        self.runtime_root
            .join("usr/servers")
            .join(&self.server_name)
            .join("dropins")
    }
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self::new(
            Path::new(DEFAULT_SOURCE_DIR),
            Path::new(DEFAULT_RUNTIME_ROOT),
        )
    }
}

/// Links an application directory into a server's dropins directory.
#[derive(Debug)]
pub struct FileLinker {
    config: LinkerConfig,
}

impl FileLinker {
    pub fn new(config: LinkerConfig) -> Self {
        Self { config }
    }

    /// Validates both sides and creates the drop-in symlink, returning its
    /// path. Preconditions are checked before anything is created; a failed
    /// link leaves no filesystem entry behind.
    pub fn link(&self) -> Result<PathBuf, LinkError> {
        let source = &self.config.source_dir;
        if !source.is_dir() {
            return Err(LinkError::SourceNotFound(source.clone()));
        }

        let dest_parent = self.config.destination_parent();
        if !dest_parent.is_dir() {
            return Err(LinkError::DestinationNotFound(dest_parent));
        }

        // Link to the symlink-evaluated real path so the entry survives even
        // if the source path itself was a link.
        let resolved_source = fs::canonicalize(source).map_err(|err| LinkError::Io {
            path: source.clone(),
            source: err,
        })?;

        let link_name = source
            .file_name()
            .ok_or_else(|| LinkError::InvalidSourceName(source.clone()))?;
        let link_path = dest_parent.join(link_name);

        if link_path.symlink_metadata().is_ok() {
            return self.check_existing(&link_path, &resolved_source);
        }

        std::os::unix::fs::symlink(&resolved_source, &link_path).map_err(|err| LinkError::Io {
            path: link_path.clone(),
            source: err,
        })?;

        info!(
            link = %link_path.display(),
            target = %resolved_source.display(),
            "linked application into dropins"
        );
        Ok(link_path)
    }

    /// An occupied link path is accepted only when it is already the link
    /// this operation would create.
    fn check_existing(
        &self,
        link_path: &Path,
        resolved_source: &Path,
    ) -> Result<PathBuf, LinkError> {
        let points_at_source = fs::canonicalize(link_path)
            .map(|resolved| resolved == resolved_source)
            .unwrap_or(false);
        let is_symlink = link_path
            .symlink_metadata()
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false);

        if is_symlink && points_at_source {
            debug!(link = %link_path.display(), "drop-in link already in place");
            return Ok(link_path.to_path_buf());
        }

        Err(LinkError::Conflict {
            path: link_path.to_path_buf(),
            source_dir: resolved_source.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn dropins_under(runtime_root: &Path) -> PathBuf {
        runtime_root.join("usr/servers/defaultServer/dropins")
    }

    fn linker_for(source: &Path, runtime_root: &Path) -> FileLinker {
        FileLinker::new(LinkerConfig::new(source, runtime_root))
    }

    #[test]
    fn test_link_resolves_to_source() {
        let app_dir = TempDir::new().unwrap();
        let layer_dir = TempDir::new().unwrap();
        fs::create_dir_all(dropins_under(layer_dir.path())).unwrap();

        let linker = linker_for(app_dir.path(), layer_dir.path());
        let link = linker.link().unwrap();

        assert_eq!(
            link,
            dropins_under(layer_dir.path()).join(app_dir.path().file_name().unwrap())
        );
        assert_eq!(
            fs::canonicalize(&link).unwrap(),
            fs::canonicalize(app_dir.path()).unwrap()
        );
    }

    #[test]
    fn test_missing_source_creates_nothing() {
        let layer_dir = TempDir::new().unwrap();
        fs::create_dir_all(dropins_under(layer_dir.path())).unwrap();

        let missing = layer_dir.path().join("no-such-app");
        let linker = linker_for(&missing, layer_dir.path());
        let err = linker.link().unwrap_err();

        assert!(matches!(err, LinkError::SourceNotFound(_)));
        assert!(fs::read_dir(dropins_under(layer_dir.path()))
            .unwrap()
            .next()
            .is_none());
    }

    #[test]
    fn test_missing_destination() {
        let app_dir = TempDir::new().unwrap();
        let layer_dir = TempDir::new().unwrap();

        let linker = linker_for(app_dir.path(), layer_dir.path());
        let err = linker.link().unwrap_err();
        assert!(matches!(err, LinkError::DestinationNotFound(_)));
    }

    #[test]
    fn test_relink_is_idempotent() {
        let app_dir = TempDir::new().unwrap();
        let layer_dir = TempDir::new().unwrap();
        fs::create_dir_all(dropins_under(layer_dir.path())).unwrap();

        let linker = linker_for(app_dir.path(), layer_dir.path());
        let first = linker.link().unwrap();
        let second = linker.link().unwrap();

        assert_eq!(first, second);
        assert_eq!(
            fs::canonicalize(&second).unwrap(),
            fs::canonicalize(app_dir.path()).unwrap()
        );
    }

    #[test]
    fn test_occupied_link_path_is_refused() {
        let app_dir = TempDir::new().unwrap();
        let layer_dir = TempDir::new().unwrap();
        let dropins = dropins_under(layer_dir.path());
        fs::create_dir_all(&dropins).unwrap();

        let name = app_dir.path().file_name().unwrap();
        File::create(dropins.join(name)).unwrap();

        let linker = linker_for(app_dir.path(), layer_dir.path());
        let err = linker.link().unwrap_err();
        assert!(matches!(err, LinkError::Conflict { .. }));
    }

    #[test]
    fn test_stale_link_to_other_target_is_refused() {
        let app_dir = TempDir::new().unwrap();
        let other_dir = TempDir::new().unwrap();
        let layer_dir = TempDir::new().unwrap();
        let dropins = dropins_under(layer_dir.path());
        fs::create_dir_all(&dropins).unwrap();

        let name = app_dir.path().file_name().unwrap();
        std::os::unix::fs::symlink(other_dir.path(), dropins.join(name)).unwrap();

        let linker = linker_for(app_dir.path(), layer_dir.path());
        let err = linker.link().unwrap_err();
        assert!(matches!(err, LinkError::Conflict { .. }));
    }

    #[test]
    fn test_default_paths() {
        let config = LinkerConfig::default();
        assert_eq!(config.source_dir, Path::new("/workspace"));
        assert_eq!(
            config.destination_parent(),
            Path::new(DEFAULT_RUNTIME_ROOT).join("usr/servers/defaultServer/dropins")
        );
    }

    #[test]
    fn test_symlinked_source_links_to_real_path() {
        let real_dir = TempDir::new().unwrap();
        let holder = TempDir::new().unwrap();
        let alias = holder.path().join("alias");
        std::os::unix::fs::symlink(real_dir.path(), &alias).unwrap();

        let layer_dir = TempDir::new().unwrap();
        fs::create_dir_all(dropins_under(layer_dir.path())).unwrap();

        let linker = linker_for(&alias, layer_dir.path());
        let link = linker.link().unwrap();

        assert_eq!(
            fs::canonicalize(&link).unwrap(),
            fs::canonicalize(real_dir.path()).unwrap()
        );
    }
}
