//! Detection engine
//!
//! Decides whether an application tree is a packaged Liberty server
//! distribution or a raw JVM application, and emits the matching build plan.
//! The decision is a pure function of the tree and the resolved server name;
//! there is no state carried between invocations.
//!
//! Two terminal branches:
//! - **Packaged server**: `wlp/usr/servers/<name>/server.xml` exists in the
//!   tree. Detection always passes, and the requirement on `open-liberty` is
//!   flagged `packaged-server`. If the server already ships applications, the
//!   tree provides `jvm-application-package` itself.
//! - **Application**: a tree whose manifest declares `Main-Class` is a
//!   standalone runnable artifact, not something this buildpack hosts, so
//!   detection returns a normal non-pass. Otherwise the tree passes; a
//!   compiled archive additionally provides `jvm-application-package`, while
//!   exploded sources leave that requirement for downstream packaging.

use crate::config::DetectConfig;
use crate::plan::{
    BuildPlan, DetectResult, Provide, Require, RequireMetadata, PLAN_ENTRY_JRE,
    PLAN_ENTRY_JVM_APPLICATION_PACKAGE, PLAN_ENTRY_OPEN_LIBERTY,
};
use crate::probe::{self, ProbeError};
use crate::server::{LibertyServer, ServerError};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum DetectError {
    /// A probe found an artifact it could not read.
    #[error("probe failed: {0}")]
    Probe(#[from] ProbeError),

    /// The packaged server's descriptor could not be inspected.
    #[error("unable to check if packaged server has apps: {0}")]
    Server(#[from] ServerError),
}

/// Runs detection over an application tree.
///
/// Probe failures abort detection and are reported to the caller; they are
/// never treated as "not a packaged server". A negative verdict is expressed
/// as `pass: false` in the result, not as an error.
pub fn detect(app_root: &Path, config: &DetectConfig) -> Result<DetectResult, DetectError> {
    if probe::has_packaged_server(app_root, &config.server_name)? {
        detect_packaged_server(app_root, &config.server_name)
    } else {
        detect_application(app_root)
    }
}

/// Handles a tree that carries its own `wlp` server installation.
fn detect_packaged_server(app_root: &Path, server_name: &str) -> Result<DetectResult, DetectError> {
    let server = LibertyServer::new(&app_root.join("wlp"), server_name);
    let has_apps = server.has_installed_apps()?;
    info!(server_name, has_apps, "detected packaged Liberty server");

    let mut plan = BuildPlan {
        provides: vec![Provide::new(PLAN_ENTRY_OPEN_LIBERTY)],
        requires: vec![
            Require::with_metadata(PLAN_ENTRY_JRE, RequireMetadata::launch_build_cache()),
            Require::new(PLAN_ENTRY_JVM_APPLICATION_PACKAGE),
            Require::with_metadata(PLAN_ENTRY_OPEN_LIBERTY, RequireMetadata::packaged_server()),
        ],
    };

    // A server that already ships applications satisfies the packaging
    // requirement itself.
    if has_apps {
        plan.provides
            .push(Provide::new(PLAN_ENTRY_JVM_APPLICATION_PACKAGE));
    }

    Ok(DetectResult::pass(plan))
}

/// Handles a raw application tree. Passes iff no `Main-Class` is declared;
/// a compiled artifact marks the `jvm-application-package` requirement as
/// already met.
fn detect_application(app_root: &Path) -> Result<DetectResult, DetectError> {
    if probe::manifest_has_main_class(app_root)? {
        debug!("manifest declares Main-Class, tree is a standalone runnable artifact");
        return Ok(DetectResult::fail());
    }

    let is_app_package = probe::is_jvm_application_package(app_root)?;
    info!(is_app_package, "detected JVM application");

    let mut plan = BuildPlan {
        provides: vec![Provide::new(PLAN_ENTRY_OPEN_LIBERTY)],
        requires: vec![
            Require::with_metadata(PLAN_ENTRY_JRE, RequireMetadata::launch_build_cache()),
            Require::new(PLAN_ENTRY_JVM_APPLICATION_PACKAGE),
            Require::new(PLAN_ENTRY_OPEN_LIBERTY),
        ],
    };

    if is_app_package {
        plan.provides
            .push(Provide::new(PLAN_ENTRY_JVM_APPLICATION_PACKAGE));
    }

    Ok(DetectResult::pass(plan))
}
