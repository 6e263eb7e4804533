//! libertypack - buildpack detection and drop-in linking for Open Liberty
//!
//! This library decides whether an application tree is a raw JVM application
//! that still needs a runtime server, or an already-packaged Liberty server
//! distribution, and emits a build plan declaring what the tree provides and
//! what it requires. It also wires an application directory into a runtime's
//! dropins location with a symlink, without copying bytes.
//!
//! # Core Concepts
//!
//! - **Detection**: inspecting filesystem artifacts (a packaged-server
//!   descriptor, a JAR manifest, compiled-archive markers) to choose between
//!   the packaged-server and application branches
//! - **Build plan**: the provides/requires capability sets handed to an
//!   external platform for reconciliation across providers
//! - **Drop-in linking**: an idempotent symlink at
//!   `<runtime_root>/usr/servers/<name>/dropins/<app>` pointing at the
//!   application directory
//!
//! # Example Usage
//!
//! ```no_run
//! use libertypack::{detect, DetectConfig};
//! use std::path::Path;
//!
//! fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DetectConfig::from_env()?;
//!     let result = detect(Path::new("/workspace"), &config)?;
//!
//!     if result.pass {
//!         println!("{}", serde_json::to_string_pretty(&result)?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`probe`]: stateless filesystem predicates over the application tree
//! - [`detect`]: the two-branch decision engine
//! - [`plan`]: build plan data model
//! - [`server`]: packaged Liberty server introspection
//! - [`linker`]: drop-in directory linking

// Public modules
pub mod cli;
pub mod config;
pub mod detect;
pub mod linker;
pub mod plan;
pub mod probe;
pub mod server;

// Re-export key types for convenient access
pub use config::{ConfigError, DetectConfig, DEFAULT_SERVER_NAME};
pub use detect::{detect, DetectError};
pub use linker::{FileLinker, LinkError, LinkerConfig};
pub use plan::{BuildPlan, DetectResult, Provide, Require, RequireMetadata};
pub use probe::ProbeError;
pub use server::{LibertyServer, ServerError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
