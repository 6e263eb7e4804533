//! Build plan data model
//!
//! A detection pass produces a [`DetectResult`]: a pass/fail verdict plus, when
//! passing, a single [`BuildPlan`] declaring which capabilities this
//! application tree provides and which it still requires from other
//! participants. The platform reconciles plans across all detection passes;
//! this crate only populates the shape.
//!
//! Capability names are a closed vocabulary: [`PLAN_ENTRY_OPEN_LIBERTY`],
//! [`PLAN_ENTRY_JRE`], [`PLAN_ENTRY_JVM_APPLICATION_PACKAGE`]. Requirement
//! metadata is likewise a closed record rather than an open map, so the plan's
//! invariants stay checkable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability name for the Open Liberty runtime itself.
pub const PLAN_ENTRY_OPEN_LIBERTY: &str = "open-liberty";

/// Capability name for a Java runtime environment.
pub const PLAN_ENTRY_JRE: &str = "jre";

/// Capability name for a deployable JVM application archive.
pub const PLAN_ENTRY_JVM_APPLICATION_PACKAGE: &str = "jvm-application-package";

/// A capability this tree can satisfy for downstream providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provide {
    pub name: String,
}

impl Provide {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Hints attached to a requirement entry.
///
/// Fixed-shape by design: the platform only understands these four keys, so
/// the type enumerates them instead of carrying an open dictionary. Unset
/// flags are omitted from the serialized form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequireMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,

    #[serde(rename = "packaged-server", skip_serializing_if = "Option::is_none")]
    pub packaged_server: Option<bool>,
}

impl RequireMetadata {
    /// Metadata for a JRE requirement: needed at launch and build time, and
    /// worth caching between builds.
    pub fn launch_build_cache() -> Self {
        Self {
            launch: Some(true),
            build: Some(true),
            cache: Some(true),
            packaged_server: None,
        }
    }

    /// Metadata marking a requirement as originating from a packaged server.
    pub fn packaged_server() -> Self {
        Self {
            packaged_server: Some(true),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A capability this tree requires from some provider, with optional hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Require {
    pub name: String,

    #[serde(default, skip_serializing_if = "RequireMetadata::is_empty")]
    pub metadata: RequireMetadata,
}

impl Require {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            metadata: RequireMetadata::default(),
        }
    }

    pub fn with_metadata(name: &str, metadata: RequireMetadata) -> Self {
        Self {
            name: name.to_string(),
            metadata,
        }
    }
}

/// One plan alternative: what the tree provides and what it requires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    pub provides: Vec<Provide>,
    pub requires: Vec<Require>,
}

impl BuildPlan {
    pub fn provides(&self, name: &str) -> bool {
        self.provides.iter().any(|p| p.name == name)
    }

    pub fn requires(&self, name: &str) -> bool {
        self.requires.iter().any(|r| r.name == name)
    }

    pub fn require(&self, name: &str) -> Option<&Require> {
        self.requires.iter().find(|r| r.name == name)
    }
}

/// Outcome of one detection invocation.
///
/// `pass: false` is a normal negative result (the tree is not a fit), not an
/// error. When passing, exactly one plan is emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectResult {
    pub pass: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plans: Vec<BuildPlan>,
}

impl DetectResult {
    /// A non-passing result with no plan.
    pub fn fail() -> Self {
        Self::default()
    }

    /// A passing result carrying a single plan.
    pub fn pass(plan: BuildPlan) -> Self {
        Self {
            pass: true,
            plans: vec![plan],
        }
    }

    pub fn plan(&self) -> Option<&BuildPlan> {
        self.plans.first()
    }
}

impl fmt::Display for DetectResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.pass {
            return write!(f, "detection did not pass");
        }
        for plan in &self.plans {
            let provides: Vec<&str> = plan.provides.iter().map(|p| p.name.as_str()).collect();
            let requires: Vec<&str> = plan.requires.iter().map(|r| r.name.as_str()).collect();
            write!(
                f,
                "provides [{}], requires [{}]",
                provides.join(", "),
                requires.join(", ")
            )?;
        }
        Ok(())
    }
}
