//! One-shot build metadata record.
//!
//! The values are captured by `build.rs` at compile time: the toolchain
//! version always (when `rustc --version` succeeds), the git revision, commit
//! time and dirty flag only when the crate was built from a git checkout.

use serde::Serialize;

use crate::logger::Logger;

/// Toolchain and version-control details of the running binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub rustc_version: String,
    pub vcs: Option<String>,
    pub vcs_revision: Option<String>,
    pub vcs_time: Option<String>,
    pub vcs_modified: Option<bool>,
}

impl BuildInfo {
    pub fn new(rustc_version: impl Into<String>) -> Self {
        Self {
            rustc_version: rustc_version.into(),
            vcs: None,
            vcs_revision: None,
            vcs_time: None,
            vcs_modified: None,
        }
    }

    pub fn with_vcs(
        mut self,
        revision: impl Into<String>,
        time: Option<String>,
        modified: Option<bool>,
    ) -> Self {
        self.vcs = Some("git".to_string());
        self.vcs_revision = Some(revision.into());
        self.vcs_time = time;
        self.vcs_modified = modified;
        self
    }

    /// Metadata captured when this crate was compiled, if any.
    pub fn detect() -> Option<BuildInfo> {
        let rustc_version = option_env!("TRACELEVEL_RUSTC_VERSION")?;
        let info = BuildInfo::new(rustc_version);
        Some(match option_env!("TRACELEVEL_VCS_REVISION") {
            Some(revision) => info.with_vcs(
                revision,
                option_env!("TRACELEVEL_VCS_TIME").map(str::to_string),
                option_env!("TRACELEVEL_VCS_MODIFIED").map(|m| m == "true"),
            ),
            None => info,
        })
    }

    /// Emit a single info-level `build info` record through `logger`.
    pub fn log(&self, logger: &Logger) {
        logger.in_scope(|| {
            tracing::info!(
                rustc_version = %self.rustc_version,
                vcs = self.vcs.as_deref(),
                vcs.revision = self.vcs_revision.as_deref(),
                vcs.time = self.vcs_time.as_deref(),
                vcs.modified = self.vcs_modified,
                "build info"
            );
        });
    }
}

/// Log the compile-time build metadata. Returns `false` if none was captured.
pub fn log_build_info(logger: &Logger) -> bool {
    match BuildInfo::detect() {
        Some(info) => {
            info.log(logger);
            true
        }
        None => false,
    }
}
