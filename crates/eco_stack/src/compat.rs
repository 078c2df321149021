//! Detection of co-installed extensions that conflict with merging.
//!
//! Some extensions merge drops or orbs on their own. Running both merge
//! passes fights over the same objects, so the conflicting handling is
//! switched off here instead of aborting startup.

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Groups experience orbs on its own.
pub const CLUMPS_ID: &str = "clumps";
/// Groups item drops on its own.
pub const GET_IT_TOGETHER_DROPS_ID: &str = "getittogetherdrops";
/// Its items carry custom state and are excluded from merging.
pub const CREATE_ID: &str = "create";

/// Which extensions were found and what that disables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub clumps_loaded: bool,
    pub get_it_together_drops_loaded: bool,
    pub create_loaded: bool,
}

impl CompatibilityReport {
    /// Builds a report from the ids of every loaded extension.
    pub fn detect<I, S>(loaded_extension_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = Self::default();
        for id in loaded_extension_ids {
            match id.as_ref().trim().to_ascii_lowercase().as_str() {
                CLUMPS_ID => report.clumps_loaded = true,
                GET_IT_TOGETHER_DROPS_ID => report.get_it_together_drops_loaded = true,
                CREATE_ID => report.create_loaded = true,
                _ => {}
            }
        }
        report
    }

    pub fn items_enabled(&self) -> bool {
        !self.get_it_together_drops_loaded
    }

    pub fn orbs_enabled(&self) -> bool {
        !self.clumps_loaded
    }

    /// Emits the startup messages for every detected conflict.
    pub fn log(&self) {
        info!("Checking for additional extensions to avoid incompatibilities ...");

        if self.clumps_loaded {
            error!(
                "{} groups experience orbs into a single entity, which conflicts with experience orb merging!",
                CLUMPS_ID
            );
            warn!("Don't use both optimizations together! Experience orb merging is disabled.");
        }

        if self.create_loaded {
            warn!("{} items are excluded from merging.", CREATE_ID);
        }

        if self.get_it_together_drops_loaded {
            error!(
                "{} groups item drops together, which conflicts with item merging!",
                GET_IT_TOGETHER_DROPS_ID
            );
            warn!("Don't use both optimizations together! Item merging is disabled.");
        }
    }
}
