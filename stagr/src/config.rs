//! Staging settings, embedded in the host application's config file.

use crate::policy::UploadPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Pre-select the last staged file after each intake
    #[serde(default)]
    pub focus_new_files: bool,

    /// Accepted formats, size limit and whether they are enforced
    #[serde(default)]
    pub policy: UploadPolicy,
}
