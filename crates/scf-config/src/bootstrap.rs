//! Settings for the configuration-document import.

use scf_core::input::SCF_CONFIG_VERSION;
use serde::{Deserialize, Serialize};

fn default_required_version() -> String {
    SCF_CONFIG_VERSION.to_string()
}

fn default_domain() -> String {
    "Uncategorized".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BootstrapConfig {
    /// `version` every submitted document must declare.
    #[serde(default = "default_required_version")]
    pub require_config_version: String,

    /// Domain page that controls with a blank domain are grouped under.
    #[serde(default = "default_domain")]
    pub default_domain: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            require_config_version: default_required_version(),
            default_domain: default_domain(),
        }
    }
}
