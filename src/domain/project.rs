//! Project code to JIRA project id mapping

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Project id used for any code missing from the table (HGI Informatics)
pub const FALLBACK_PROJECT_ID: &str = "14101";

/// Static table mapping short project codes to JIRA's numeric project ids
///
/// Unknown codes resolve to `fallback` rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMapping {
    #[serde(default = "default_fallback")]
    pub fallback: String,

    #[serde(default = "default_codes")]
    pub codes: BTreeMap<String, String>,
}

fn default_fallback() -> String {
    FALLBACK_PROJECT_ID.to_string()
}

fn default_codes() -> BTreeMap<String, String> {
    [
        ("HI", "14101"),  // HGI Informatics
        ("HB", "14800"),  // HGI Bioinformatics
        ("HSF", "14300"), // HGI Software Farmers
        ("HSH", "14301"), // HGI Software HailQC
        ("HSI", "14200"), // HGI Software iBackup
        ("HSS", "14202"), // HGI Software Softpack
        ("HSW", "14201"), // HGI Software wrstat
    ]
    .into_iter()
    .map(|(code, id)| (code.to_string(), id.to_string()))
    .collect()
}

impl Default for ProjectMapping {
    fn default() -> Self {
        Self {
            fallback: default_fallback(),
            codes: default_codes(),
        }
    }
}

impl ProjectMapping {
    /// Numeric project id for `code`, or the fallback id
    pub fn resolve(&self, code: &str) -> &str {
        self.codes
            .get(code)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }
}
