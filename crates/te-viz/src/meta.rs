//! Shared artifact metadata.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use te_core::{Error, Result};

/// Meta block carried by every artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMeta {
    /// Producing tool name.
    pub tool: String,
    /// Tool version.
    pub tool_version: String,
    /// Creation timestamp, milliseconds since the Unix epoch.
    pub created_unix_ms: u128,
    /// Input provenance, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<ArtifactInputMeta>,
}

/// Digests of the inputs an artifact was computed from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactInputMeta {
    /// sha256 of the scan spec file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_sha256: Option<String>,
}

fn now_unix_ms() -> Result<u128> {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::InvalidArgument(format!("system time error: {}", e)))?;
    Ok(d.as_millis())
}

impl ArtifactMeta {
    /// Meta block stamped with the current time and workspace version.
    pub fn new(input: Option<ArtifactInputMeta>) -> Result<Self> {
        Ok(Self {
            tool: "trigeff".to_string(),
            tool_version: te_core::VERSION.to_string(),
            created_unix_ms: now_unix_ms()?,
            input,
        })
    }
}
