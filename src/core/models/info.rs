//! Shared model info type (no dependencies on cache or probes).

use serde::{Deserialize, Serialize};

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;

/// One catalog entry as reported by the daemon's listing endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model name with tag suffix (e.g. "llama3.2:latest"). Unique within a catalog.
    pub name: String,
    /// On-disk size in bytes; 0 when unknown.
    #[serde(default)]
    pub size_bytes: u64,
    /// Parameter count as reported (e.g. "3.2B"); empty when unknown.
    #[serde(default)]
    pub parameter_size: String,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>, size_bytes: u64, parameter_size: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            parameter_size: parameter_size.into(),
        }
    }

    /// Picker label: name plus "(param_size, size)" listing only the parts that are known.
    pub fn label(&self) -> String {
        let mut details = Vec::with_capacity(2);
        if !self.parameter_size.is_empty() {
            details.push(self.parameter_size.clone());
        }
        if self.size_bytes > 0 {
            details.push(format_size(self.size_bytes));
        }
        if details.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, details.join(", "))
        }
    }
}

/// Format a byte count in compact binary units: 4000000000 -> "3.7GB", 5242880 -> "5MB".
pub fn format_size(bytes: u64) -> String {
    let b = bytes as f64;
    if b >= GIB {
        format!("{:.1}GB", b / GIB)
    } else if b >= MIB {
        format!("{:.0}MB", b / MIB)
    } else if b >= KIB {
        format!("{:.0}KB", b / KIB)
    } else {
        format!("{}B", bytes)
    }
}
