// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Network configuration types

use serde::{Deserialize, Serialize};

/// Network configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Workspace service base URL
    #[serde(rename = "service-base-url")]
    pub service_base_url: Option<String>,
}

impl NetworkConfig {
    /// Base URL from config, falling back to `WB_SERVICE_URI`, then to
    /// the local development default.
    pub fn resolve_base_url(&self) -> String {
        self.service_base_url
            .clone()
            .or_else(|| std::env::var("WB_SERVICE_URI").ok())
            .unwrap_or_else(|| "http://localhost:3001".to_string())
    }
}
