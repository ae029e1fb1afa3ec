#![allow(dead_code)]

use serde_json::{Value, json};

/// Builder for one release entry of a listing response, as served by the
/// mock release API in tests.
pub struct ReleaseBuilder {
    tag_name: String,
    assets: Vec<Value>,
}

impl ReleaseBuilder {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            assets: Vec::new(),
        }
    }

    /// Attach an asset with an absolute download URL.
    pub fn with_asset(mut self, name: &str, download_url: &str) -> Self {
        self.assets.push(json!({
            "name": name,
            "browser_download_url": download_url,
        }));
        self
    }

    pub fn build(self) -> Value {
        json!({
            "tag_name": self.tag_name,
            "assets": self.assets,
        })
    }
}

/// Combine releases into a listing body.
pub fn listing(releases: Vec<Value>) -> Value {
    Value::Array(releases)
}
