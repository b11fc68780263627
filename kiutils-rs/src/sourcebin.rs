//! Uploading snippets to sourceb.in.

use crate::error::{KiutilsError, Result};
use crate::REQWEST_CLIENT;
use log::info;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOURCEBIN_URL: &str = "https://sourceb.in";

#[derive(Debug, Serialize)]
struct BinFile<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateBin<'a> {
    files: Vec<BinFile<'a>>,
}

#[derive(Debug, Deserialize)]
struct CreatedBin {
    key: String,
}

/// Client for the sourceb.in paste service.
#[derive(Debug, Clone)]
pub struct BinClient {
    client: Client,
    base_url: String,
}

impl Default for BinClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BinClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_SOURCEBIN_URL)
    }

    /// Client for another sourceb.in deployment. Bins are created under
    /// `{base_url}/api/bins` and linked as `{base_url}/{key}`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: REQWEST_CLIENT.clone(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Upload `code` as a single-file bin and return its URL.
    pub async fn upload(&self, code: &str) -> Result<String> {
        if code.is_empty() {
            return Err(KiutilsError::InvalidArgument(
                "code to upload must not be empty".to_string(),
            ));
        }

        let body = CreateBin {
            files: vec![BinFile { content: code }],
        };
        let created: CreatedBin = self
            .client
            .post(format!("{}/api/bins", self.base_url))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let url = format!("{}/{}", self.base_url, created.key);
        info!("Uploaded {} bytes to {url}", code.len());
        Ok(url)
    }
}
