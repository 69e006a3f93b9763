use reqwest::blocking::Client;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("network error: {0}")]
    Network(String),

    #[error("cover host answered with status {0}")]
    Status(u16),

    #[error("resource at the cover URL is '{0}', not an image")]
    NotAnImage(String),
}

pub struct Cover {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Blocking fetcher for remote cover images. Construct it outside any async
/// runtime (reqwest::blocking owns its own) and drive it via spawn_blocking.
pub struct CoverFetcher {
    client: Client,
}

impl CoverFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn fetch(&self, url: &str) -> Result<Cover, CoverError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| CoverError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(CoverError::Status(resp.status().as_u16()));
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        if !content_type.starts_with("image/") {
            return Err(CoverError::NotAnImage(content_type));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| CoverError::Network(e.to_string()))?
            .to_vec();

        Ok(Cover {
            bytes,
            content_type,
        })
    }
}

impl Default for CoverFetcher {
    fn default() -> Self {
        Self::new()
    }
}
