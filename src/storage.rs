use crate::config::Config;
use crate::error::StoreError;
use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

/// A flat namespace of named blobs (a bucket, a prefix of one, a test double)
pub trait ObjectStore: Send + Sync {
    /// Every object name, in listing order
    fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Download one object's bytes
    fn fetch(&self, name: &str) -> Result<Vec<u8>, StoreError>;
}

/// Google Cloud Storage bucket accessed through the JSON API
pub struct GcsBucket {
    client: Client,
    endpoint: String,
    bucket: String,
    prefix: Option<String>,
    access_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectPage {
    #[serde(default)]
    items: Vec<ObjectItem>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct ObjectItem {
    name: String,
}

impl GcsBucket {
    pub fn new(endpoint: &str, bucket: &str, access_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            prefix: None,
            access_token,
        }
    }

    /// Bucket from `[storage]`, token from config or `GCS_ACCESS_TOKEN`
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.storage.endpoint,
            &config.storage.bucket,
            config.storage_access_token(),
        )
    }

    /// Restrict listing to names starting with `prefix`
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    fn objects_url(&self) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| StoreError::Url(format!("{}: {}", self.endpoint, e)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Url(format!("{} cannot be a base URL", self.endpoint)))?
            .pop_if_empty()
            .extend(["storage", "v1", "b", self.bucket.as_str(), "o"]);
        Ok(url)
    }

    fn list_url(&self, page_token: Option<&str>) -> Result<Url, StoreError> {
        let mut url = self.objects_url()?;
        let pairs: Vec<(&str, &str)> = [("prefix", self.prefix.as_deref()), ("pageToken", page_token)]
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key, value)))
            .collect();
        // an untouched query keeps the URL free of a dangling '?'
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    /// Media download URL; the object name is a single escaped path segment
    fn media_url(&self, name: &str) -> Result<Url, StoreError> {
        let mut url = self.objects_url()?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Url(format!("{} cannot be a base URL", self.endpoint)))?
            .push(name);
        url.query_pairs_mut().append_pair("alt", "media");
        Ok(url)
    }

    fn get(&self, url: Url) -> Result<Response, StoreError> {
        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|source| StoreError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(StoreError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        Ok(response)
    }
}

impl ObjectStore for GcsBucket {
    fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = self.list_url(page_token.as_deref())?;
            let page: ObjectPage = self.get(url.clone())?.json().map_err(|source| StoreError::Http {
                url: url.to_string(),
                source,
            })?;

            debug!("Listed {} objects from gs://{}", page.items.len(), self.bucket);
            names.extend(page.items.into_iter().map(|item| item.name));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(names)
    }

    fn fetch(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let url = self.media_url(name)?;
        debug!("Downloading gs://{}/{}", self.bucket, name);
        let bytes = self.get(url.clone())?.bytes().map_err(|source| StoreError::Http {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}
