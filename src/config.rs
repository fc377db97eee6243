use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_API_BASE: &str = "/server";
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://firebasestorage.googleapis.com";

/// Where uploaded avatars go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_STORAGE_ENDPOINT.to_string(),
            bucket: String::new(),
        }
    }
}

impl StorageConfig {
    /// `{endpoint}/v0/b/{bucket}/o`
    fn objects(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.endpoint)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["v0", "b", self.bucket.as_str(), "o"]);
        Ok(url)
    }

    pub fn upload_url(&self, object_name: &str) -> Result<String, url::ParseError> {
        let mut url = self.objects()?;
        url.query_pairs_mut().append_pair("name", object_name);
        Ok(url.into())
    }

    /// Public URL of an uploaded object. The name is encoded as one path segment.
    pub fn download_url(&self, object_name: &str, token: &str) -> Result<String, url::ParseError> {
        let mut url = self.objects()?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(object_name);
        url.query_pairs_mut()
            .append_pair("alt", "media")
            .append_pair("token", token);
        Ok(url.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Prefix of every backend route, `/server` behind the dev proxy.
    pub api_base: String,
    pub storage: StorageConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            storage: StorageConfig::default(),
        }
    }
}

impl AppConfig {
    /// Values baked in by the bundler at compile time.
    pub fn from_build_env() -> Self {
        let mut config = Self::default();
        if let Some(base) = option_env!("ESTATE_API_BASE") {
            config.api_base = base.to_string();
        }
        if let Some(endpoint) = option_env!("ESTATE_STORAGE_ENDPOINT") {
            config.storage.endpoint = endpoint.to_string();
        }
        if let Some(bucket) = option_env!("ESTATE_STORAGE_BUCKET") {
            config.storage.bucket = bucket.to_string();
        }
        if config.storage.bucket.is_empty() {
            log::warn!("ESTATE_STORAGE_BUCKET was not set at build time, avatar uploads will fail");
        }
        config
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> StorageConfig {
        StorageConfig {
            bucket: "estate-app.appspot.com".to_string(),
            ..StorageConfig::default()
        }
    }

    #[test]
    fn endpoint_joins_with_single_slash() {
        let config = AppConfig::default();
        assert_eq!(config.endpoint("user/update/42"), "/server/user/update/42");
        assert_eq!(config.endpoint("/auth/signout"), "/server/auth/signout");

        let trailing = AppConfig {
            api_base: "https://api.example.com/server/".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(
            trailing.endpoint("/user/listings/7"),
            "https://api.example.com/server/user/listings/7"
        );
    }

    #[test]
    fn upload_url_carries_object_name_as_query() {
        let url = storage().upload_url("1700000000000house.png").unwrap();
        assert_eq!(
            url,
            "https://firebasestorage.googleapis.com/v0/b/estate-app.appspot.com/o?name=1700000000000house.png"
        );
    }

    #[test]
    fn download_url_encodes_name_as_one_segment() {
        let url = storage().download_url("17 front/door.png", "tok-1").unwrap();
        assert_eq!(
            url,
            "https://firebasestorage.googleapis.com/v0/b/estate-app.appspot.com/o/17%20front%2Fdoor.png?alt=media&token=tok-1"
        );
    }

    #[test]
    fn invalid_endpoint_is_reported() {
        let config = StorageConfig {
            endpoint: "not a url".to_string(),
            bucket: "b".to_string(),
        };
        assert!(config.upload_url("x").is_err());
    }

    #[test]
    fn partial_config_deserializes_with_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "storage": { "bucket": "b" } }"#).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.storage.endpoint, DEFAULT_STORAGE_ENDPOINT);
        assert_eq!(config.storage.bucket, "b");
    }
}
