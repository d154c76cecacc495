use std::collections::BTreeMap;
use std::path::Path;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;

use crate::error::{AppError, AppResult, HttpError, ValidationError};

/// Secrets longer than this keep a short prefix and suffix when logged.
const MASK_MIN_CHARS: usize = 16;
const MASK_PREFIX_CHARS: usize = 10;
const MASK_SUFFIX_CHARS: usize = 6;

/// The fixed POST every attempt of every slot sends.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    url: Url,
    headers: HeaderMap,
    body: Value,
}

impl RequestSpec {
    /// Builds the request from a URL, optional bearer token, extra headers and JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is not http(s) or a header is invalid.
    pub fn new(
        url: &str,
        token: Option<&str>,
        extra_headers: &[(String, String)],
        body: Value,
    ) -> Result<Self, ValidationError> {
        let url = Url::parse(url).map_err(|err| ValidationError::InvalidUrl {
            url: url.to_owned(),
            source: err,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::UnsupportedScheme {
                scheme: url.scheme().to_owned(),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|err| {
                ValidationError::InvalidHeaderValue {
                    name: AUTHORIZATION.as_str().to_owned(),
                    source: err,
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        for (key, value) in extra_headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|err| {
                ValidationError::InvalidHeaderName {
                    name: key.clone(),
                    source: err,
                }
            })?;
            let value =
                HeaderValue::from_str(value).map_err(|err| ValidationError::InvalidHeaderValue {
                    name: key.clone(),
                    source: err,
                })?;
            headers.insert(name, value);
        }

        Ok(Self { url, headers, body })
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Header map safe to print: the Authorization value is masked.
    #[must_use]
    pub fn masked_headers(&self) -> BTreeMap<String, String> {
        self.headers
            .iter()
            .map(|(name, value)| {
                let text = value.to_str().unwrap_or("<binary>");
                let shown = if *name == AUTHORIZATION {
                    mask_secret(text)
                } else {
                    text.to_owned()
                };
                (name.as_str().to_owned(), shown)
            })
            .collect()
    }

    pub(crate) fn build(&self, client: &Client) -> RequestBuilder {
        client
            .post(self.url.clone())
            .headers(self.headers.clone())
            .json(&self.body)
    }
}

/// Keeps the first 10 and last 6 characters of a long secret.
#[must_use]
pub fn mask_secret(value: &str) -> String {
    let count = value.chars().count();
    if count <= MASK_MIN_CHARS {
        return value.to_owned();
    }
    let prefix: String = value.chars().take(MASK_PREFIX_CHARS).collect();
    let suffix: String = value
        .chars()
        .skip(count.saturating_sub(MASK_SUFFIX_CHARS))
        .collect();
    format!("{}...{}", prefix, suffix)
}

/// Resolves the JSON body from inline data, a file, or an empty object.
///
/// # Errors
///
/// Returns an error when both sources are given, the file cannot be read, or
/// the text is not JSON.
pub fn load_body(data: Option<&str>, data_file: Option<&str>) -> AppResult<Value> {
    let text = match (data, data_file) {
        (Some(_), Some(_)) => {
            return Err(AppError::validation(
                ValidationError::DataAndDataFileConflict,
            ));
        }
        (Some(data), None) => data.to_owned(),
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|err| {
            AppError::http(HttpError::ReadBodyFile {
                path: Path::new(path).to_path_buf(),
                source: err,
            })
        })?,
        (None, None) => return Ok(Value::Object(serde_json::Map::new())),
    };
    serde_json::from_str(&text)
        .map_err(|err| AppError::validation(ValidationError::InvalidBody { source: err }))
}
