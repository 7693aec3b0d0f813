//! Blocking HTTP plumbing shared by the provider resolvers

use crate::config::ProviderConfig;
use crate::error::{BoxedSource, ProviderError};
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("artifactor/", env!("CARGO_PKG_VERSION"));

/// How the API token is presented to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenHeader {
    /// `Authorization: Bearer <token>` (GitHub)
    Bearer,
    /// `PRIVATE-TOKEN: <token>` (GitLab)
    PrivateToken,
}

/// Redirect handling for a provider's client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Redirects {
    Follow,
    Manual,
}

/// Blocking REST client rooted at a provider's API base URL
#[derive(Debug)]
pub(crate) struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// Build a client for one configured provider.
    ///
    /// TLS verification follows `config.insecure_skip_verify`; no timeout is
    /// applied unless `config.timeout_secs` is set.
    pub(crate) fn build(
        provider: &str,
        base_url: &str,
        config: &ProviderConfig,
        token_header: TokenHeader,
        redirects: Redirects,
    ) -> Result<Self, ProviderError> {
        let connect_err = |message: String, source: Option<BoxedSource>| ProviderError::Connect {
            provider: provider.to_string(),
            message,
            source,
        };

        let base = Url::parse(base_url.trim())
            .map_err(|e| connect_err(format!("invalid base url `{base_url}`"), Some(Box::new(e))))?;
        if base.cannot_be_a_base() {
            return Err(connect_err(format!("invalid base url `{base_url}`"), None));
        }

        let mut headers = HeaderMap::new();
        if !config.secret.is_empty() {
            let (name, value) = match token_header {
                TokenHeader::Bearer => (AUTHORIZATION, format!("Bearer {}", config.secret)),
                TokenHeader::PrivateToken => {
                    (HeaderName::from_static("private-token"), config.secret.clone())
                }
            };
            let mut value = HeaderValue::from_str(&value).map_err(|e| {
                connect_err("secret token is not a valid header value".to_string(), Some(Box::new(e)))
            })?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }

        let policy = match redirects {
            Redirects::Follow => Policy::default(),
            Redirects::Manual => Policy::none(),
        };

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .redirect(policy)
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()
            .map_err(|e| connect_err(format!("failed to build http client: {e}"), Some(Box::new(e))))?;

        Ok(Self { http, base })
    }

    /// API base URL this client is rooted at
    pub(crate) fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for the given path segments; each segment is escaped
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET a JSON document; non-2xx statuses are errors
    pub(crate) fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, reqwest::Error> {
        self.http
            .get(self.endpoint(segments))
            .header(ACCEPT, "application/json")
            .query(query)
            .send()?
            .error_for_status()?
            .json()
    }

    /// GET a raw response; the caller decides how to treat the status
    pub(crate) fn get_raw(&self, segments: &[&str], accept: &str) -> Result<Response, reqwest::Error> {
        self.http
            .get(self.endpoint(segments))
            .header(ACCEPT, accept)
            .send()
    }
}

/// Box a transport error as an error source
pub(crate) fn boxed(e: reqwest::Error) -> Option<BoxedSource> {
    Some(Box::new(e))
}
