//! Creatio instance URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{ConfigError, Error};

/// Path of the session login endpoint, relative to the instance root.
pub const LOGIN_PATH: &str = "ServiceModel/AuthService.svc/Login";

/// Root segment of the OData service, relative to the instance root.
pub const ODATA_ROOT: &str = "0/odata/";

/// Root segment of the platform REST services (file API and friends).
pub const REST_ROOT: &str = "0/rest/";

/// A validated base URL of a Creatio instance.
///
/// The platform's endpoints all hang off this root at fixed, contractual
/// paths; this type derives them rather than letting callers concatenate
/// strings.
///
/// # Example
///
/// ```
/// use creatio_core::ServiceUrl;
///
/// let url = ServiceUrl::new("https://mycompany.creatio.com").unwrap();
/// assert_eq!(
///     url.odata_url("Case"),
///     "https://mycompany.creatio.com/0/odata/Case"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServiceUrl(Url);

impl ServiceUrl {
    /// Create a new service URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the URL is relative, uses a scheme other
    /// than HTTPS (HTTP is allowed for localhost only), or has no host.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        if s.trim().is_empty() {
            return Err(ConfigError::ServiceUrl {
                value: s.to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        let url = Url::parse(s).map_err(|e| ConfigError::ServiceUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        // Normalize: remove trailing slash so joined paths are predictable
        let normalized = if url.path() == "/" {
            let mut u = url.clone();
            u.set_path("");
            u
        } else {
            url
        };

        Ok(Self(normalized))
    }

    /// Returns the absolute URL of the session login endpoint.
    pub fn login_url(&self) -> String {
        self.join(LOGIN_PATH)
    }

    /// Returns the absolute URL of an OData path (collection, record, ...).
    pub fn odata_url(&self, path: &str) -> String {
        self.join(&format!("{ODATA_ROOT}{path}"))
    }

    /// Returns the absolute URL of a REST service path.
    pub fn rest_url(&self, path: &str) -> String {
        self.join(&format!("{REST_ROOT}{path}"))
    }

    fn join(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        format!("{base}/{path}")
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(ConfigError::ServiceUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "::1");

        let scheme = url.scheme();
        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(ConfigError::ServiceUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(ConfigError::ServiceUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for ServiceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServiceUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ServiceUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ServiceUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ServiceUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for ServiceUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
