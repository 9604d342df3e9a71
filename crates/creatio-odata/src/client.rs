//! Creatio session client.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use reqwest::header::{ACCEPT, COOKIE, HeaderMap, HeaderValue, SET_COOKIE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use creatio_core::{
    AuthError, ConfigError, Credentials, Error, RecordId, Result, ServiceUrl, TransportError,
};

use crate::endpoints::{
    CSRF_COOKIE, CSRF_HEADER, FORCE_USE_SESSION_HEADER, LoginRequest, LoginResponse,
    METADATA_SEGMENT, ODATA_ACCEPT,
};
use crate::query::QueryOptions;
use crate::response::ApiResponse;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a [`SessionClient`].
///
/// Credentials are explicit configuration: the client never consults the
/// process environment. Resolve environment variables at the application
/// boundary (see the CLI crate) and pass the result in here.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Creatio instance.
    pub base_url: ServiceUrl,
    /// Default credentials for [`SessionClient::authenticate`].
    pub credentials: Option<Credentials>,
    /// Per-request timeout, passed through to the HTTP transport.
    pub timeout: Duration,
    /// Connection timeout, passed through to the HTTP transport.
    pub connect_timeout: Duration,
    /// Pre-existing session state to resume instead of logging in.
    pub session: Option<SessionState>,
}

impl ClientConfig {
    /// Create a configuration with default timeouts and no credentials.
    pub fn new(base_url: ServiceUrl) -> Self {
        Self {
            base_url,
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            session: None,
        }
    }

    /// Set default credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Resume from a previously exported session snapshot.
    pub fn session(mut self, session: SessionState) -> Self {
        self.session = Some(session);
        self
    }
}

/// Exported session cookie snapshot.
///
/// Serializable so callers can persist a session across processes and hand
/// it back via [`ClientConfig::session`] or
/// [`SessionClient::restore_session`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Cookie name to value, as captured from the service.
    pub cookies: BTreeMap<String, String>,
}

impl SessionState {
    /// Returns true if the snapshot carries the anti-forgery cookie and can
    /// therefore back an authenticated client.
    pub fn is_authenticated(&self) -> bool {
        self.cookies.get(CSRF_COOKIE).is_some_and(|v| !v.is_empty())
    }
}

/// Stateful client for a Creatio instance.
///
/// Holds the session cookies and anti-forgery token obtained at login and
/// replays them on every call. All state mutation goes through `&mut self`;
/// the type performs no internal locking, so sharing one client between
/// tasks requires external synchronization by the caller.
///
/// HTTP-level failures are not errors: any response the service produced,
/// 2xx or not, comes back as an [`ApiResponse`] for the caller to inspect.
/// Only transport faults and precondition violations use [`Error`].
///
/// # Example
///
/// ```no_run
/// use creatio_core::{Credentials, ServiceUrl};
/// use creatio_odata::{ClientConfig, QueryOptions, SessionClient};
///
/// # async fn example() -> creatio_core::Result<()> {
/// let url = ServiceUrl::new("https://mycompany.creatio.com")?;
/// let config = ClientConfig::new(url).credentials(Credentials::new("Supervisor", "secret"));
/// let mut client = SessionClient::new(config)?;
///
/// client.authenticate(None).await?;
/// let cases = client
///     .get_collection_data("Case", None, &QueryOptions::new().top(5))
///     .await?;
/// println!("{}", cases.json()?);
/// # Ok(())
/// # }
/// ```
pub struct SessionClient {
    http: reqwest::Client,
    base_url: ServiceUrl,
    credentials: Option<Credentials>,
    cookies: BTreeMap<String, String>,
    csrf_token: Option<String>,
    authenticated: bool,
    api_calls: u64,
}

impl SessionClient {
    /// Create a new client. No network activity happens here.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("creatio-rs/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(transport_error)?;

        let mut client = Self {
            http,
            base_url: config.base_url,
            credentials: config.credentials,
            cookies: BTreeMap::new(),
            csrf_token: None,
            authenticated: false,
            api_calls: 0,
        };

        if let Some(session) = config.session {
            client.restore_session(session);
        }

        Ok(client)
    }

    /// Authenticate against the session login endpoint.
    ///
    /// Uses the explicit `credentials` when given, otherwise the configured
    /// defaults. On HTTP 200 the session cookies are captured and the
    /// anti-forgery token extracted; any other status is returned as data
    /// with the client left unauthenticated, for the caller to interpret.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingCredentials`] when no credentials are
    ///   resolvable.
    /// - [`AuthError::LoginRejected`] when the platform answers 200 with an
    ///   `Exception` payload (its way of refusing credentials).
    /// - [`AuthError::MissingCsrfCookie`] when a 200 login does not set the
    ///   anti-forgery cookie; such a session could never issue a mutating
    ///   request.
    #[instrument(skip(self, credentials), fields(base_url = %self.base_url))]
    pub async fn authenticate(&mut self, credentials: Option<&Credentials>) -> Result<ApiResponse> {
        let creds = match credentials.or(self.credentials.as_ref()) {
            Some(c) => c.clone(),
            None => return Err(ConfigError::MissingCredentials.into()),
        };
        debug!(username = creds.username(), "logging in");

        // A fresh login invalidates whatever session was stored before
        self.cookies.clear();
        self.csrf_token = None;
        self.authenticated = false;

        let url = self.base_url.login_url();
        let body = LoginRequest {
            username: creds.username(),
            password: creds.password(),
        };
        let headers = self.session_headers(&Method::POST, creatio_core::LOGIN_PATH);
        let request = self.http.post(&url).headers(headers).json(&body);
        let response = self.dispatch(request).await?;

        if response.status() != StatusCode::OK {
            debug!(status = %response.status(), "login answered non-200");
            return Ok(response);
        }

        if let Some(login) = response
            .json_opt()
            .and_then(|v| serde_json::from_value::<LoginResponse>(v).ok())
            && login.is_rejected()
        {
            return Err(AuthError::LoginRejected {
                message: login.rejection_message(),
            }
            .into());
        }

        match self.cookies.get(CSRF_COOKIE) {
            Some(token) if !token.is_empty() => {
                self.csrf_token = Some(token.clone());
                self.authenticated = true;
                debug!("session established");
                Ok(response)
            }
            _ => Err(AuthError::MissingCsrfCookie.into()),
        }
    }

    /// Issue a generic request against the OData service root.
    ///
    /// This is the primitive under every collection operation. The URL is
    /// base URL + OData root + `path`. Verbs other than GET carry the
    /// anti-forgery token header; GET omits it. The request counter
    /// increments exactly once per call, whatever the outcome. No status
    /// branching happens here.
    ///
    /// # Errors
    ///
    /// [`AuthError::AuthenticationRequired`] before a successful login; no
    /// network call is made in that case. Transport faults propagate.
    #[instrument(skip(self, body, params, extra_headers), fields(base_url = %self.base_url))]
    pub async fn request(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        params: Option<&[(String, String)]>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<ApiResponse> {
        if !self.authenticated {
            return Err(AuthError::AuthenticationRequired.into());
        }

        let url = self.base_url.odata_url(path);
        debug!(%method, path, "OData request");

        // Session headers win over caller-supplied extras
        let mut headers = extra_headers.unwrap_or_default();
        headers.extend(self.session_headers(&method, path));

        let mut request = self.http.request(method, &url).headers(headers);
        if let Some(pairs) = params
            && !pairs.is_empty()
        {
            request = request.query(&pairs);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        self.dispatch(request).await
    }

    /// Fetch collection data, a single record, or a field projection.
    ///
    /// `record_id` narrows the path to `<collection>(<id>)`; `options`
    /// carries the OData query options, passed through opaquely. A missing
    /// record is an ordinary 404 response, not an error.
    #[instrument(skip(self, options), fields(base_url = %self.base_url))]
    pub async fn get_collection_data(
        &mut self,
        collection: &str,
        record_id: Option<&RecordId>,
        options: &QueryOptions,
    ) -> Result<ApiResponse> {
        let mut path = collection.to_string();
        if let Some(id) = record_id {
            path.push_str(&format!("({id})"));
        }
        if let Some(field) = options.value_field() {
            path.push_str(&format!("/{field}/$value"));
        }

        let pairs = options.to_pairs();
        let params = (!pairs.is_empty()).then_some(pairs.as_slice());
        self.request(Method::GET, &path, None, params, None).await
    }

    /// Create a record. A 201 response body carries the server-assigned
    /// `Id` and computed fields.
    #[instrument(skip(self, data), fields(base_url = %self.base_url))]
    pub async fn add_collection_data(
        &mut self,
        collection: &str,
        data: &Value,
    ) -> Result<ApiResponse> {
        self.request(Method::POST, collection, Some(data), None, None)
            .await
    }

    /// Apply a partial update to a record. Success is 204 with no body.
    #[instrument(skip(self, data), fields(base_url = %self.base_url))]
    pub async fn modify_collection_data(
        &mut self,
        collection: &str,
        record_id: &RecordId,
        data: &Value,
    ) -> Result<ApiResponse> {
        let path = format!("{collection}({record_id})");
        self.request(Method::PATCH, &path, Some(data), None, None)
            .await
    }

    /// Delete a record. Success is 204 with no body.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn delete_collection_data(
        &mut self,
        collection: &str,
        record_id: &RecordId,
    ) -> Result<ApiResponse> {
        let path = format!("{collection}({record_id})");
        self.request(Method::DELETE, &path, None, None, None).await
    }

    /// Number of requests issued so far, login calls included.
    pub fn api_calls(&self) -> u64 {
        self.api_calls
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &ServiceUrl {
        &self.base_url
    }

    /// Point the client at a different instance. Takes effect on the next
    /// call; no URL-derived state is cached. The current session cookies
    /// are kept, which only makes sense when the new URL is an alias of the
    /// same instance.
    pub fn set_base_url(&mut self, base_url: ServiceUrl) {
        self.base_url = base_url;
    }

    /// Read-only snapshot of the current cookie map.
    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    /// The current anti-forgery token, if authenticated.
    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    /// Returns true after a successful login or session restore.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Export the session cookies for persistence.
    pub fn session(&self) -> SessionState {
        SessionState {
            cookies: self.cookies.clone(),
        }
    }

    /// Replace the session state with a previously exported snapshot.
    ///
    /// The client counts as authenticated when the snapshot carries the
    /// anti-forgery cookie. Validity is not checked here; a stale session
    /// surfaces as an HTTP error on the next call.
    pub fn restore_session(&mut self, session: SessionState) {
        self.cookies.clear();
        for (name, value) in session.cookies {
            if HeaderValue::from_str(&value).is_err() {
                warn!(cookie = %name, "dropping cookie with a value not sendable as a header");
                continue;
            }
            self.cookies.insert(name, value);
        }
        self.csrf_token = self
            .cookies
            .get(CSRF_COOKIE)
            .filter(|v| !v.is_empty())
            .cloned();
        self.authenticated = self.csrf_token.is_some();
    }

    /// The underlying HTTP transport, for sibling modules composing
    /// non-OData requests (file services).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Headers common to every session request: cookie-session forcing, the
    /// OData Accept rule, and the anti-forgery token on mutating verbs.
    pub(crate) fn session_headers(&self, method: &Method, path: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(FORCE_USE_SESSION_HEADER, HeaderValue::from_static("true"));
        if !path.contains(METADATA_SEGMENT) {
            headers.insert(ACCEPT, HeaderValue::from_static(ODATA_ACCEPT));
        }
        if *method != Method::GET
            && let Some(ref token) = self.csrf_token
            // values are validated at capture time, so this cannot skip
            && let Ok(value) = HeaderValue::from_str(token)
        {
            headers.insert(CSRF_HEADER, value);
        }
        headers
    }

    /// Send a prepared request: attach the cookie jar, count the call,
    /// capture rotated cookies, and buffer the response.
    pub(crate) async fn dispatch(&mut self, request: RequestBuilder) -> Result<ApiResponse> {
        let request = match self.cookie_header() {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        };

        self.api_calls += 1;

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        trace!(status = %status, "response received");

        self.capture_cookies(response.headers());

        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(transport_error)?;
        Ok(ApiResponse::new(status, headers, body))
    }

    fn cookie_header(&self) -> Option<HeaderValue> {
        if self.cookies.is_empty() {
            return None;
        }
        let value = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        HeaderValue::from_str(&value).ok()
    }

    fn capture_cookies(&mut self, headers: &HeaderMap) {
        for raw in headers.get_all(SET_COOKIE) {
            let Ok(raw) = raw.to_str() else { continue };
            let Some((name, rest)) = raw.split_once('=') else {
                continue;
            };
            let value = match rest.split_once(';') {
                Some((value, _attrs)) => value,
                None => rest,
            }
            .trim();
            let name = name.trim();
            if name.is_empty() || HeaderValue::from_str(value).is_err() {
                continue;
            }
            self.cookies.insert(name.to_string(), value.to_string());
            if name == CSRF_COOKIE && self.authenticated {
                // server rotated the anti-forgery token mid-session
                self.csrf_token = Some(value.to_string());
            }
        }
    }
}

// Token and cookie values stay out of Debug output
impl fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.authenticated)
            .field("cookies", &self.cookies.len())
            .field("api_calls", &self.api_calls)
            .finish()
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}
