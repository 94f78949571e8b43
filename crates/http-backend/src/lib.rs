//! A backend implementation speaking the chatbot service's HTTP API.

#[macro_use]
extern crate tracing;

mod auth;
mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use chatbot_backend::{
    BackendError, ChatBackend, ChatReply, ChatRequest, ErrorKind,
};
use mime::Mime;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use serde::de::DeserializeOwned;

pub use config::{HttpBackendConfig, HttpBackendConfigBuilder};

const API_KEY_HEADER: &str = "x-api-key";

/// Error type for [`HttpBackend`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
    detail: Option<String>,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
            detail: None,
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_decode() {
            ErrorKind::InvalidPayload
        } else {
            ErrorKind::Transport
        };
        Self::new(format!("{err}"), kind)
    }

    fn from_status(status: StatusCode, detail: Option<String>) -> Self {
        let kind = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ErrorKind::Unauthorized
            }
            _ => ErrorKind::Status(status.as_u16()),
        };
        Self {
            message: format!("server responded with {status}"),
            kind,
            detail,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.message, detail),
            None => write!(f, "{}", self.message),
        }
    }
}

impl StdError for Error {}

impl BackendError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

/// Backend reached over HTTP.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    config: Arc<HttpBackendConfig>,
}

impl HttpBackend {
    /// Creates a new `HttpBackend` with the given configuration.
    #[inline]
    pub fn new(config: HttpBackendConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Returns a backend sharing this one's connections but sending a
    /// different API key.
    pub fn with_api_key<S: Into<String>>(&self, api_key: S) -> Self {
        let mut config = HttpBackendConfig::clone(&self.config);
        config.api_key = Some(api_key.into());
        Self {
            client: self.client.clone(),
            config: Arc::new(config),
        }
    }

    /// Returns the configuration in use.
    #[inline]
    pub fn config(&self) -> &HttpBackendConfig {
        &self.config
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .timeout(self.config.timeout)
            .header(header::ACCEPT, "application/json")
    }

    fn with_api_key_header(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(api_key) => builder.header(API_KEY_HEADER, api_key),
            None => {
                warn!("no API key configured, the request will be rejected");
                builder
            }
        }
    }
}

impl ChatBackend for HttpBackend {
    type Error = Error;

    fn send_message(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send + 'static
    {
        let body = proto::create_chat_request(req);
        let resp_fut = self
            .with_api_key_header(
                self.request(self.client.post(self.config.endpoint("/chat"))),
            )
            .json(&body)
            .send();

        async move {
            let resp = resp_fut.await.map_err(Error::from_reqwest)?;
            let body: proto::ChatResponseBody = read_json(resp).await?;
            Ok(ChatReply { reply: body.reply })
        }
    }

    fn fetch_template(
        &self,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'static
    {
        let resp_fut = self
            .with_api_key_header(self.request(
                self.client.get(self.config.endpoint("/template_message")),
            ))
            .send();

        async move {
            let resp = resp_fut.await.map_err(Error::from_reqwest)?;
            let body: proto::TemplateResponseBody = read_json(resp).await?;
            Ok(body.template)
        }
    }
}

/// Checks the status and content type, then decodes the JSON body.
///
/// Any non-2xx status is an error; its body is searched for a `detail`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    resp: Response,
) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        let detail = match resp.bytes().await {
            Ok(body) => proto::error_detail(&body),
            Err(err) => {
                debug!("failed to read error body: {err}");
                None
            }
        };
        return Err(Error::from_status(status, detail));
    }

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    if let Some(content_type) = content_type {
        let is_json = content_type
            .parse()
            .map(|m: Mime| {
                m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON)
            })
            .unwrap_or(false);
        if !is_json {
            return Err(Error::new(
                format!("unexpected content type: {content_type}"),
                ErrorKind::InvalidPayload,
            ));
        }
    }

    resp.json::<T>().await.map_err(Error::from_reqwest)
}
