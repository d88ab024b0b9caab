//! # RelayKit Binding - DingTalk Webhook
//!
//! Output/input binding relaying messages to and from DingTalk's webhook API.
//!
//! - **Outbound** ([`OutputBinding::invoke`]): POST the raw JSON payload to
//!   the configured robot URL with a `Content-Type: application/json` header,
//!   signing the request with the shared secret when one is configured. The
//!   vendor's `errcode`/`errmsg` reply is decoded and a non-zero `errcode`
//!   surfaces as an error.
//! - **Inbound** ([`InputBinding::read`]): listen on the path component of
//!   the configured URL and forward each request body to the registered
//!   handler. The listener address comes from the hosting runtime, not from
//!   the binding metadata.
//!
//! Known limitation: the inbound route always acknowledges with
//! `{"errcode":0,"errmsg":"ok"}`; handler errors are logged and dropped, and
//! the handler's returned payload is never relayed to the caller.
//!
//! ## Usage
//!
//! ```ignore
//! use relaykit_binding_dingtalk::{DingTalkWebhook, ListenConfig};
//! use relaykit_protocols::{Binding, Metadata, OutputBinding};
//!
//! let mut binding = DingTalkWebhook::new(ListenConfig::default());
//! let metadata = Metadata::new("dingtalk")
//!     .with_property("url", "https://oapi.dingtalk.com/robot/send?access_token=...")
//!     .with_property("secret", "SEC...")
//!     .with_property("id", "robot-1");
//! binding.init(metadata).await?;
//! binding.invoke(request).await?;
//! ```

mod server;
mod sign;

use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use relaykit_protocols::{
    Binding, BindingError, InputBinding, InvokeRequest, InvokeResponse, Metadata, OperationKind,
    OutputBinding, ReadHandler, decode_properties,
};

/// Outbound HTTP client timeout.
const HTTP_CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// DingTalk webhook settings, decoded from binding metadata.
///
/// Values pass through the decode unchanged. `secret` may be empty, which
/// disables request signing; `id` is an opaque identifier the host uses for
/// routing/correlation and is not consulted by the relay logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookSettings {
    /// Outbound destination; for inbound, the source of the listen path.
    pub url: String,
    /// Optional HMAC signing key.
    pub secret: String,
    /// Opaque correlation identifier.
    pub id: String,
}

/// Inbound listener address, supplied by the hosting runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenConfig {
    /// Host to bind to (default: "127.0.0.1").
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on. Port 0 binds an ephemeral port.
    #[serde(default)]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 0,
        }
    }
}

/// Vendor reply body for outbound posts. `errcode != 0` is an
/// application-level failure independent of the HTTP status.
#[derive(Debug, Deserialize)]
struct WebhookReply {
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

/// Settings and transport, fixed at [`Binding::init`] and immutable after.
struct Configured {
    settings: WebhookSettings,
    /// Shared HTTP client - constructed once, reused across all invocations
    /// so the connection pool survives between calls.
    client: reqwest::Client,
}

/// DingTalk webhook binding.
pub struct DingTalkWebhook {
    listen: ListenConfig,
    configured: Option<Configured>,
    /// Bound listener address, recorded when `read` starts.
    local_addr: OnceLock<SocketAddr>,
}

impl DingTalkWebhook {
    /// Create an unconfigured binding. The inbound listener address comes
    /// from the hosting runtime; binding metadata only carries `url`,
    /// `secret`, and `id`.
    pub fn new(listen: ListenConfig) -> Self {
        Self {
            listen,
            configured: None,
            local_addr: OnceLock::new(),
        }
    }

    /// The settings decoded at init, if the binding is initialized.
    pub fn settings(&self) -> Option<&WebhookSettings> {
        self.configured.as_ref().map(|c| &c.settings)
    }

    /// The address bound by `read`, once the listener is running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr.get().copied()
    }

    fn configured(&self) -> Result<&Configured, BindingError> {
        self.configured.as_ref().ok_or(BindingError::NotInitialized)
    }

    /// Resolve the outbound destination. Absolute URLs are used verbatim; a
    /// bare path resolves against the live listener (the loopback case).
    fn destination(&self, raw: &str) -> Result<Url, BindingError> {
        if raw.is_empty() {
            return Err(BindingError::SendFailed("empty destination url".to_string()));
        }
        match Url::parse(raw) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let addr = self.local_addr().ok_or_else(|| {
                    BindingError::SendFailed(format!(
                        "relative url {raw:?} requires an active listener"
                    ))
                })?;
                let base = Url::parse(&format!("http://{addr}"))
                    .map_err(|e| BindingError::SendFailed(e.to_string()))?;
                base.join(raw)
                    .map_err(|e| BindingError::SendFailed(e.to_string()))
            }
            Err(e) => Err(BindingError::SendFailed(format!("invalid url {raw:?}: {e}"))),
        }
    }

    /// One outbound delivery: sign if configured, POST, decode the reply.
    async fn send_message(&self, request: &InvokeRequest) -> Result<(), BindingError> {
        let configured = self.configured()?;
        let mut url = self.destination(&configured.settings.url)?;

        if !configured.settings.secret.is_empty() {
            let timestamp = chrono::Utc::now().timestamp_millis();
            sign::append_signature(&mut url, &configured.settings.secret, timestamp);
        }

        let response = configured
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(request.data.clone())
            .send()
            .await
            .map_err(|e| BindingError::ConnectionFailed(e.to_string()))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| BindingError::ConnectionFailed(e.to_string()))?;
        let reply: WebhookReply = serde_json::from_slice(&body)
            .map_err(|e| BindingError::SendFailed(format!("unparseable reply: {e}")))?;

        if reply.errcode != 0 {
            return Err(BindingError::Remote {
                code: reply.errcode,
                message: reply.errmsg,
            });
        }

        debug!(url = %configured.settings.url, "webhook message delivered");
        Ok(())
    }
}

#[async_trait]
impl Binding for DingTalkWebhook {
    async fn init(&mut self, metadata: Metadata) -> Result<(), BindingError> {
        let settings: WebhookSettings = decode_properties(&metadata.properties)?;
        let client = reqwest::Client::builder()
            .timeout(HTTP_CLIENT_TIMEOUT)
            .build()
            .map_err(|e| BindingError::ConnectionFailed(e.to_string()))?;
        self.configured = Some(Configured { settings, client });
        Ok(())
    }
}

#[async_trait]
impl OutputBinding for DingTalkWebhook {
    /// Every operation kind routes to the same outbound send; the kind is
    /// accepted but not used to branch.
    async fn invoke(&self, request: InvokeRequest) -> Result<InvokeResponse, BindingError> {
        self.send_message(&request).await?;
        Ok(InvokeResponse::default())
    }

    fn operations(&self) -> Vec<OperationKind> {
        vec![OperationKind::Create, OperationKind::Get]
    }
}

#[async_trait]
impl InputBinding for DingTalkWebhook {
    async fn read(&self, handler: ReadHandler) -> Result<(), BindingError> {
        let configured = self.configured()?;
        let path = server::inbound_path(&configured.settings.url);
        server::serve(&self.listen, &self.local_addr, path, handler).await
    }
}
