// ubus JSON-RPC HTTP client
//
// Wraps `reqwest::Client` with the rpcd envelope, status-array unwrapping,
// and session renewal. Login/logout live in `session.rs` to keep this
// module focused on call mechanics.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{
    JSONRPC_ACCESS_DENIED, JSONRPC_METHOD_NOT_FOUND, JSONRPC_OBJECT_NOT_FOUND, RpcError,
    RpcRequest, RpcResponse, UbusStatus,
};
use crate::transport::TransportConfig;

/// What a single round trip asks rpcd to do.
enum Invocation<'a> {
    Call {
        object: &'a str,
        method: &'a str,
        args: &'a Value,
    },
    List {
        pattern: &'a str,
    },
}

impl Invocation<'_> {
    fn object(&self) -> &str {
        match self {
            Self::Call { object, .. } => object,
            Self::List { pattern } => pattern,
        }
    }

    fn method(&self) -> &str {
        match self {
            Self::Call { method, .. } => method,
            Self::List { .. } => "list",
        }
    }
}

/// Authenticated client for one router's ubus endpoint.
///
/// Holds the session token obtained from `session login` and renews it
/// transparently: a call rejected for authentication triggers exactly one
/// re-login followed by exactly one retry. A second rejection surfaces as
/// [`Error::Authentication`]. Concurrent callers share one renewal.
pub struct UbusClient {
    http: reqwest::Client,
    endpoint: Url,
    username: String,
    password: SecretString,
    timeout: Duration,
    /// Current `ubus_rpc_session`. Written only by the owning device's cycle.
    session: RwLock<Option<SecretString>>,
    /// Held while a login is in flight.
    renewal: Mutex<()>,
    next_id: AtomicU64,
}

impl UbusClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `endpoint` is the full rpcd URL, e.g. `http://192.168.1.1/ubus`.
    /// No network traffic happens until the first call.
    pub fn new(
        endpoint: Url,
        username: String,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::assemble(
            http,
            endpoint,
            username,
            password,
            transport.timeout,
        ))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        endpoint: Url,
        username: String,
        password: SecretString,
    ) -> Self {
        let timeout = TransportConfig::default().timeout;
        Self::assemble(http, endpoint, username, password, timeout)
    }

    fn assemble(
        http: reqwest::Client,
        endpoint: Url,
        username: String,
        password: SecretString,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            endpoint,
            username,
            password,
            timeout,
            session: RwLock::new(None),
            renewal: Mutex::new(()),
            next_id: AtomicU64::new(1),
        }
    }

    /// The rpcd endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Whether a session token is currently held.
    pub fn has_session(&self) -> bool {
        self.session.read().expect("session lock poisoned").is_some()
    }

    pub(crate) fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    pub(crate) fn current_session(&self) -> Option<SecretString> {
        self.session.read().expect("session lock poisoned").clone()
    }

    pub(crate) fn store_session(&self, token: Option<SecretString>) {
        *self.session.write().expect("session lock poisoned") = token;
    }

    // ── Public call surface ──────────────────────────────────────────

    /// Invoke `object.method(args)` and return the raw payload.
    ///
    /// A `[0]` result without payload yields an empty JSON object.
    pub async fn call(&self, object: &str, method: &str, args: Value) -> Result<Value, Error> {
        self.invoke(&Invocation::Call {
            object,
            method,
            args: &args,
        })
        .await
    }

    /// Invoke `object.method(args)` and deserialize the payload into `T`.
    pub async fn call_as<T: DeserializeOwned>(
        &self,
        object: &str,
        method: &str,
        args: Value,
    ) -> Result<T, Error> {
        let payload = self.call(object, method, args).await?;
        serde_json::from_value(payload.clone()).map_err(|e| Error::Deserialization {
            message: format!("{object}.{method}: {e}"),
            body: payload.to_string(),
        })
    }

    /// List registered objects matching `pattern` (`"*"` for all) with
    /// their method signatures.
    ///
    /// Unlike [`call`](Self::call), rpcd returns the catalog object directly
    /// instead of a `[status, payload]` array.
    pub async fn list(&self, pattern: &str) -> Result<Map<String, Value>, Error> {
        let result = self.invoke(&Invocation::List { pattern }).await?;
        match result {
            Value::Object(map) => Ok(map),
            other => Err(Error::Deserialization {
                message: "list result is not an object".into(),
                body: other.to_string(),
            }),
        }
    }

    // ── Session-aware dispatch ───────────────────────────────────────

    async fn invoke(&self, invocation: &Invocation<'_>) -> Result<Value, Error> {
        let session = match self.current_session() {
            Some(token) => token,
            None => self.renew_session(None).await?,
        };

        match self.send(&session, invocation).await {
            Err(e) if e.is_auth_failure() => {
                debug!(
                    object = invocation.object(),
                    method = invocation.method(),
                    "session rejected, logging in again"
                );
                let session = self.renew_session(Some(&session)).await?;
                self.send(&session, invocation).await
            }
            other => other,
        }
    }

    /// Log in unless another caller already replaced `rejected` while we
    /// waited for the renewal lock.
    async fn renew_session(&self, rejected: Option<&SecretString>) -> Result<SecretString, Error> {
        let _renewal = self.renewal.lock().await;

        if let Some(current) = self.current_session() {
            let is_rejected =
                rejected.is_some_and(|old| old.expose_secret() == current.expose_secret());
            if !is_rejected {
                return Ok(current);
            }
        }

        self.store_session(None);
        self.acquire_session().await
    }

    async fn send(
        &self,
        session: &SecretString,
        invocation: &Invocation<'_>,
    ) -> Result<Value, Error> {
        let id = self.next_request_id();
        let response = match invocation {
            Invocation::Call {
                object,
                method,
                args,
            } => {
                debug!(id, object, method, "ubus call");
                let params = (session.expose_secret(), *object, *method, *args);
                self.post(&RpcRequest::new(id, "call", params)).await?
            }
            Invocation::List { pattern } => {
                debug!(id, pattern, "ubus list");
                let params = (session.expose_secret(), *pattern);
                self.post(&RpcRequest::new(id, "list", params)).await?
            }
        };

        let object = invocation.object();
        let method = invocation.method();

        if let Some(err) = response.error {
            return Err(map_jsonrpc_error(object, method, err));
        }

        let result = response.result.unwrap_or(Value::Null);
        match invocation {
            Invocation::Call { .. } => unwrap_status(object, method, result),
            Invocation::List { .. } => Ok(result),
        }
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) fn next_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// POST a JSON-RPC envelope and decode the response envelope.
    pub(crate) async fn post<P: Serialize + Sync>(
        &self,
        request: &RpcRequest<'_, P>,
    ) -> Result<RpcResponse, Error> {
        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: format!("endpoint rejected request (HTTP {status})"),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        trace!(body = %body, "ubus response");

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

/// Translate a JSON-RPC level `error` object.
pub(crate) fn map_jsonrpc_error(object: &str, method: &str, err: RpcError) -> Error {
    match err.code {
        JSONRPC_ACCESS_DENIED => Error::Authentication {
            message: if err.message.is_empty() {
                "access denied".into()
            } else {
                err.message
            },
        },
        JSONRPC_OBJECT_NOT_FOUND | JSONRPC_METHOD_NOT_FOUND => Error::Unsupported {
            object: object.into(),
            method: method.into(),
            message: err.message,
        },
        code => Error::Rpc {
            object: object.into(),
            method: method.into(),
            code,
            message: err.message,
        },
    }
}

/// Unwrap a `[status]` / `[status, payload]` call result.
pub(crate) fn unwrap_status(object: &str, method: &str, result: Value) -> Result<Value, Error> {
    let Value::Array(mut items) = result else {
        return Err(Error::Deserialization {
            message: format!("{object}.{method}: result is not a status array"),
            body: result.to_string(),
        });
    };

    let Some(code) = items.first().and_then(Value::as_i64) else {
        return Err(Error::Deserialization {
            message: format!("{object}.{method}: missing status code"),
            body: Value::Array(items).to_string(),
        });
    };

    match UbusStatus::from_code(code) {
        Some(UbusStatus::Ok) => Ok(if items.len() > 1 {
            items.swap_remove(1)
        } else {
            Value::Object(Map::new())
        }),
        Some(UbusStatus::PermissionDenied) => Err(Error::Authentication {
            message: format!("permission denied for {object}.{method}"),
        }),
        Some(
            status @ (UbusStatus::MethodNotFound | UbusStatus::NotFound | UbusStatus::NotSupported),
        ) => Err(Error::Unsupported {
            object: object.into(),
            method: method.into(),
            message: status.description().into(),
        }),
        other => Err(Error::Rpc {
            object: object.into(),
            method: method.into(),
            code,
            message: other
                .map_or("unrecognized status", UbusStatus::description)
                .into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn status_only_result_yields_empty_object() {
        let payload = unwrap_status("hostapd.wlan0", "wps_start", json!([0])).expect("ok status");
        assert_eq!(payload, json!({}));
    }

    #[test]
    fn payload_is_second_element() {
        let payload =
            unwrap_status("system", "board", json!([0, {"model": "x"}])).expect("ok status");
        assert_eq!(payload["model"], "x");
    }

    #[test]
    fn missing_object_status_is_unsupported() {
        let err = unwrap_status("mwan3", "status", json!([4])).expect_err("not found");
        assert!(err.is_unsupported());
    }

    #[test]
    fn permission_denied_status_is_auth_failure() {
        let err = unwrap_status("system", "reboot", json!([6])).expect_err("denied");
        assert!(err.is_auth_failure());
    }

    #[test]
    fn other_status_is_generic_rpc_error() {
        let err = unwrap_status("iwinfo", "info", json!([2])).expect_err("invalid arg");
        assert!(matches!(err, Error::Rpc { code: 2, .. }));
    }

    #[test]
    fn jsonrpc_access_denied_is_auth_failure() {
        let err = map_jsonrpc_error(
            "system",
            "board",
            RpcError {
                code: JSONRPC_ACCESS_DENIED,
                message: "Access denied".into(),
            },
        );
        assert!(err.is_auth_failure());
    }

    #[test]
    fn jsonrpc_object_not_found_is_unsupported() {
        let err = map_jsonrpc_error(
            "hostapd.wlan9",
            "get_clients",
            RpcError {
                code: JSONRPC_OBJECT_NOT_FOUND,
                message: "Object not found".into(),
            },
        );
        assert!(err.is_unsupported());
    }
}
