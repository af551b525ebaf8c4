// ubus JSON-RPC wire types
//
// rpcd speaks JSON-RPC 2.0 over HTTP POST. A `call` carries
// `[session, object, method, args]` and answers `[status]` or
// `[status, payload]`; a `list` answers the namespace catalog directly.

use serde::{Deserialize, Serialize};

/// Session id rpcd accepts for unauthenticated calls (login only).
pub const ANONYMOUS_SESSION: &str = "00000000000000000000000000000000";

/// JSON-RPC error code rpcd returns when the session is unknown or expired.
pub const JSONRPC_ACCESS_DENIED: i64 = -32002;
/// JSON-RPC error code for an object that is not registered on the bus.
pub const JSONRPC_OBJECT_NOT_FOUND: i64 = -32000;
/// JSON-RPC error code for an unknown method.
pub const JSONRPC_METHOD_NOT_FOUND: i64 = -32601;

/// Outgoing JSON-RPC request envelope.
#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a, P: Serialize> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: P,
}

impl<'a, P: Serialize> RpcRequest<'a, P> {
    pub(crate) fn new(id: u64, method: &'a str, params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

/// Incoming JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Status codes carried in the first element of a `call` result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UbusStatus {
    Ok,
    InvalidCommand,
    InvalidArgument,
    MethodNotFound,
    NotFound,
    NoData,
    PermissionDenied,
    Timeout,
    NotSupported,
    UnknownError,
    ConnectionFailed,
}

impl UbusStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Self::Ok,
            1 => Self::InvalidCommand,
            2 => Self::InvalidArgument,
            3 => Self::MethodNotFound,
            4 => Self::NotFound,
            5 => Self::NoData,
            6 => Self::PermissionDenied,
            7 => Self::Timeout,
            8 => Self::NotSupported,
            9 => Self::UnknownError,
            10 => Self::ConnectionFailed,
            _ => return None,
        })
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::InvalidCommand => "invalid command",
            Self::InvalidArgument => "invalid argument",
            Self::MethodNotFound => "method not found",
            Self::NotFound => "not found",
            Self::NoData => "no data",
            Self::PermissionDenied => "permission denied",
            Self::Timeout => "timeout",
            Self::NotSupported => "not supported",
            Self::UnknownError => "unknown error",
            Self::ConnectionFailed => "connection failed",
        }
    }
}

/// Payload of a successful `session login`.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginPayload {
    pub ubus_rpc_session: String,
    #[serde(default)]
    pub timeout: Option<u64>,
}
