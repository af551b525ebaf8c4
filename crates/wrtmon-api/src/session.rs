// ubus session authentication
//
// `session login` against the anonymous session yields the token every
// later call presents; `session destroy` ends it. rpcd never tells us when
// a token expires, so renewal is driven by the call path rejecting it.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::{UbusClient, map_jsonrpc_error, unwrap_status};
use crate::error::Error;
use crate::models::{ANONYMOUS_SESSION, LoginPayload, RpcRequest};

impl UbusClient {
    /// Authenticate with the configured username/password.
    ///
    /// On success the session token is stored and used for all subsequent
    /// calls. Any rejection (permission denied, access denied) surfaces as
    /// [`Error::Authentication`].
    pub async fn login(&self) -> Result<(), Error> {
        self.acquire_session().await.map(|_| ())
    }

    /// Perform `session login` and store the resulting token.
    pub(crate) async fn acquire_session(&self) -> Result<SecretString, Error> {
        debug!(endpoint = %self.endpoint(), user = self.username(), "logging in");

        let args = json!({
            "username": self.username(),
            "password": self.password().expose_secret(),
        });
        let params = (ANONYMOUS_SESSION, "session", "login", &args);
        let request = RpcRequest::new(self.next_request_id(), "call", params);
        let response = self.post(&request).await?;

        if let Some(err) = response.error {
            return Err(match map_jsonrpc_error("session", "login", err) {
                Error::Unsupported { message, .. } | Error::Rpc { message, .. } => {
                    Error::Authentication {
                        message: format!("login rejected: {message}"),
                    }
                }
                other => other,
            });
        }

        let payload = unwrap_status(
            "session",
            "login",
            response.result.unwrap_or(serde_json::Value::Null),
        )
        .map_err(|e| match e {
            Error::Authentication { .. } => Error::Authentication {
                message: "login rejected: invalid username or password".into(),
            },
            other => other,
        })?;

        let login: LoginPayload =
            serde_json::from_value(payload.clone()).map_err(|e| Error::Authentication {
                message: format!("login response carried no session ({e}): {payload}"),
            })?;

        debug!(timeout = ?login.timeout, "login successful");

        let token = SecretString::from(login.ubus_rpc_session);
        self.store_session(Some(token.clone()));
        Ok(token)
    }

    /// End the current session.
    ///
    /// The token is dropped locally whether or not the router acknowledges
    /// the destroy call. A no-op when no session is held.
    pub async fn logout(&self) -> Result<(), Error> {
        let Some(session) = self.current_session() else {
            return Ok(());
        };
        self.store_session(None);

        debug!(endpoint = %self.endpoint(), "logging out");

        let args = json!({});
        let params = (session.expose_secret(), "session", "destroy", &args);
        let request = RpcRequest::new(self.next_request_id(), "call", params);
        let response = self.post(&request).await?;

        if let Some(err) = response.error {
            return Err(map_jsonrpc_error("session", "destroy", err));
        }
        unwrap_status(
            "session",
            "destroy",
            response.result.unwrap_or(serde_json::Value::Null),
        )?;

        debug!("logout complete");
        Ok(())
    }
}
