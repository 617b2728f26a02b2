// DSM session gateway
//
// Owns the HTTP client, the session credentials and the capability table.
// Every DSM call goes through `request`, which discovers APIs on first use,
// logs in implicitly, negotiates the version, attaches session parameters
// and turns `error` envelopes into typed errors. A session rejected by the
// server is re-established exactly once per call.
//
// `login` and `discover_apis` talk to the server through `send`, which does
// none of the above, so neither can recurse back into `request`.

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, trace, warn};
use url::Url;

use crate::auth::{Credentials, LoginData, Session, SessionState};
use crate::capability::CapabilityTable;
use crate::config::ConnectionConfig;
use crate::error::{Error, RequestFailure, SESSION_ERROR_CODES};
use crate::request::{ApiRequest, Params, Payload, Verb, error_code, error_details};
use crate::transport::TransportConfig;
use crate::{API_AUTH, API_DSM_INFO, API_INFO, API_STORAGE, LEGACY_STORAGE_MAX_BUILD};

const JSON_CONTENT_TYPES: [&str; 3] = ["application/json", "text/json", "text/plain"];

const LEGACY_STORAGE_PATH: &str = "webman/modules/StorageManager/storagehandler.cgi";

/// Stateful client for one NAS.
///
/// All operations take `&mut self`: a gateway serves one caller at a time,
/// and the session-expiry retry relies on that.
#[derive(Debug)]
pub struct DsmClient {
    http: reqwest::Client,
    transport: TransportConfig,
    base_url: Url,
    credentials: Credentials,
    device_name: String,
    session: Session,
    apis: CapabilityTable,
    server_build: Option<u32>,
    legacy_storage_compat: bool,
}

impl DsmClient {
    /// Create a gateway. No network traffic happens until the first call.
    pub fn new(config: &ConnectionConfig, credentials: Credentials) -> Result<Self, Error> {
        let transport = config.transport();
        let http = transport.build_client()?;
        let session = Session::new(credentials.device_token.clone());

        Ok(Self {
            http,
            transport,
            base_url: config.base_url()?,
            credentials,
            device_name: config.resolved_device_name(),
            session,
            apis: CapabilityTable::bootstrap(),
            server_build: None,
            legacy_storage_compat: config.legacy_storage_compat,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.state() == SessionState::Authenticated
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.sid()
    }

    pub fn syno_token(&self) -> Option<&str> {
        self.session.syno_token()
    }

    /// Device token granted by the last two-step login, if any.
    ///
    /// Persist it and pass it back via [`Credentials::with_device_token`]
    /// to skip the one-time-code challenge next time.
    pub fn device_token(&self) -> Option<&str> {
        self.session.device_token()
    }

    pub fn apis(&self) -> &CapabilityTable {
        &self.apis
    }

    /// DSM build number, once known.
    pub fn server_build(&self) -> Option<u32> {
        self.server_build
    }

    pub fn set_server_build(&mut self, build: u32) {
        self.server_build = Some(build);
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Open a new session, discarding any existing one.
    ///
    /// Pass `otp_code` to answer a two-step challenge. Returns `true` on
    /// success; every failure is a typed login error.
    pub async fn login(&mut self, otp_code: Option<&str>) -> Result<bool, Error> {
        self.http = self.transport.build_client()?;
        self.session.reset();
        self.discover_apis().await?;

        let mut request = ApiRequest::get(API_AUTH, "login")
            .param("account", self.credentials.username.clone())
            .param("passwd", self.credentials.password.expose_secret())
            .param("enable_syno_token", "yes")
            .param("enable_device_token", "yes")
            .param("device_name", self.device_name.clone())
            .param("format", "sid");
        if let Some(code) = otp_code {
            request = request.param("otp_code", code);
        }
        if let Some(token) = self.session.device_token() {
            request = request.param("device_id", token);
        }

        debug!(
            username = %self.credentials.username,
            otp = otp_code.is_some(),
            "logging in"
        );
        let response = self.send(&request).await?.into_json()?;

        if let Some(code) = error_code(&response) {
            debug!(code, "login rejected");
            return Err(Error::from_login_code(code, &self.credentials.username));
        }

        let data = response.get("data").cloned().unwrap_or(Value::Null);
        let data: LoginData = serde_json::from_value(data).map_err(|e| {
            Error::request(RequestFailure::Decode, format!("malformed login reply: {e}"))
        })?;
        self.session.establish(data, otp_code.is_some());
        debug!("login successful");

        self.probe_server_build().await;
        Ok(true)
    }

    /// Close the session. Returns the server's `success` flag.
    pub async fn logout(&mut self) -> Result<bool, Error> {
        debug!("logging out");
        let response = self
            .request(ApiRequest::get(API_AUTH, "logout"))
            .await?
            .into_json()?;
        self.session.end();
        Ok(response
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false))
    }

    /// Populate the capability table. No-op once `SYNO.API.Auth` is known.
    pub async fn discover_apis(&mut self) -> Result<(), Error> {
        if self.apis.contains(API_AUTH) {
            return Ok(());
        }

        debug!("discovering available APIs");
        let request = ApiRequest::get(API_INFO, "query").param("query", "all");
        let response = self.send(&request).await?.into_json()?;

        if let Some(code) = error_code(&response) {
            return Err(Error::api_error(API_INFO, code, error_details(&response)));
        }

        let data = response.get("data").cloned().unwrap_or(Value::Null);
        self.apis = CapabilityTable::from_discovery(data)?;
        debug!(count = self.apis.len(), "discovered APIs");
        Ok(())
    }

    /// Learn the server build for the legacy storage route. Failures are
    /// logged and otherwise ignored.
    async fn probe_server_build(&mut self) {
        if !self.legacy_storage_compat
            || self.server_build.is_some()
            || !self.apis.contains(API_DSM_INFO)
        {
            return;
        }

        let request = ApiRequest::get(API_DSM_INFO, "getinfo");
        match self.send(&request).await.and_then(Payload::into_json) {
            Ok(response) => {
                let build = response
                    .pointer("/data/version")
                    .and_then(|v| match v {
                        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
                        Value::String(s) => s.trim().parse().ok(),
                        _ => None,
                    });
                match build {
                    Some(build) => {
                        debug!(build, "detected DSM build");
                        self.server_build = Some(build);
                    }
                    None => debug!("DSM build not reported"),
                }
            }
            Err(e) => debug!(error = %e, "DSM build probe failed"),
        }
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// GET `api/method` and return the JSON body.
    pub async fn get(&mut self, api: &str, method: &str, params: &Params) -> Result<Value, Error> {
        self.request(ApiRequest::get(api, method).params(params))
            .await?
            .into_json()
    }

    /// POST `api/method` with `form` fields and return the JSON body.
    pub async fn post(
        &mut self,
        api: &str,
        method: &str,
        params: &Params,
        form: &Params,
    ) -> Result<Value, Error> {
        self.request(ApiRequest::post(api, method).params(params).form_fields(form))
            .await?
            .into_json()
    }

    /// Send a request and return its JSON body.
    pub async fn request_json(&mut self, request: ApiRequest) -> Result<Value, Error> {
        self.request(request).await?.into_json()
    }

    /// Send a request that answers with binary content (snapshots, images).
    pub async fn request_bytes(&mut self, request: ApiRequest) -> Result<Bytes, Error> {
        self.request(request).await?.into_bytes()
    }

    /// Send a request through the full dispatch pipeline.
    ///
    /// Replies to `SYNO.API.Auth` are returned verbatim, error envelopes
    /// included; every other API's `error` becomes [`Error::Api`].
    pub async fn request(&mut self, request: ApiRequest) -> Result<Payload, Error> {
        if request.api != API_INFO {
            self.discover_apis().await?;
        }

        let mut retried = false;
        loop {
            if self.session.sid().is_none() && request.api != API_AUTH && request.api != API_INFO {
                self.login(None).await?;
            }

            let response = match self.send(&request).await? {
                Payload::Json(response) => response,
                raw @ Payload::Raw(_) => return Ok(raw),
            };
            if request.api == API_AUTH {
                return Ok(Payload::Json(response));
            }
            let Some(code) = error_code(&response) else {
                return Ok(Payload::Json(response));
            };

            if !retried && SESSION_ERROR_CODES.contains(&code) {
                warn!(api = %request.api, code, "session rejected, logging in again");
                self.session.invalidate();
                retried = true;
                continue;
            }

            return Err(Error::api_error(&request.api, code, error_details(&response)));
        }
    }

    /// One HTTP exchange: resolve the target, attach session parameters,
    /// send, decode. No discovery, login or retry.
    async fn send(&self, request: &ApiRequest) -> Result<Payload, Error> {
        let (url, version) = self.target(request)?;

        let mut params = request.params.clone();
        params.insert("api", request.api.clone());
        params.insert("version", version.to_string());
        params.insert("method", request.method.clone());
        if request.api == API_STORAGE {
            params.insert("action", request.method.clone());
        }
        if let Some(sid) = self.session.sid() {
            params.insert("_sid", sid);
        }
        if let Some(token) = self.session.syno_token() {
            params.insert("SynoToken", token);
        }

        debug!(
            api = %request.api,
            method = %request.method,
            version,
            verb = ?request.verb,
            "sending request"
        );

        let builder = match request.verb {
            Verb::Get => self.http.get(url).query(&params.pairs()),
            Verb::Post => {
                let mut fields = params.clone();
                fields.merge(&request.form);
                fields.insert("mimeType", "application/json");
                let builder = self.http.post(url).query(&params.pairs());
                match request.file {
                    Some(ref file) => {
                        let mut form = Form::new();
                        for (key, value) in fields.iter() {
                            form = form.text(key.to_owned(), value.to_owned());
                        }
                        let part = Part::bytes(file.content.to_vec()).file_name(file.file_name.clone());
                        builder.multipart(form.part(file.field_name.clone(), part))
                    }
                    None => builder.form(&fields.pairs()),
                }
            }
        };

        let response = builder.send().await.map_err(|e| Error::transport(&e))?;
        Self::decode(response).await
    }

    /// Resolve the endpoint URL and negotiated version for `request`.
    fn target(&self, request: &ApiRequest) -> Result<(Url, u32), Error> {
        if self.uses_legacy_storage(&request.api) {
            return Ok((self.base_url.join(LEGACY_STORAGE_PATH)?, 1));
        }

        let info = self.apis.get(&request.api).ok_or_else(|| Error::ApiNotExists {
            api: request.api.clone(),
        })?;
        let version = request
            .max_version
            .map_or(info.max_version, |cap| info.max_version.min(cap));
        let url = self.base_url.join(&format!("webapi/{}", info.path))?;
        Ok((url, version))
    }

    fn uses_legacy_storage(&self, api: &str) -> bool {
        self.legacy_storage_compat
            && api == API_STORAGE
            && self
                .server_build
                .is_some_and(|build| build < LEGACY_STORAGE_MAX_BUILD)
    }

    async fn decode(response: reqwest::Response) -> Result<Payload, Error> {
        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::request(
                RequestFailure::Status,
                format!("HTTP {status}"),
            ));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
            .is_some_and(|ct| JSON_CONTENT_TYPES.contains(&ct.as_str()));

        let body = response.bytes().await.map_err(|e| Error::transport(&e))?;
        trace!(len = body.len(), json = is_json, "response received");

        if is_json {
            serde_json::from_slice(&body)
                .map(Payload::Json)
                .map_err(|e| Error::request(RequestFailure::Decode, e.to_string()))
        } else {
            Ok(Payload::Raw(body))
        }
    }
}
