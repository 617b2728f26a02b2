// Request and response shapes for DSM dispatch

use bytes::Bytes;
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Error, RequestFailure};

/// Insertion-ordered string parameters sent as query or form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(IndexMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a parameter, keeping its original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Copy every parameter of `other` into `self`, replacing duplicates.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pairs in the shape `reqwest` serializes for query strings and forms.
    pub(crate) fn pairs(&self) -> Vec<(&str, &str)> {
        self.iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A file sent as a multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Multipart field name (`file` unless the API says otherwise).
    pub field_name: String,
    pub file_name: String,
    pub content: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            field_name: "file".into(),
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

/// HTTP verb used for a DSM request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
}

/// A single DSM API call: identifier, method, parameters and optional body.
///
/// ```
/// use synodsm_api::ApiRequest;
///
/// let request = ApiRequest::get("SYNO.SurveillanceStation.Camera", "List")
///     .param("additional", "device")
///     .max_version(7);
/// assert_eq!(request.api(), "SYNO.SurveillanceStation.Camera");
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) verb: Verb,
    pub(crate) api: String,
    pub(crate) method: String,
    pub(crate) params: Params,
    pub(crate) form: Params,
    pub(crate) file: Option<UploadFile>,
    pub(crate) max_version: Option<u32>,
}

impl ApiRequest {
    fn new(verb: Verb, api: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            verb,
            api: api.into(),
            method: method.into(),
            params: Params::new(),
            form: Params::new(),
            file: None,
            max_version: None,
        }
    }

    pub fn get(api: impl Into<String>, method: impl Into<String>) -> Self {
        Self::new(Verb::Get, api, method)
    }

    pub fn post(api: impl Into<String>, method: impl Into<String>) -> Self {
        Self::new(Verb::Post, api, method)
    }

    /// A POST carrying `file` as a multipart part.
    pub fn upload(api: impl Into<String>, method: impl Into<String>, file: UploadFile) -> Self {
        let mut request = Self::new(Verb::Post, api, method);
        request.file = Some(file);
        request
    }

    /// Add a query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Add every parameter of `params` to the query.
    pub fn params(mut self, params: &Params) -> Self {
        self.params.merge(params);
        self
    }

    /// Add a form field (POST only; ignored for GET).
    pub fn form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(key, value);
        self
    }

    /// Add every field of `form` to the POST body.
    pub fn form_fields(mut self, form: &Params) -> Self {
        self.form.merge(form);
        self
    }

    /// Cap the negotiated version.
    pub fn max_version(mut self, ceiling: u32) -> Self {
        self.max_version = Some(ceiling);
        self
    }

    pub fn api(&self) -> &str {
        &self.api
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The body was declared as JSON and parsed.
    Json(Value),
    /// Any other content type, returned untouched.
    Raw(Bytes),
}

impl Payload {
    /// Unwrap a JSON body, failing on binary content.
    pub fn into_json(self) -> Result<Value, Error> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Raw(bytes) => Err(Error::request(
                RequestFailure::Decode,
                format!("expected a JSON body, got {} bytes of binary content", bytes.len()),
            )),
        }
    }

    /// Unwrap a binary body, failing on JSON content.
    pub fn into_bytes(self) -> Result<Bytes, Error> {
        match self {
            Self::Raw(bytes) => Ok(bytes),
            Self::Json(_) => Err(Error::request(
                RequestFailure::Decode,
                "expected a binary body, got JSON",
            )),
        }
    }
}

/// The `error.code` of a DSM response, if it reports one.
pub(crate) fn error_code(response: &Value) -> Option<i64> {
    let error = response.get("error").filter(|e| !e.is_null())?;
    Some(error.get("code").and_then(Value::as_i64).unwrap_or(100))
}

/// The `error.errors` detail payload of a DSM response.
pub(crate) fn error_details(response: &Value) -> Option<Value> {
    response
        .get("error")
        .and_then(|e| e.get("errors"))
        .filter(|e| !e.is_null())
        .cloned()
}
