//! Request body encoding.
//!
//! Exactly one body source wins, checked in this order: raw body, JSON,
//! multipart files (with any form data), URL-encoded form data. Only the
//! winner contributes a `Content-Type`.

use crate::args::{FileField, JsonBody, RequestArguments};
use crate::{Error, Result};
use http::HeaderValue;
use reqwest::blocking::multipart::{Form, Part};
use std::collections::BTreeMap;
use std::io::Read;
use tracing::trace;

/// `Content-Type` for JSON bodies.
pub const APPLICATION_JSON: &str = "application/json";
/// `Content-Type` for URL-encoded form bodies.
pub const APPLICATION_FORM: &str = "application/x-www-form-urlencoded";

/// Body and content type chosen for a request.
#[derive(Debug, Default)]
pub struct EncodedBody {
    /// Body to send, if any.
    pub body: Option<reqwest::Body>,
    /// Content type inferred from the winning body source.
    pub content_type: Option<HeaderValue>,
}

impl EncodedBody {
    fn bytes(bytes: Vec<u8>, content_type: HeaderValue) -> Self {
        Self {
            body: Some(bytes.into()),
            content_type: Some(content_type),
        }
    }

    /// Body length when the body is held in memory.
    pub fn content_length(&self) -> Option<u64> {
        self.body
            .as_ref()
            .and_then(|body| body.as_bytes())
            .map(|bytes| bytes.len() as u64)
    }
}

/// Pick and encode the body for `args`, taking ownership of the winning source.
pub fn encode_body(args: &mut RequestArguments) -> Result<EncodedBody> {
    if let Some(body) = args.body.take() {
        trace!("using raw request body");
        return Ok(EncodedBody {
            body: Some(body),
            content_type: None,
        });
    }

    if let Some(json) = args.json.take() {
        trace!("encoding JSON request body");
        let bytes = encode_json(json)?;
        return Ok(EncodedBody::bytes(
            bytes,
            HeaderValue::from_static(APPLICATION_JSON),
        ));
    }

    if let Some(files) = args.files.take() {
        trace!(files = files.len(), "encoding multipart request body");
        let (bytes, content_type) = encode_multipart(files, args.data.as_ref())?;
        let content_type = HeaderValue::try_from(content_type)
            .map_err(|e| Error::Encoding(format!("multipart content type: {e}")))?;
        return Ok(EncodedBody::bytes(bytes, content_type));
    }

    if let Some(data) = args.data.as_ref() {
        trace!(fields = data.len(), "encoding form request body");
        let encoded = encode_form(data)?;
        return Ok(EncodedBody::bytes(
            encoded.into_bytes(),
            HeaderValue::from_static(APPLICATION_FORM),
        ));
    }

    Ok(EncodedBody::default())
}

/// Serialize a JSON payload. Raw text and bytes pass through untouched.
pub fn encode_json(json: JsonBody) -> Result<Vec<u8>> {
    match json {
        JsonBody::Text(text) => Ok(text.into_bytes()),
        JsonBody::Bytes(bytes) => Ok(bytes),
        JsonBody::Structured(marshal) => {
            marshal().map_err(|e| Error::Encoding(format!("JSON body: {e}")))
        }
    }
}

/// URL-encode form fields in key order.
pub fn encode_form(data: &BTreeMap<String, String>) -> Result<String> {
    serde_urlencoded::to_string(data).map_err(|e| Error::Encoding(format!("form body: {e}")))
}

/// Build a multipart body from `files` followed by the plain `data` fields.
///
/// Every file stream is read fully and dropped before the next one is
/// touched; on failure the remaining streams are dropped unread. Returns the
/// encoded body and its `Content-Type`.
pub fn encode_multipart(
    files: Vec<FileField>,
    data: Option<&BTreeMap<String, String>>,
) -> Result<(Vec<u8>, String)> {
    let mut form = Form::new();

    for FileField {
        field_name,
        file_name,
        mut content,
    } in files
    {
        let mut bytes = Vec::new();
        content.read_to_end(&mut bytes)?;
        drop(content);

        let mime = mime_guess::from_path(&file_name).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.essence_str())
            .map_err(|e| Error::Encoding(format!("multipart part {field_name:?}: {e}")))?;
        form = form.part(field_name, part);
    }

    for (name, value) in data.into_iter().flatten() {
        form = form.text(name.clone(), value.clone());
    }

    let content_type = format!("multipart/form-data; boundary={}", form.boundary());
    let mut body = Vec::new();
    form.into_reader().read_to_end(&mut body)?;
    Ok((body, content_type))
}
