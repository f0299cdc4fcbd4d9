//! Uniform result of every API call.

use serde_json::{json, Value};

use crate::error::{Result, ZencoderError};
use crate::http::HttpResponse;

/// Body substituted for 402 responses, which the service sends without a
/// usable payload.
pub fn payment_required_body() -> Value {
    json!({ "message": "Payment Required", "status": "error" })
}

/// The outcome of one API call, independent of status code.
///
/// Non-2xx statuses are returned as `Response`s too; interpreting the
/// status is left to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status_code: u16,
    body: Option<Value>,
    raw_body: Vec<u8>,
    raw_response: HttpResponse,
}

impl Response {
    /// Decodes a transport response.
    ///
    /// - 204: no body, nothing is decoded.
    /// - 402: `{"message": "Payment Required", "status": "error"}`.
    /// - otherwise: an empty or whitespace-only payload is no body, anything
    ///   else must be JSON.
    ///
    /// # Errors
    ///
    /// Returns `ZencoderError::ResponseDecode` if the payload is not JSON.
    pub fn from_http(raw_response: HttpResponse) -> Result<Self> {
        let raw_body = raw_response.body.clone();
        let body = match raw_response.status {
            204 => None,
            402 => Some(payment_required_body()),
            _ => decode(&raw_body).map_err(|source| ZencoderError::ResponseDecode {
                response: raw_response.clone(),
                content: raw_body.clone(),
                source,
            })?,
        };

        Ok(Self {
            status_code: raw_response.status,
            body,
            raw_body,
            raw_response,
        })
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Decoded JSON body, `None` when the response carried none.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn into_body(self) -> Option<Value> {
        self.body
    }

    pub fn raw_body(&self) -> &[u8] {
        &self.raw_body
    }

    pub fn raw_response(&self) -> &HttpResponse {
        &self.raw_response
    }
}

fn decode(raw: &[u8]) -> std::result::Result<Option<Value>, serde_json::Error> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(raw).map(Some)
}
