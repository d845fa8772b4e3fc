//! Helpers for calls to the backend.
//!
//! Every call carries the stored access token. Failures come back as a
//! message ready to show, or as the field error map of a 400 response.

use contracts::shared::validation::ErrorMap;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::system::auth::storage;

/// Base URL of the API.
///
/// Same origin when the page is served by the backend (port 3000), otherwise
/// the current host on port 3000 (trunk dev server).
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Error body of the API: `{error, errors?}`
#[derive(Debug, Clone, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Option<ErrorMap>,
}

/// Failure of an API call
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFailure {
    /// 400 with per-field messages
    Invalid(ErrorMap),
    Message(String),
}

impl ApiFailure {
    pub fn message(&self) -> String {
        match self {
            ApiFailure::Invalid(errors) => errors.values().cloned().collect::<Vec<_>>().join("; "),
            ApiFailure::Message(m) => m.clone(),
        }
    }
}

impl From<String> for ApiFailure {
    fn from(value: String) -> Self {
        ApiFailure::Message(value)
    }
}

fn authorized(builder: RequestBuilder) -> RequestBuilder {
    match storage::get_access_token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        401 => "Your session has expired, please sign in again",
        403 => "You don't have permission to do that",
        404 => "Not found",
        _ => "Something went wrong, please try again",
    }
}

async fn failure(response: Response) -> ApiFailure {
    let status = response.status();
    let body = response.json::<ErrorBody>().await.unwrap_or_default();
    match body.errors {
        Some(errors) if !errors.is_empty() => ApiFailure::Invalid(errors),
        _ => ApiFailure::Message(
            body.error
                .unwrap_or_else(|| status_text(status).to_string()),
        ),
    }
}

/// Message of a failed response
pub async fn error_message(response: Response) -> String {
    failure(response).await.message()
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ApiFailure> {
    if !response.ok() {
        return Err(failure(response).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiFailure::Message(format!("Failed to parse response: {}", e)))
}

pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiFailure> {
    let response = authorized(Request::get(&api_url(path)))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    read(response).await
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, ApiFailure> {
    let response = authorized(Request::post(&api_url(path)))
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    read(response).await
}

pub async fn put_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, ApiFailure> {
    let response = authorized(Request::put(&api_url(path)))
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    read(response).await
}

/// POST without a body, for actions such as seeding test data
pub async fn post_empty(path: &str) -> Result<(), ApiFailure> {
    let response = authorized(Request::post(&api_url(path)))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    if !response.ok() {
        return Err(failure(response).await);
    }
    Ok(())
}

pub async fn delete(path: &str) -> Result<(), ApiFailure> {
    let response = authorized(Request::delete(&api_url(path)))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    if !response.ok() {
        return Err(failure(response).await);
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Send a picture as multipart field `file`; returns its public URL
pub async fn upload_file(category: &str, file: &web_sys::File) -> Result<String, ApiFailure> {
    let form = web_sys::FormData::new().map_err(|e| format!("{e:?}"))?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(|e| format!("{e:?}"))?;

    let response = authorized(Request::post(&api_url(&format!("/api/uploads/{}", category))))
        .body(form)
        .map_err(|e| format!("Failed to build request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    let uploaded: UploadResponse = read(response).await?;
    Ok(uploaded.url)
}
