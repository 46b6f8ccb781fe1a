//! HTTP client wrapper - executes a request descriptor with reqwest

use std::error::Error as StdError;
use std::io::Read;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use base64::Engine;
use hyper::ext::ReasonPhrase;
use regex::Regex;
use reqwest::{multipart, redirect, Version};

use crate::constants::TYPE_FORM;
use crate::error::TransportError;
use crate::models::{Body, RawResponse, RequestDescriptor, Verify};
use crate::network::Transport;
use crate::request::normalize_url;

/// Blocking transport backed by a single-threaded Tokio runtime.
///
/// Ctrl-C while a request is in flight aborts it with
/// [`TransportError::Interrupted`].
pub struct ReqwestTransport {
    runtime: tokio::runtime::Runtime,
}

impl ReqwestTransport {
    pub fn new() -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(ReqwestTransport { runtime })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        self.runtime.block_on(async {
            tokio::select! {
                biased;

                _ = interrupted() => {
                    tracing::info!(url = %request.url, "Request interrupted");
                    Err(TransportError::Interrupted)
                }
                result = execute_request(request) => result,
            }
        })
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Create an HTTP client for the descriptor's TLS, proxy, timeout and
/// redirect settings
fn create_client(request: &RequestDescriptor) -> Result<reqwest::Client, TransportError> {
    let policy = if request.allow_redirects {
        redirect::Policy::default()
    } else {
        redirect::Policy::none()
    };
    let mut builder = reqwest::Client::builder().redirect(policy);

    if let Some(secs) = request.timeout {
        let timeout = Duration::try_from_secs_f64(secs).map_err(|e| TransportError::Other {
            message: format!("invalid timeout {secs}: {e}"),
            source: Some(Box::new(e)),
        })?;
        builder = builder.timeout(timeout);
    }

    for (scheme, url) in &request.proxies {
        let url = normalize_url(url);
        let proxy = match scheme.to_ascii_lowercase().as_str() {
            "http" => reqwest::Proxy::http(&url),
            "https" => reqwest::Proxy::https(&url),
            "all" => reqwest::Proxy::all(&url),
            other => {
                return Err(TransportError::other(format!(
                    "unsupported proxy scheme: {other}"
                )))
            }
        }
        .map_err(|e| TransportError::Other {
            message: format!("invalid proxy {url}: {e}"),
            source: Some(Box::new(e)),
        })?;
        builder = builder.proxy(proxy);
    }

    if let Verify::CaBundle(path) = &request.verify {
        let pem = std::fs::read(path).map_err(|e| {
            TransportError::tls(
                format!("could not read CA bundle {}: {e}", path.display()),
                e,
            )
        })?;
        let certs = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| {
            TransportError::tls(format!("invalid CA bundle {}: {e}", path.display()), e)
        })?;
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
    }

    builder.build().map_err(classify_error)
}

/// Build the multipart body: data fields as text parts, then one part per file
fn build_form(request: &RequestDescriptor) -> Result<multipart::Form, TransportError> {
    let mut form = multipart::Form::new();

    match &request.body {
        Body::Form(data) => {
            for (key, value) in data.iter() {
                form = form.text(key.to_string(), value.to_string());
            }
        }
        Body::Raw(bytes) if bytes.is_empty() => {}
        Body::Raw(_) => {
            return Err(TransportError::other(
                "a raw request body cannot be combined with file uploads",
            ))
        }
    }

    for attachment in &request.files {
        let mut contents = Vec::new();
        (&attachment.file)
            .read_to_end(&mut contents)
            .map_err(|e| TransportError::Other {
                message: format!("could not read {}: {e}", attachment.path.display()),
                source: Some(Box::new(e)),
            })?;
        let part = multipart::Part::bytes(contents).file_name(attachment.name.clone());
        form = form.part(attachment.name.clone(), part);
    }

    Ok(form)
}

/// Build a request from the descriptor
fn build_request(
    client: &reqwest::Client,
    request: &RequestDescriptor,
) -> Result<reqwest::RequestBuilder, TransportError> {
    let method = reqwest::Method::from_bytes(request.method.to_uppercase().as_bytes())
        .map_err(|e| TransportError::Other {
            message: format!("invalid method: {}", request.method),
            source: Some(Box::new(e)),
        })?;
    let multipart = !request.files.is_empty();

    let mut req_builder = client.request(method, &request.url);

    // Add headers; multipart supplies its own Content-Type with the boundary
    for (key, value) in request.headers.iter() {
        if multipart && key.eq_ignore_ascii_case("Content-Type") && value == TYPE_FORM {
            continue;
        }
        req_builder = req_builder.header(key, value);
    }

    // Add auth
    if let Some(auth) = &request.auth {
        let credentials = format!("{}:{}", auth.username, auth.password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
        req_builder = req_builder.header("Authorization", format!("Basic {}", encoded));
    }

    // Add body
    if multipart {
        req_builder = req_builder.multipart(build_form(request)?);
    } else if !request.body.is_empty() {
        req_builder = req_builder.body(request.body.to_bytes());
    }

    Ok(req_builder)
}

/// Execute the request and buffer the whole response
async fn execute_request(request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
    let client = create_client(request)?;
    let req_builder = build_request(&client, request)?;

    tracing::info!(method = %request.method, url = %request.url, "Executing request");
    let start = Instant::now();

    let response = req_builder.send().await.map_err(classify_error)?;
    let status = response.status();
    let reason = reason_phrase(&response);
    let version = version_string(response.version());
    let headers: Vec<(String, Vec<u8>)> = response
        .headers()
        .iter()
        .map(|(name, value)| (name.as_str().to_string(), value.as_bytes().to_vec()))
        .collect();
    let encoding = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(charset_from_content_type);
    let body = response.bytes().await.map_err(classify_error)?.to_vec();

    tracing::info!(
        status = status.as_u16(),
        time_ms = start.elapsed().as_millis() as u64,
        bytes = body.len(),
        "Request completed"
    );

    Ok(RawResponse {
        status: status.as_u16(),
        reason,
        version,
        headers,
        body,
        encoding,
    })
}

/// Reason phrase as sent by the server.
///
/// hyper only records the phrase when it differs from the canonical one.
fn reason_phrase(response: &reqwest::Response) -> String {
    match response.extensions().get::<ReasonPhrase>() {
        Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
    }
}

static CHARSET_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Charset named in a Content-Type value; `text` types default to Latin-1
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    let pattern = CHARSET_PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)charset\s*=\s*["']?([^"';\s]+)"#).expect("charset pattern is valid")
    });
    if let Some(captures) = pattern.captures(content_type) {
        return Some(captures[1].to_string());
    }
    if content_type.to_ascii_lowercase().contains("text") {
        return Some(String::from("ISO-8859-1"));
    }
    None
}

fn version_string(version: Version) -> String {
    let version = if version == Version::HTTP_09 {
        "0.9"
    } else if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else if version == Version::HTTP_3 {
        "3"
    } else {
        "1.1"
    };
    version.to_string()
}

/// Whole error chain on one line
fn error_message(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

/// rustls reports handshake and certificate failures as `InvalidData`
fn is_tls_failure(error: &(dyn StdError + 'static)) -> bool {
    let mut source = error.source();
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::InvalidData {
                return true;
            }
        }
        source = cause.source();
    }
    false
}

fn classify_error(e: reqwest::Error) -> TransportError {
    let message = error_message(&e);
    let timeout = e.is_timeout();
    let tls = is_tls_failure(&e);
    let network = e.is_connect() || e.is_request();
    let source: Option<Box<dyn StdError + Send + Sync>> = Some(Box::new(e));

    if timeout {
        TransportError::Timeout { message, source }
    } else if tls {
        TransportError::Tls { message, source }
    } else if network {
        TransportError::Network { message, source }
    } else {
        TransportError::Other { message, source }
    }
}
