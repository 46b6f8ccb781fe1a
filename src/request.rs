//! Request assembly - merges classified items, flags and stdin into a
//! [`RequestDescriptor`]

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::cli::Options;
use crate::constants::{DEFAULT_SCHEME, DEFAULT_UA, TYPE_FORM, TYPE_JSON};
use crate::error::AssembleError;
use crate::models::{Attachment, Body, DataMap, HeaderMap, RequestDescriptor, Verify};

/// Build the request described by `options`.
///
/// When `stdin_is_tty` is false, stdin is read to the end and becomes the
/// body verbatim; `key=value` items are then rejected.
pub fn assemble_request<R: Read>(
    options: &Options,
    mut stdin: R,
    stdin_is_tty: bool,
) -> Result<RequestDescriptor, AssembleError> {
    let mut headers = HeaderMap::new();
    headers.insert("User-Agent", DEFAULT_UA);
    let mut data = DataMap::new();

    for item in &options.items {
        if item.is_header() {
            headers.insert(item.key.as_str(), item.value.as_str());
        } else {
            if !stdin_is_tty {
                return Err(AssembleError::MixedBodySource);
            }
            data.insert(item.key.as_str(), item.value.as_str());
        }
    }

    let body = if stdin_is_tty {
        Body::Form(data)
    } else {
        let mut piped = Vec::new();
        stdin
            .read_to_end(&mut piped)
            .map_err(AssembleError::Stdin)?;
        Body::Raw(piped)
    };

    let body = negotiate_content_type(options, &mut headers, body);
    let files = open_attachments(&options.files)?;

    let descriptor = RequestDescriptor {
        method: options.method.to_lowercase(),
        url: normalize_url(&options.url),
        headers,
        body,
        auth: options.auth.clone(),
        proxies: options.proxies.clone(),
        files,
        verify: Verify::from_flag(options.verify.as_deref()),
        timeout: options.timeout,
        allow_redirects: options.allow_redirects,
    };

    tracing::debug!(
        method = %descriptor.method,
        url = %descriptor.url,
        headers = descriptor.headers.len(),
        files = descriptor.files.len(),
        "Assembled request"
    );
    Ok(descriptor)
}

/// Pick the body encoding and, unless the user set one, the Content-Type.
///
/// JSON wins when `--json` is given, or when `--form` is not given and there
/// is any body data at all. An explicit `--json` with no data still yields a
/// JSON request.
fn negotiate_content_type(options: &Options, headers: &mut HeaderMap, body: Body) -> Body {
    let user_content_type = headers.contains_key("Content-Type");

    if options.json || (!options.form && !body.is_empty()) {
        let body = match body {
            Body::Form(data) => Body::Raw(data.to_json().into_bytes()),
            raw => raw,
        };
        if !user_content_type {
            headers.insert("Content-Type", TYPE_JSON);
        }
        body
    } else {
        if !user_content_type {
            headers.insert("Content-Type", TYPE_FORM);
        }
        body
    }
}

/// Prefix `http://` when the URL carries no scheme
pub fn normalize_url(url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{url}")
    }
}

fn open_attachments(paths: &[impl AsRef<Path>]) -> Result<Vec<Attachment>, AssembleError> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let file = File::open(path).map_err(|source| AssembleError::Attachment {
                path: path.to_path_buf(),
                source,
            })?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned());
            Ok(Attachment {
                name,
                path: path.to_path_buf(),
                file,
            })
        })
        .collect()
}
