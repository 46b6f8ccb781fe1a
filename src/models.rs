use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fs::File;
use std::path::PathBuf;

use crate::constants::SEP_COMMON;

/// A classified command-line item: `key:value` or `key=value`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub key: String,
    pub value: String,
    pub separator: char,
}

impl Token {
    /// Headers use the common separator; everything else is body data
    pub fn is_header(&self) -> bool {
        self.separator == SEP_COMMON
    }
}

/// Ordered header map with case-insensitive keys.
///
/// The casing of the first insertion is kept for display; later insertions
/// under an equivalent key only replace the value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        HeaderMap::default()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(key))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key).map(|i| self.entries[i].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered `key=value` body fields, insertion order preserved
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataMap {
    entries: Vec<(String, String)>,
}

impl DataMap {
    pub fn new() -> Self {
        DataMap::default()
    }

    /// Overwrites in place, so a repeated key keeps its first position
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON object text, fields in insertion order
    pub fn to_json(&self) -> String {
        // Serializing string pairs into a String cannot fail
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }

    /// `application/x-www-form-urlencoded` text
    pub fn to_form_urlencoded(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl Serialize for DataMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Request body as handed to the transport
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    /// Fields still to be form-encoded (or sent as multipart text parts)
    Form(DataMap),
    /// Bytes sent verbatim: serialized JSON or piped stdin
    Raw(Vec<u8>),
}

impl Default for Body {
    fn default() -> Self {
        Body::Form(DataMap::new())
    }
}

impl Body {
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Form(data) => data.is_empty(),
            Body::Raw(bytes) => bytes.is_empty(),
        }
    }

    /// Wire bytes of the body
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Body::Form(data) => data.to_form_urlencoded().into_bytes(),
            Body::Raw(bytes) => bytes.clone(),
        }
    }
}

/// Basic-auth credentials from `--auth user:password`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

/// TLS certificate verification setting
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Verify {
    /// Verify against the platform's trusted roots
    #[default]
    Enabled,
    /// Additionally trust the PEM bundle at this path
    CaBundle(PathBuf),
}

impl Verify {
    /// `"yes"` means verify; any other value is a CA bundle path
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            None | Some("yes") => Verify::Enabled,
            Some(path) => Verify::CaBundle(PathBuf::from(path)),
        }
    }
}

/// An open file to be uploaded as a multipart part.
///
/// The handle is closed when the attachment is dropped.
#[derive(Debug)]
pub struct Attachment {
    pub name: String,
    pub path: PathBuf,
    pub file: File,
}

/// Everything the transport needs to perform one request
#[derive(Debug)]
pub struct RequestDescriptor {
    /// Lower-cased HTTP method
    pub method: String,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Body,
    pub auth: Option<BasicAuth>,
    /// Scheme to proxy URL, in command-line order
    pub proxies: Vec<(String, String)>,
    pub files: Vec<Attachment>,
    pub verify: Verify,
    /// Seconds
    pub timeout: Option<f64>,
    pub allow_redirects: bool,
}

/// Response as returned by the transport, before any decoding
#[derive(Clone, Debug, Default)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    /// Protocol version without the `HTTP/` prefix, e.g. `1.1`
    pub version: String,
    pub headers: Vec<(String, Vec<u8>)>,
    pub body: Vec<u8>,
    /// Charset declared by the server, if any
    pub encoding: Option<String>,
}

impl RawResponse {
    /// First header value with a case-insensitive name match, Latin-1 decoded
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| decode_latin1(v))
    }
}

/// Decoded, printable parts of a response
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseView {
    pub status_line: String,
    pub headers: String,
    pub body: String,
    pub content_type: Option<String>,
}

impl ResponseView {
    /// Decode with the declared encoding, falling back to Latin-1
    pub fn decode(response: &RawResponse) -> Self {
        let encoding = response.encoding.as_deref();
        let status_line = format!(
            "HTTP/{} {} {}",
            response.version, response.status, response.reason
        );
        // Names are printed as the HTTP stack delivered them; hyper lower-cases
        // them, so `Content-Type` on the wire prints as `content-type`
        let headers = response
            .headers
            .iter()
            .map(|(name, value)| format!("{}: {}", name, decode_text(value, encoding)))
            .collect::<Vec<_>>()
            .join("\n");
        let body = if response.body.is_empty() {
            String::new()
        } else {
            decode_text(&response.body, encoding)
        };

        ResponseView {
            status_line,
            headers,
            body,
            content_type: response.header("content-type"),
        }
    }
}

/// Whether to run output through the formatter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PrettifyMode {
    Always,
    Never,
    /// Decide at render time: prettify only when stdout is a terminal
    #[default]
    AutoTty,
}

impl PrettifyMode {
    pub fn resolve(self, stdout_is_tty: bool) -> bool {
        match self {
            PrettifyMode::Always => true,
            PrettifyMode::Never => false,
            PrettifyMode::AutoTty => stdout_is_tty,
        }
    }
}

/// Every byte maps to the code point of the same value
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn is_latin1_label(label: &str) -> bool {
    matches!(
        label.trim().to_ascii_lowercase().as_str(),
        "iso-8859-1" | "iso8859-1" | "iso_8859-1" | "latin1" | "latin-1" | "l1"
    )
}

/// Decode `bytes` using a charset label; unknown or missing labels use Latin-1
pub fn decode_text(bytes: &[u8], label: Option<&str>) -> String {
    let encoding = match label {
        Some(label) if !is_latin1_label(label) => {
            encoding_rs::Encoding::for_label(label.trim().as_bytes())
        }
        _ => None,
    };
    match encoding {
        Some(encoding) => encoding.decode(bytes).0.into_owned(),
        None => decode_latin1(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_map_case_insensitive_overwrite() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", "text/plain");
        headers.insert("content-type", "application/json");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
        let (key, _) = headers.iter().next().unwrap();
        assert_eq!(key, "Content-Type");
    }

    #[test]
    fn test_header_map_preserves_order() {
        let mut headers = HeaderMap::new();
        headers.insert("User-Agent", "a");
        headers.insert("X-Foo", "b");
        headers.insert("user-agent", "c");

        let keys: Vec<&str> = headers.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["User-Agent", "X-Foo"]);
        assert_eq!(headers.get("user-agent"), Some("c"));
        assert!(headers.contains_key("x-foo"));
    }

    #[test]
    fn test_data_map_json_keeps_insertion_order() {
        let mut data = DataMap::new();
        data.insert("name", "joe");
        data.insert("age", "5");
        data.insert("name", "ann");

        assert_eq!(data.to_json(), r#"{"name":"ann","age":"5"}"#);
        assert_eq!(DataMap::new().to_json(), "{}");
    }

    #[test]
    fn test_data_map_form_encoding() {
        let mut data = DataMap::new();
        data.insert("q", "a b&c");
        data.insert("x", "1");
        assert_eq!(data.to_form_urlencoded(), "q=a+b%26c&x=1");
    }

    #[test]
    fn test_verify_from_flag() {
        assert_eq!(Verify::from_flag(None), Verify::Enabled);
        assert_eq!(Verify::from_flag(Some("yes")), Verify::Enabled);
        assert_eq!(
            Verify::from_flag(Some("/etc/ca.pem")),
            Verify::CaBundle(PathBuf::from("/etc/ca.pem"))
        );
        assert_eq!(
            Verify::from_flag(Some("no")),
            Verify::CaBundle(PathBuf::from("no"))
        );
    }

    #[test]
    fn test_prettify_mode_resolution() {
        for tty in [true, false] {
            assert!(PrettifyMode::Always.resolve(tty));
            assert!(!PrettifyMode::Never.resolve(tty));
            assert_eq!(PrettifyMode::AutoTty.resolve(tty), tty);
        }
    }

    #[test]
    fn test_decode_falls_back_to_latin1() {
        let bytes = [0x63, 0x61, 0x66, 0xe9, 0x80];
        assert_eq!(decode_text(&bytes, None), "caf\u{e9}\u{80}");
        assert_eq!(decode_text(&bytes, Some("ISO-8859-1")), "caf\u{e9}\u{80}");
        assert_eq!(decode_text(&bytes, Some("no-such-charset")), "caf\u{e9}\u{80}");
        assert_eq!(decode_text("café".as_bytes(), Some("utf-8")), "café");
    }

    #[test]
    fn test_response_view_decode() {
        let response = RawResponse {
            status: 200,
            reason: "OK".into(),
            version: "1.1".into(),
            headers: vec![
                ("Content-Type".into(), b"application/json".to_vec()),
                ("X-Id".into(), b"7".to_vec()),
            ],
            body: br#"{"a":1}"#.to_vec(),
            encoding: None,
        };

        let view = ResponseView::decode(&response);
        assert_eq!(view.status_line, "HTTP/1.1 200 OK");
        assert_eq!(view.headers, "Content-Type: application/json\nX-Id: 7");
        assert_eq!(view.body, r#"{"a":1}"#);
        assert_eq!(view.content_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn test_response_view_without_content_type() {
        let response = RawResponse {
            status: 204,
            reason: "No Content".into(),
            version: "1.1".into(),
            ..Default::default()
        };
        let view = ResponseView::decode(&response);
        assert_eq!(view.body, "");
        assert_eq!(view.headers, "");
        assert!(view.content_type.is_none());
    }
}
