//! Response rendering - turns a raw response into the text printed on stdout

use crate::models::{PrettifyMode, RawResponse, ResponseView};
use crate::pretty::Formatter;

/// Which parts of the response to print and whether to prettify them
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSettings {
    pub prettify: PrettifyMode,
    pub print_headers: bool,
    pub print_body: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            prettify: PrettifyMode::AutoTty,
            print_headers: true,
            print_body: true,
        }
    }
}

/// Produce the final output text for `response`.
///
/// The formatter only sees the body when the response declares a
/// Content-Type.
pub fn render_response(
    response: &RawResponse,
    formatter: &dyn Formatter,
    settings: &RenderSettings,
    stdout_is_tty: bool,
) -> String {
    let do_prettify = settings.prettify.resolve(stdout_is_tty);
    let ResponseView {
        mut status_line,
        mut headers,
        mut body,
        content_type,
    } = ResponseView::decode(response);

    if do_prettify {
        if settings.print_headers {
            status_line = formatter.render_headers(&status_line).trim().to_string();
            headers = formatter.render_headers(&headers);
        }
        if settings.print_body {
            if let Some(content_type) = &content_type {
                body = formatter.render_body(&body, content_type);
            }
        }
    }
    tracing::debug!(do_prettify, ?content_type, "Rendering response");

    let mut out = String::new();
    if settings.print_headers {
        out.push_str(&status_line);
        out.push('\n');
        out.push_str(&headers);
        out.push_str("\n\n");
    }
    if settings.print_body {
        out.push_str(&body);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Tags its input and counts calls
    #[derive(Default)]
    struct CountingFormatter {
        header_calls: Cell<usize>,
        body_calls: Cell<usize>,
    }

    impl Formatter for CountingFormatter {
        fn render_headers(&self, text: &str) -> String {
            self.header_calls.set(self.header_calls.get() + 1);
            format!("<h>{text}</h>")
        }

        fn render_body(&self, text: &str, content_type: &str) -> String {
            self.body_calls.set(self.body_calls.get() + 1);
            format!("<b {content_type}>{text}</b>")
        }
    }

    fn response(content_type: Option<&str>) -> RawResponse {
        let mut headers = vec![("Server".to_string(), b"test".to_vec())];
        if let Some(content_type) = content_type {
            headers.push(("Content-Type".to_string(), content_type.as_bytes().to_vec()));
        }
        RawResponse {
            status: 200,
            reason: "OK".into(),
            version: "1.1".into(),
            headers,
            body: b"{\"a\":1}".to_vec(),
            encoding: None,
        }
    }

    fn settings(prettify: PrettifyMode) -> RenderSettings {
        RenderSettings {
            prettify,
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_output_layout() {
        let formatter = CountingFormatter::default();
        let out = render_response(
            &response(Some("application/json")),
            &formatter,
            &settings(PrettifyMode::Never),
            true,
        );
        assert_eq!(
            out,
            "HTTP/1.1 200 OK\nServer: test\nContent-Type: application/json\n\n{\"a\":1}\n"
        );
        assert_eq!(formatter.header_calls.get(), 0);
        assert_eq!(formatter.body_calls.get(), 0);
    }

    #[test]
    fn test_body_formatted_once_with_content_type() {
        let formatter = CountingFormatter::default();
        let out = render_response(
            &response(Some("application/json")),
            &formatter,
            &settings(PrettifyMode::Always),
            false,
        );
        assert_eq!(formatter.body_calls.get(), 1);
        assert_eq!(formatter.header_calls.get(), 2);
        assert!(out.ends_with("<b application/json>{\"a\":1}</b>\n"));
        assert!(out.starts_with("<h>HTTP/1.1 200 OK</h>\n<h>Server: test"));
    }

    #[test]
    fn test_body_not_formatted_without_content_type() {
        let formatter = CountingFormatter::default();
        let out = render_response(
            &response(None),
            &formatter,
            &settings(PrettifyMode::Always),
            true,
        );
        assert_eq!(formatter.body_calls.get(), 0);
        assert!(out.ends_with("\n\n{\"a\":1}\n"));
    }

    #[test]
    fn test_auto_tty_follows_terminal() {
        let formatter = CountingFormatter::default();
        let ct = response(Some("application/json"));
        render_response(&ct, &formatter, &settings(PrettifyMode::AutoTty), false);
        assert_eq!(formatter.body_calls.get(), 0);
        render_response(&ct, &formatter, &settings(PrettifyMode::AutoTty), true);
        assert_eq!(formatter.body_calls.get(), 1);
    }

    #[test]
    fn test_headers_only() {
        let formatter = CountingFormatter::default();
        let settings = RenderSettings {
            prettify: PrettifyMode::Always,
            print_headers: true,
            print_body: false,
        };
        let out = render_response(&response(Some("text/plain")), &formatter, &settings, true);
        assert_eq!(formatter.body_calls.get(), 0);
        assert!(out.ends_with("</h>\n\n"));
        assert!(!out.contains("{\"a\":1}"));
    }

    #[test]
    fn test_body_only() {
        let formatter = CountingFormatter::default();
        let settings = RenderSettings {
            prettify: PrettifyMode::Never,
            print_headers: false,
            print_body: true,
        };
        let out = render_response(&response(None), &formatter, &settings, true);
        assert_eq!(out, "{\"a\":1}\n");
    }

    #[test]
    fn test_latin1_body() {
        let formatter = CountingFormatter::default();
        let mut raw = response(None);
        raw.body = vec![0x63, 0x61, 0x66, 0xe9];
        let settings = RenderSettings {
            prettify: PrettifyMode::Never,
            print_headers: false,
            print_body: true,
        };
        assert_eq!(render_response(&raw, &formatter, &settings, false), "caf\u{e9}\n");
    }
}
