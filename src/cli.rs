//! Command-line surface
//!
//! `Options::parse_from` is a pure function from arguments (plus file
//! defaults) to an immutable [`Options`] value.

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::Config;
use crate::items::{parse_common, parse_item};
use crate::models::{BasicAuth, PrettifyMode, Token};
use crate::pretty::Style;
use crate::render::RenderSettings;

#[derive(Parser, Debug)]
#[command(name = "http", version)]
#[command(about = "HTTPie - cURL for humans.")]
struct Args {
    /// Serialize data items as a JSON object and set Content-Type to
    /// application/json, if not specified.
    #[arg(short, long, conflicts_with = "form")]
    json: bool,

    /// Serialize data items as form values and set Content-Type to
    /// application/x-www-form-urlencoded, if not specified.
    #[arg(short, long)]
    form: bool,

    /// Print the full error chain should the request fail.
    #[arg(long)]
    traceback: bool,

    /// Prettify the response even when stdout is redirected.
    #[arg(short, long, conflicts_with = "ugly")]
    pretty: bool,

    /// Do not prettify the response.
    #[arg(short, long)]
    ugly: bool,

    /// Print only the response headers.
    #[arg(short = 't', long = "headers", conflicts_with = "body_only")]
    headers_only: bool,

    /// Print only the response body.
    #[arg(short = 'b', long = "body")]
    body_only: bool,

    /// Output coloring style. Defaults to solarized.
    #[arg(short, long, value_enum, value_name = "STYLE")]
    style: Option<Style>,

    /// username:password
    #[arg(short, long, value_parser = parse_common, value_name = "USER:PASSWORD")]
    auth: Option<Token>,

    /// Set to "yes" to check the host's SSL certificate, or pass the path to
    /// a CA bundle file for private certs.
    #[arg(long)]
    verify: Option<String>,

    /// String mapping protocol to the URL of the proxy (e.g. http:foo.bar:3128).
    #[arg(long, value_parser = parse_common, value_name = "PROTOCOL:URL")]
    proxy: Vec<Token>,

    /// Follow redirects (e.g. re-POST-ing of data at the new Location).
    #[arg(long)]
    allow_redirects: bool,

    /// File to multipart upload.
    #[arg(long = "file", value_name = "PATH")]
    files: Vec<PathBuf>,

    /// Timeout of the request in seconds.
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<f64>,

    /// HTTP method to be used for the request (GET, POST, PUT, DELETE, PATCH, ...).
    #[arg(value_name = "METHOD")]
    method: String,

    /// Protocol defaults to http:// if the URL does not include it.
    #[arg(value_name = "URL")]
    url: String,

    /// HTTP header (key:value) or data field (key=value)
    #[arg(value_parser = parse_item, value_name = "ITEM")]
    items: Vec<Token>,
}

/// Fully parsed invocation
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    pub method: String,
    pub url: String,
    pub items: Vec<Token>,
    pub json: bool,
    pub form: bool,
    pub prettify: PrettifyMode,
    pub print_headers: bool,
    pub print_body: bool,
    pub style: Style,
    pub auth: Option<BasicAuth>,
    /// Raw `--verify` value
    pub verify: Option<String>,
    pub proxies: Vec<(String, String)>,
    pub files: Vec<PathBuf>,
    pub timeout: Option<f64>,
    pub allow_redirects: bool,
    pub traceback: bool,
}

impl Options {
    /// Parse `args` (including the program name); flags win over `config`
    pub fn parse_from<I, T>(args: I, config: &Config) -> Result<Options, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = Args::try_parse_from(args)?;
        Ok(Options::from_args(args, config))
    }

    /// Output selection for the renderer
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            prettify: self.prettify,
            print_headers: self.print_headers,
            print_body: self.print_body,
        }
    }

    fn from_args(args: Args, config: &Config) -> Options {
        let prettify = if args.pretty {
            PrettifyMode::Always
        } else if args.ugly {
            PrettifyMode::Never
        } else {
            PrettifyMode::AutoTty
        };

        Options {
            method: args.method,
            url: args.url,
            items: args.items,
            json: args.json,
            form: args.form,
            prettify,
            print_headers: !args.body_only,
            print_body: !args.headers_only,
            style: args.style.or(config.style).unwrap_or_default(),
            auth: args.auth.map(|token| BasicAuth {
                username: token.key,
                password: token.value,
            }),
            verify: args.verify,
            proxies: args
                .proxy
                .into_iter()
                .map(|token| (token.key, token.value))
                .collect(),
            files: args.files,
            timeout: args.timeout.or(config.timeout),
            allow_redirects: args.allow_redirects,
            traceback: args.traceback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Options, clap::Error> {
        let argv = std::iter::once("http").chain(args.iter().copied());
        Options::parse_from(argv, &Config::default())
    }

    #[test]
    fn test_defaults() {
        let options = parse(&["GET", "example.com"]).unwrap();
        assert_eq!(options.method, "GET");
        assert_eq!(options.url, "example.com");
        assert!(options.items.is_empty());
        assert_eq!(options.prettify, PrettifyMode::AutoTty);
        assert!(options.print_headers);
        assert!(options.print_body);
        assert_eq!(options.style, Style::Solarized);
        assert!(!options.allow_redirects);
        assert!(options.timeout.is_none());
    }

    #[test]
    fn test_items_are_classified() {
        let options = parse(&["POST", "x.org", "X-Foo:bar", "name=joe"]).unwrap();
        assert_eq!(options.items.len(), 2);
        assert!(options.items[0].is_header());
        assert!(!options.items[1].is_header());
    }

    #[test]
    fn test_invalid_item_is_usage_error() {
        let err = parse(&["GET", "x.org", "garbage"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains("garbage"));
    }

    #[test]
    fn test_mutually_exclusive_flags() {
        for pair in [["--json", "--form"], ["--pretty", "--ugly"], ["--headers", "--body"]] {
            let err = parse(&[pair[0], pair[1], "GET", "x.org"]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        }
    }

    #[test]
    fn test_output_flags() {
        let options = parse(&["-t", "-u", "GET", "x.org"]).unwrap();
        assert!(options.print_headers);
        assert!(!options.print_body);
        assert_eq!(options.prettify, PrettifyMode::Never);

        let options = parse(&["-b", "-p", "GET", "x.org"]).unwrap();
        assert!(!options.print_headers);
        assert!(options.print_body);
        assert_eq!(options.prettify, PrettifyMode::Always);
    }

    #[test]
    fn test_request_flags() {
        let options = parse(&[
            "--auth",
            "joe:s3cr:et",
            "--proxy",
            "http:proxy.local:3128",
            "--proxy",
            "https:secure.local:443",
            "--verify",
            "/etc/ca.pem",
            "--timeout",
            "1.5",
            "--allow-redirects",
            "--style",
            "monokai",
            "GET",
            "x.org",
        ])
        .unwrap();

        let auth = options.auth.unwrap();
        assert_eq!(auth.username, "joe");
        assert_eq!(auth.password, "s3cr:et");
        assert_eq!(
            options.proxies,
            vec![
                ("http".to_string(), "proxy.local:3128".to_string()),
                ("https".to_string(), "secure.local:443".to_string()),
            ]
        );
        assert_eq!(options.verify.as_deref(), Some("/etc/ca.pem"));
        assert_eq!(options.timeout, Some(1.5));
        assert!(options.allow_redirects);
        assert_eq!(options.style, Style::Monokai);
    }

    #[test]
    fn test_unknown_style_rejected() {
        let err = parse(&["--style", "rainbow", "GET", "x.org"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_config_supplies_missing_flags() {
        let config = Config {
            style: Some(Style::Zenburn),
            timeout: Some(3.0),
        };
        let options = Options::parse_from(["http", "GET", "x.org"], &config).unwrap();
        assert_eq!(options.style, Style::Zenburn);
        assert_eq!(options.timeout, Some(3.0));

        let options =
            Options::parse_from(["http", "-s", "bw", "--timeout", "9", "GET", "x.org"], &config)
                .unwrap();
        assert_eq!(options.style, Style::Bw);
        assert_eq!(options.timeout, Some(9.0));
    }

    #[test]
    fn test_missing_url() {
        let err = parse(&["GET"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}
