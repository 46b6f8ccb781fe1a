//! Terminal colorizing for response headers and bodies

use crossterm::style::{style, Color, Stylize};
use serde::{Deserialize, Serialize};

/// Renders response text for a terminal
pub trait Formatter {
    /// Colorize a status line or a block of `Name: value` header lines
    fn render_headers(&self, text: &str) -> String;

    /// Reformat and colorize a body of the given content type
    fn render_body(&self, text: &str, content_type: &str) -> String;
}

/// Named color styles selectable with `--style`
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Solarized,
    Monokai,
    Zenburn,
    Native,
    Bw,
}

impl Style {
    pub fn as_str(&self) -> &str {
        match self {
            Style::Solarized => "solarized",
            Style::Monokai => "monokai",
            Style::Zenburn => "zenburn",
            Style::Native => "native",
            Style::Bw => "bw",
        }
    }

    fn palette(&self) -> Palette {
        match self {
            Style::Solarized => Palette {
                key: Color::Blue,
                string: Color::Cyan,
                number: Color::DarkCyan,
                literal: Color::Green,
                punctuation: Color::Grey,
                header_name: Color::Blue,
            },
            Style::Monokai => Palette {
                key: Color::Magenta,
                string: Color::Yellow,
                number: Color::DarkMagenta,
                literal: Color::Cyan,
                punctuation: Color::White,
                header_name: Color::Green,
            },
            Style::Zenburn => Palette {
                key: Color::DarkYellow,
                string: Color::DarkRed,
                number: Color::DarkGreen,
                literal: Color::Green,
                punctuation: Color::Grey,
                header_name: Color::DarkYellow,
            },
            Style::Native => Palette {
                key: Color::Cyan,
                string: Color::Green,
                number: Color::Yellow,
                literal: Color::Magenta,
                punctuation: Color::White,
                header_name: Color::Cyan,
            },
            Style::Bw => Palette {
                key: Color::Reset,
                string: Color::Reset,
                number: Color::Reset,
                literal: Color::Reset,
                punctuation: Color::Reset,
                header_name: Color::Reset,
            },
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Palette {
    key: Color,
    string: Color,
    number: Color,
    literal: Color,
    punctuation: Color,
    header_name: Color,
}

/// ANSI formatter used for terminal output
#[derive(Clone, Debug)]
pub struct PrettyHttp {
    style: Style,
    palette: Palette,
}

impl PrettyHttp {
    pub fn new(style: Style) -> Self {
        PrettyHttp {
            style,
            palette: style.palette(),
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.style == Style::Bw {
            return text.to_string();
        }
        style(text).with(color).to_string()
    }

    fn render_status_line(&self, line: &str) -> String {
        let mut parts = line.splitn(3, ' ');
        let version = parts.next().unwrap_or_default();
        let code = parts.next().unwrap_or_default();
        let reason = parts.next().unwrap_or_default();
        let color = code.parse().map(status_color).unwrap_or(Color::Yellow);

        let mut out = self.paint(version, self.palette.header_name);
        if !code.is_empty() {
            out.push(' ');
            out.push_str(&self.paint(code, color));
        }
        if !reason.is_empty() {
            out.push(' ');
            out.push_str(&self.paint(reason, color));
        }
        out
    }

    fn render_header_line(&self, line: &str) -> String {
        match line.split_once(':') {
            Some((name, value)) => format!(
                "{}{}{}",
                self.paint(name, self.palette.header_name),
                self.paint(":", self.palette.punctuation),
                value
            ),
            None => line.to_string(),
        }
    }

    /// Simple JSON syntax highlighting
    fn highlight_json(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let chars: Vec<char> = text.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            match c {
                '"' => {
                    let start = i;
                    i += 1;
                    while i < chars.len() && chars[i] != '"' {
                        if chars[i] == '\\' {
                            i += 1;
                        }
                        i += 1;
                    }
                    i = (i + 1).min(chars.len());
                    let literal: String = chars[start..i].iter().collect();

                    // A string followed by ':' is an object key
                    let is_key = chars[i..]
                        .iter()
                        .find(|c| !c.is_whitespace())
                        .is_some_and(|c| *c == ':');
                    let color = if is_key {
                        self.palette.key
                    } else {
                        self.palette.string
                    };
                    out.push_str(&self.paint(&literal, color));
                    continue;
                }
                '{' | '}' | '[' | ']' | ':' | ',' => {
                    out.push_str(&self.paint(&c.to_string(), self.palette.punctuation));
                }
                '-' | '0'..='9' => {
                    let start = i;
                    while i < chars.len()
                        && matches!(chars[i], '0'..='9' | '-' | '+' | '.' | 'e' | 'E')
                    {
                        i += 1;
                    }
                    let number: String = chars[start..i].iter().collect();
                    out.push_str(&self.paint(&number, self.palette.number));
                    continue;
                }
                'a'..='z' => {
                    let start = i;
                    while i < chars.len() && chars[i].is_ascii_alphabetic() {
                        i += 1;
                    }
                    let word: String = chars[start..i].iter().collect();
                    if matches!(word.as_str(), "true" | "false" | "null") {
                        out.push_str(&self.paint(&word, self.palette.literal));
                    } else {
                        out.push_str(&word);
                    }
                    continue;
                }
                _ => out.push(c),
            }
            i += 1;
        }

        out
    }
}

impl Formatter for PrettyHttp {
    fn render_headers(&self, text: &str) -> String {
        text.lines()
            .map(|line| {
                if line.starts_with("HTTP/") {
                    self.render_status_line(line)
                } else {
                    self.render_header_line(line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_body(&self, text: &str, content_type: &str) -> String {
        if !content_type.to_ascii_lowercase().contains("json") {
            return text.to_string();
        }
        match indent_json(text) {
            Some(indented) => self.highlight_json(&indented),
            None => text.to_string(),
        }
    }
}

/// Re-serialize JSON with sorted keys and a four-space indent
fn indent_json(text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer).ok()?;
    String::from_utf8(buf).ok()
}

/// Status code color
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Red,
        500..=599 => Color::Magenta,
        _ => Color::Yellow,
    }
}
