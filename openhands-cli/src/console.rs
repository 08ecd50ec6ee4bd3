//! Terminal output with a small HTML-like markup: `<red>failed</red>`.

use std::io::{IsTerminal, Write};

mod codes {
    pub const RESET: &str = "\x1b[0m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const DIM: &str = "\x1b[90m";
    pub const BOLD: &str = "\x1b[1m";
}

fn tag_code(tag: &str) -> Option<&'static str> {
    match tag {
        "red" => Some(codes::RED),
        "green" => Some(codes::GREEN),
        "yellow" => Some(codes::YELLOW),
        "cyan" => Some(codes::CYAN),
        "dim" => Some(codes::DIM),
        "bold" | "b" => Some(codes::BOLD),
        _ => None,
    }
}

/// Escapes text so it renders literally inside markup.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Renders markup to a terminal string. With `color` off, known tags are stripped.
pub fn render(markup: &str, color: bool) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut open: Vec<&str> = Vec::new();
    let mut rest = markup;

    while let Some(idx) = rest.find(['<', '&']) {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];

        if rest.starts_with('&') {
            let entity = [("&lt;", '<'), ("&gt;", '>'), ("&amp;", '&'), ("&quot;", '"')]
                .into_iter()
                .find(|(name, _)| rest.starts_with(name));
            match entity {
                Some((name, ch)) => {
                    out.push(ch);
                    rest = &rest[name.len()..];
                }
                None => {
                    out.push('&');
                    rest = &rest[1..];
                }
            }
            continue;
        }

        let Some(end) = rest.find('>') else {
            break;
        };
        let tag = &rest[1..end];
        if let Some(name) = tag.strip_prefix('/') {
            if open.last() == Some(&name) {
                open.pop();
                if color {
                    out.push_str(codes::RESET);
                    for name in &open {
                        out.push_str(tag_code(name).unwrap_or_default());
                    }
                }
            } else {
                out.push_str(&rest[..=end]);
            }
        } else if let Some(code) = tag_code(tag) {
            open.push(tag);
            if color {
                out.push_str(code);
            }
        } else {
            out.push_str(&rest[..=end]);
        }
        rest = &rest[end + 1..];
    }
    out.push_str(rest);

    if color && !open.is_empty() {
        out.push_str(codes::RESET);
    }
    out
}

/// Whether stdout should receive ANSI colors.
pub fn stdout_supports_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

pub struct Console<W> {
    out: W,
    color: bool,
}

impl Console<std::io::Stdout> {
    pub fn stdout() -> Self {
        Console::new(std::io::stdout(), stdout_supports_color())
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    /// Renders one line of markup followed by a newline.
    pub fn print_formatted(&mut self, markup: &str) -> std::io::Result<()> {
        writeln!(self.out, "{}", render(markup, self.color))?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
