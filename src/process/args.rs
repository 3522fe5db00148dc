//! Ordered, append-only accumulation of subprocess argument tokens.
//!
//! Tokens are handed to the OS as an argument vector (`Command::args`), so
//! the vector rendering is always verbatim and round-trips every token
//! exactly, whitespace included. Quoting only matters for the single-string
//! [`command_line`](ArgumentBuilder::command_line) rendering used for display
//! and diagnostics; it is decided per-token at append time, never after.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A single argument token and whether it was appended via `append_quoted`.
#[derive(Debug, Clone)]
struct Token {
    text: String,
    quoted: bool,
}

/// Accumulates an ordered sequence of command-line tokens.
///
/// Tokens are appended only; there is no removal or mutation after append.
/// Created per invocation and discarded after the subprocess call.
#[derive(Debug, Clone, Default)]
pub struct ArgumentBuilder {
    tokens: Vec<Token>,
    env: BTreeMap<String, String>,
    working_dir: Option<PathBuf>,
}

impl ArgumentBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw token verbatim; no quoting in any rendering.
    pub fn append(&mut self, token: impl Into<String>) {
        self.tokens.push(Token {
            text: token.into(),
            quoted: false,
        });
    }

    /// Append a token that will be wrapped in quotes (with embedded quote
    /// characters escaped) in the command-line rendering if it contains
    /// whitespace or a quote character. Otherwise identical to [`append`].
    ///
    /// [`append`]: ArgumentBuilder::append
    pub fn append_quoted(&mut self, token: impl Into<String>) {
        self.tokens.push(Token {
            text: token.into(),
            quoted: true,
        });
    }

    /// Set an environment variable for the spawned subprocess.
    pub fn set_env(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.env.insert(key.into(), value.into());
    }

    /// Set the working directory for the spawned subprocess.
    pub fn set_working_dir(&mut self, path: impl Into<PathBuf>) {
        self.working_dir = Some(path.into());
    }

    /// Environment variables to merge into the subprocess environment.
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Working directory for the subprocess, if one was set.
    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// Number of appended tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if no tokens have been appended.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The final token sequence in append order, suitable for
    /// `std::process::Command::args`. Tokens are verbatim: the argument
    /// vector needs no shell quoting, and an empty token is passed through
    /// as an empty string rather than silently dropped.
    pub fn render(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.text.clone()).collect()
    }

    /// A single shell-ready string for display and logging.
    ///
    /// Quoted tokens containing whitespace or quote characters are wrapped
    /// in double quotes with embedded quotes escaped. An empty token always
    /// renders as `""` so it remains visible.
    pub fn command_line(&self) -> String {
        self.tokens
            .iter()
            .map(|t| {
                if t.text.is_empty() || (t.quoted && needs_quoting(&t.text)) {
                    quote(&t.text)
                } else {
                    t.text.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn needs_quoting(token: &str) -> bool {
    token.contains(char::is_whitespace) || token.contains('"')
}

fn quote(token: &str) -> String {
    format!("\"{}\"", token.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_render_in_append_order() {
        let mut builder = ArgumentBuilder::new();
        builder.append("devices");
        builder.append("-l");
        assert_eq!(builder.render(), vec!["devices", "-l"]);
    }

    #[test]
    fn append_and_append_quoted_identical_for_plain_tokens() {
        let mut a = ArgumentBuilder::new();
        a.append("emulator-5554");

        let mut b = ArgumentBuilder::new();
        b.append_quoted("emulator-5554");

        assert_eq!(a.render(), b.render());
        assert_eq!(a.command_line(), b.command_line());
    }

    #[test]
    fn whitespace_token_round_trips_through_vector() {
        let mut builder = ArgumentBuilder::new();
        builder.append_quoted("some file name.apk");

        // The argument vector is verbatim; Command::args passes it unchanged.
        assert_eq!(builder.render(), vec!["some file name.apk"]);
    }

    #[test]
    fn command_line_quotes_whitespace_tokens() {
        let mut builder = ArgumentBuilder::new();
        builder.append("install");
        builder.append_quoted("my app.apk");
        assert_eq!(builder.command_line(), "install \"my app.apk\"");
    }

    #[test]
    fn command_line_escapes_embedded_quotes() {
        let mut builder = ArgumentBuilder::new();
        builder.append_quoted("say \"hi\"");
        assert_eq!(builder.command_line(), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn raw_append_is_never_quoted() {
        let mut builder = ArgumentBuilder::new();
        builder.append("already formatted");
        assert_eq!(builder.command_line(), "already formatted");
    }

    #[test]
    fn empty_token_is_kept_and_rendered_quoted() {
        let mut builder = ArgumentBuilder::new();
        builder.append("");
        builder.append_quoted("");

        // Not dropped from the vector...
        assert_eq!(builder.render(), vec!["", ""]);
        // ...and visible in the line rendering.
        assert_eq!(builder.command_line(), "\"\" \"\"");
    }

    #[test]
    fn serial_tokens_stay_in_front_of_later_appends() {
        let mut builder = ArgumentBuilder::new();
        builder.append("-s");
        builder.append_quoted("emulator-5554");
        builder.append("shell");
        builder.append_quoted("getprop ro.product.model");

        let rendered = builder.render();
        assert_eq!(&rendered[..2], &["-s", "emulator-5554"]);
        assert_eq!(rendered[2], "shell");
    }

    #[test]
    fn env_and_working_dir_are_carried() {
        let mut builder = ArgumentBuilder::new();
        builder.set_env("ANDROID_SERIAL", "emulator-5554");
        builder.set_working_dir("/tmp");

        assert_eq!(
            builder.env().get("ANDROID_SERIAL").map(String::as_str),
            Some("emulator-5554")
        );
        assert_eq!(builder.working_dir(), Some(Path::new("/tmp")));
    }

    #[test]
    fn empty_builder_renders_empty() {
        let builder = ArgumentBuilder::new();
        assert!(builder.is_empty());
        assert_eq!(builder.len(), 0);
        assert!(builder.render().is_empty());
        assert_eq!(builder.command_line(), "");
    }
}
