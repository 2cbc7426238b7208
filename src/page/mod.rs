//! Landing and error pages.
//!
//! The pipeline only ever asks for two pages: the default landing page and
//! the same page with its tagline swapped for an error message. Anything
//! implementing [`PageRenderer`] can stand in for the bundled shell.

const SHELL: &str = include_str!("shell.html");
const TAGLINE_SLOT: &str = "{{tagline}}";
const TAGLINE: &str = r#"<p class="tagline">Point it at a URL to fetch it through the proxy</p>"#;

/// Presentation collaborator for pages the proxy renders itself.
pub trait PageRenderer: Send + Sync {
    /// Default page, shown when no target is given.
    fn landing(&self) -> String;

    /// Landing page variant carrying `message` in place of the tagline.
    fn error(&self, message: &str) -> String;
}

/// The bundled HTML shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellPage;

impl PageRenderer for ShellPage {
    fn landing(&self) -> String {
        SHELL.replace(TAGLINE_SLOT, TAGLINE)
    }

    fn error(&self, message: &str) -> String {
        let tagline = format!(
            r#"<p class="tagline error">Error: {}</p>"#,
            escape_html(message)
        );
        SHELL.replace(TAGLINE_SLOT, &tagline)
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
