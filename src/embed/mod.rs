//! Embedded static resources for mdserve.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `serve` - Preview server templates (page.html, livereload.js)
//!
//! # Usage
//!
//! ```ignore
//! use embed::serve::{LIVERELOAD_JS, LivereloadVars, PAGE_HTML, PageVars};
//!
//! let script = LIVERELOAD_JS.render(&LivereloadVars { poll_ms: 1000 });
//! let html = PAGE_HTML.render(&PageVars { title, stylesheet, content, version, reload_script: &script });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};
    use crate::utils::html::{escape, escape_attr};

    /// Placeholder for the rendered document. Substituted last, in one piece,
    /// so document text is never scanned for other placeholders.
    const CONTENT: &str = "__MDSERVE_CONTENT__";

    /// Variables for page.html template.
    pub struct PageVars<'a> {
        /// Page title (unescaped)
        pub title: &'a str,
        /// Stylesheet URL, empty for none
        pub stylesheet: &'a str,
        /// Rendered HTML fragment
        pub content: &'a str,
        /// Version token of `content`, seeds the polling client
        pub version: &'a str,
        /// Inline reload script, empty when live reload is off
        pub reload_script: &'a str,
    }

    impl PageVars<'_> {
        fn apply_head(&self, part: &str) -> String {
            let stylesheet = if self.stylesheet.is_empty() {
                String::new()
            } else {
                format!(
                    r#"<link rel="stylesheet" href="{}" />"#,
                    escape_attr(self.stylesheet)
                )
            };
            let script = if self.reload_script.is_empty() {
                String::new()
            } else {
                format!("<script>\n{}</script>", self.reload_script)
            };

            part.replace("__MDSERVE_TITLE__", &escape(self.title))
                .replace("__MDSERVE_VERSION__", &escape_attr(self.version))
                .replace("__MDSERVE_STYLESHEET__", &stylesheet)
                .replace("__MDSERVE_RELOAD_SCRIPT__", &script)
        }
    }

    impl TemplateVars for PageVars<'_> {
        fn apply(&self, content: &str) -> String {
            match content.split_once(CONTENT) {
                Some((head, tail)) => {
                    let head = self.apply_head(head);
                    let tail = self.apply_head(tail);
                    let mut out =
                        String::with_capacity(head.len() + self.content.len() + tail.len());
                    out.push_str(&head);
                    out.push_str(self.content);
                    out.push_str(&tail);
                    out
                }
                // A shell without a content slot still shows the document
                None => {
                    let mut out = self.apply_head(content);
                    out.push_str(self.content);
                    out
                }
            }
        }
    }

    /// Page shell around the rendered document.
    pub const PAGE_HTML: Template<PageVars<'static>> =
        Template::new(include_str!("serve/page.html"));

    impl Template<PageVars<'static>> {
        /// Render with borrowed per-request values.
        pub fn render_page(&self, vars: &PageVars<'_>) -> String {
            vars.apply(self.content())
        }
    }

    /// Variables for livereload.js template.
    pub struct LivereloadVars {
        pub poll_ms: u64,
    }

    impl TemplateVars for LivereloadVars {
        fn apply(&self, content: &str) -> String {
            content.replace("__MDSERVE_POLL_MS__", &self.poll_ms.to_string())
        }
    }

    /// Polling client: asks `/ping` for the version and reloads on change.
    pub const LIVERELOAD_JS: Template<LivereloadVars> =
        Template::new(include_str!("serve/livereload.js"));
}
