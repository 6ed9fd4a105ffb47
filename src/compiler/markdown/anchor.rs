//! Automatic heading ids.
//!
//! Headings without an explicit `{#id}` get a slug of their text.
//! Repeated slugs are suffixed `-1`, `-2`, ... in document order.

use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use rustc_hash::FxHashMap;

/// Fill in `id` for every heading start event that lacks one.
pub(super) fn assign_heading_ids(events: &mut [Event<'_>]) {
    let mut used: FxHashMap<String, usize> = FxHashMap::default();

    // Explicit ids claim their slugs first
    for event in events.iter() {
        if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
            used.insert(id.to_string(), 0);
        }
    }

    for i in 0..events.len() {
        if !matches!(events[i], Event::Start(Tag::Heading { id: None, .. })) {
            continue;
        }
        let text = heading_text(&events[i + 1..]);
        let slug = unique_slug(&mut used, &slugify(&text));
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(slug));
        }
    }
}

/// Plain text of a heading, up to its end tag.
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

/// Lowercase, keep letters/digits/`_`, turn whitespace and `-` runs into a single `-`.
pub(super) fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }
    slug
}

fn unique_slug(used: &mut FxHashMap<String, usize>, base: &str) -> String {
    let base = if base.is_empty() { "heading" } else { base };

    let Some(&last) = used.get(base) else {
        used.insert(base.to_string(), 0);
        return base.to_string();
    };

    let mut n = last;
    loop {
        n += 1;
        let candidate = format!("{base}-{n}");
        if !used.contains_key(&candidate) {
            used.insert(base.to_string(), n);
            used.insert(candidate.clone(), 0);
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_cmark::{Parser, html};

    fn render_with_ids(source: &str) -> String {
        let mut events: Vec<Event<'_>> = Parser::new(source).collect();
        assign_heading_ids(&mut events);
        let mut out = String::new();
        html::push_html(&mut out, events.into_iter());
        out
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Getting   Started  "), "getting-started");
        assert_eq!(slugify("API v2.0: What's new?"), "api-v20-whats-new");
        assert_eq!(slugify("snake_case - ok"), "snake_case-ok");
    }

    #[test]
    fn test_slugify_unicode() {
        assert_eq!(slugify("Über Café"), "über-café");
        assert_eq!(slugify("中文 标题"), "中文-标题");
    }

    #[test]
    fn test_slugify_symbols_only() {
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_duplicate_headings_get_suffixes() {
        let html = render_with_ids("# Intro\n\n## Intro\n\n### Intro\n");
        assert!(html.contains("<h1 id=\"intro\">"));
        assert!(html.contains("<h2 id=\"intro-1\">"));
        assert!(html.contains("<h3 id=\"intro-2\">"));
    }

    #[test]
    fn test_suffix_skips_taken_slug() {
        let html = render_with_ids("# A 1\n\n# A\n\n# A\n");
        assert!(html.contains("<h1 id=\"a-1\">A 1</h1>"));
        assert!(html.contains("<h1 id=\"a\">A</h1>"));
        assert!(html.contains("<h1 id=\"a-2\">A</h1>"));
    }

    #[test]
    fn test_inline_code_and_emphasis_in_heading() {
        let html = render_with_ids("## The `render` *function*\n");
        assert!(html.contains("<h2 id=\"the-render-function\">"));
    }

    #[test]
    fn test_empty_slug_falls_back() {
        let html = render_with_ids("# ???\n\n# !!!\n");
        assert!(html.contains("<h1 id=\"heading\">"));
        assert!(html.contains("<h1 id=\"heading-1\">"));
    }
}
