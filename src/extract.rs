use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ParsedMetadata;

// ── Lazy static regexes ──────────────────────────────────────────────────────

// Attribute order in real markup is inconsistent, so each OG property gets a
// property-first and a content-first pattern.

static OG_TITLE_PROPERTY_FIRST_RE: Lazy<Regex> = Lazy::new(|| og_property_first("og:title"));

static OG_TITLE_CONTENT_FIRST_RE: Lazy<Regex> = Lazy::new(|| og_content_first("og:title"));

static OG_IMAGE_PROPERTY_FIRST_RE: Lazy<Regex> = Lazy::new(|| og_property_first("og:image"));

static OG_IMAGE_CONTENT_FIRST_RE: Lazy<Regex> = Lazy::new(|| og_content_first("og:image"));

static TITLE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<title[^>]*>([^<]+)</title>").unwrap());

static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(amp|lt|gt|quot|#39|nbsp);").unwrap());

fn og_property_first(property: &str) -> Regex {
    let pattern = format!(
        r#"(?i)<meta[^>]*property=["']{}["'][^>]*content=["']([^"']+)["']"#,
        regex::escape(property)
    );
    Regex::new(&pattern).unwrap()
}

fn og_content_first(property: &str) -> Regex {
    let pattern = format!(
        r#"(?i)<meta[^>]*content=["']([^"']+)["'][^>]*property=["']{}["']"#,
        regex::escape(property)
    );
    Regex::new(&pattern).unwrap()
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Pull a title and preview image out of raw page markup.
///
/// Title: `og:title` (either attribute order), then the trimmed `<title>`
/// text, then nothing. Image: `og:image` (either order) or nothing. This is a
/// tolerant pattern match, not a markup parser; a missing match is the only
/// failure mode.
pub fn parse_metadata(html: &str) -> ParsedMetadata {
    let title = first_capture(html, &[&*OG_TITLE_PROPERTY_FIRST_RE, &*OG_TITLE_CONTENT_FIRST_RE])
        .or_else(|| {
            TITLE_TAG_RE
                .captures(html)
                .map(|cap| cap[1].trim().to_string())
                .filter(|t| !t.is_empty())
        })
        .map(|t| decode_html_entities(&t));

    let image = first_capture(html, &[&*OG_IMAGE_PROPERTY_FIRST_RE, &*OG_IMAGE_CONTENT_FIRST_RE]);

    ParsedMetadata { title, image }
}

/// Decode `&amp; &lt; &gt; &quot; &#39; &nbsp;` in a single left-to-right
/// pass. Replacement text is never rescanned, so `&amp;lt;` becomes `&lt;`.
/// Any other entity is left as-is.
pub fn decode_html_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |cap: &regex::Captures| match &cap[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            "#39" => "'",
            _ => " ",
        })
        .into_owned()
}

fn first_capture(html: &str, patterns: &[&Regex]) -> Option<String> {
    patterns
        .iter()
        .find_map(|re| re.captures(html).map(|cap| cap[1].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn og_tags_property_first() {
        let html = r#"<html><head>
            <meta property="og:title" content="Example Page">
            <meta property="og:image" content="https://example.com/img.png">
        </head></html>"#;
        let meta = parse_metadata(html);
        assert_eq!(meta.title.as_deref(), Some("Example Page"));
        assert_eq!(meta.image.as_deref(), Some("https://example.com/img.png"));
    }

    #[test]
    fn og_tags_content_first_and_single_quotes() {
        let html = r#"<meta content='Trevi Fountain' property='og:title' />
            <META CONTENT="https://img.example/trevi.jpg" PROPERTY="og:image">"#;
        let meta = parse_metadata(html);
        assert_eq!(meta.title.as_deref(), Some("Trevi Fountain"));
        assert_eq!(meta.image.as_deref(), Some("https://img.example/trevi.jpg"));
    }

    #[test]
    fn og_title_wins_over_title_tag() {
        let html = r#"<title>Page Title</title><meta property="og:title" content="OG Title">"#;
        assert_eq!(parse_metadata(html).title.as_deref(), Some("OG Title"));
    }

    #[test]
    fn falls_back_to_trimmed_title_tag() {
        let html = "<html><head><title lang=\"en\">\n  Cool Page &amp; More \n</title></head></html>";
        let meta = parse_metadata(html);
        assert_eq!(meta.title.as_deref(), Some("Cool Page & More"));
        assert!(meta.image.is_none());
    }

    #[test]
    fn blank_title_tag_is_no_title() {
        assert!(parse_metadata("<title>   </title>").title.is_none());
    }

    #[test]
    fn og_image_has_no_further_fallback() {
        let html = r#"<meta name="twitter:image" content="https://x.example/a.png"><img src="b.png">"#;
        assert!(parse_metadata(html).image.is_none());
    }

    #[test]
    fn empty_content_attribute_does_not_match() {
        let html = r#"<meta property="og:title" content=""><title>Real</title>"#;
        assert_eq!(parse_metadata(html).title.as_deref(), Some("Real"));
    }

    #[test]
    fn no_tags_yields_nothing() {
        let meta = parse_metadata("<html><body>plain</body></html>");
        assert_eq!(meta, ParsedMetadata::default());
    }

    #[test]
    fn malformed_markup_does_not_panic() {
        for html in ["", "<", "<meta", "<title>", "<meta property=\"og:title\" content=\"", "\u{0}\u{fffd}<<>>"] {
            let _ = parse_metadata(html);
        }
    }

    #[test]
    fn og_title_entities_are_decoded() {
        let html = r#"<meta property="og:title" content="Tom &amp; Jerry&#39;s &lt;Bar&gt;">"#;
        assert_eq!(parse_metadata(html).title.as_deref(), Some("Tom & Jerry's <Bar>"));
    }

    #[test]
    fn decodes_the_fixed_entity_set() {
        assert_eq!(
            decode_html_entities("&amp;&lt;&gt;&quot;&#39;&nbsp;"),
            "&<>\"' "
        );
    }

    #[test]
    fn decoding_is_single_pass() {
        assert_eq!(decode_html_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_html_entities("&amp;amp;"), "&amp;");
    }

    #[test]
    fn unknown_entities_are_kept() {
        assert_eq!(decode_html_entities("caf&eacute; &#169;"), "caf&eacute; &#169;");
    }
}
