//! Utility functions and helpers.

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

/// Which anchors of a directory listing to keep.
///
/// `href` selects the anchors. `name` must match the whole extracted entry,
/// which becomes a local path component.
#[derive(Debug)]
pub struct LinkPattern {
    href: Regex,
    name: Regex,
}

impl LinkPattern {
    fn new(href: &str, name: &str) -> Self {
        Self {
            href: Regex::new(href).expect("valid href pattern"),
            name: Regex::new(name).expect("valid entry name pattern"),
        }
    }
}

/// Game directory links on a date index, e.g. `gid_2012_06_10_nynmlb_nyamlb_1/`.
pub static GAME_LINK: LazyLock<LinkPattern> =
    LazyLock::new(|| LinkPattern::new(r"gid_[0-9A-Za-z_]+/", r"^gid_[0-9A-Za-z_]+$"));

/// Participant file links on a batters/pitchers index, e.g. `121250.xml`.
pub static PARTICIPANT_LINK: LazyLock<LinkPattern> =
    LazyLock::new(|| LinkPattern::new(r"[0-9]+\.xml", r"^[0-9]+\.xml$"));

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

static XML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment pattern"));

static START_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z_][\w:.\-]*)([^>]*)>").expect("valid start tag pattern")
});

/// Join a path segment onto a URL without doubling slashes.
pub fn join_url(base: &str, segment: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        segment.trim_start_matches('/')
    )
}

/// Return the text of every anchor whose `href` matches `pattern`.
///
/// Surrounding whitespace and slashes are stripped, so a listing entry
/// `gid_x/` yields `gid_x`. Entries not matching the pattern's name are
/// dropped. Document order is preserved.
pub fn extract_links(html: &str, pattern: &LinkPattern) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR)
        .filter(|a| a.value().attr("href").is_some_and(|href| pattern.href.is_match(href)))
        .map(|a| {
            a.text()
                .collect::<String>()
                .trim_matches(|c: char| c.is_whitespace() || c == '/')
                .to_string()
        })
        .filter(|text| {
            let keep = pattern.name.is_match(text);
            if !keep && !text.is_empty() {
                log::debug!("Ignoring listing entry {:?}", text);
            }
            keep
        })
        .collect()
}

/// Root element of an XML document: its name and raw attribute text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootElement {
    pub name: String,
    attributes: String,
}

impl RootElement {
    /// Value of the named attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<String> {
        let pattern = format!(
            r#"(?:^|\s){}\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
            regex::escape(name)
        );
        let re = Regex::new(&pattern).ok()?;
        let caps = re.captures(&self.attributes)?;
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    }
}

/// Locate the root element, skipping the XML declaration, doctype and comments.
pub fn root_element(xml: &str) -> Option<RootElement> {
    let stripped: Cow<'_, str> = XML_COMMENT.replace_all(xml, "");
    let caps = START_TAG.captures(&stripped)?;
    let attributes = caps.get(2).map_or("", |m| m.as_str());
    Some(RootElement {
        name: caps[1].to_string(),
        attributes: attributes.trim_end_matches('/').to_string(),
    })
}
