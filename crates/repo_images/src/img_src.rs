//! Locating `<img>` sources in raw HTML text.
//!
//! This is not an HTML parser: a single regular expression scans the text for
//! `<img ... src="...">` or `<img ... src='...'>`, which is all the rewriting
//! functions need.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static IMG_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<img[^>]*src=(?:"([^"]+)"|'([^']+)')[^>]*>"#).unwrap());

/// Quote style of a matched `src` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
}

impl Quote {
    pub fn as_char(self) -> char {
        match self {
            Self::Double => '"',
            Self::Single => '\'',
        }
    }
}

/// One `<img>` tag found by [`img_srcs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImgSrc<'h> {
    /// The whole matched tag, from `<img` to the closing `>`.
    pub tag: &'h str,
    /// The raw value of the `src` attribute, without quotes.
    pub src: &'h str,
    pub quote: Quote,
}

impl<'h> ImgSrc<'h> {
    fn from_captures(caps: Captures<'h>) -> Option<Self> {
        let tag = caps.get(0)?.as_str();
        let (src, quote) = match (caps.get(1), caps.get(2)) {
            (Some(double), _) => (double.as_str(), Quote::Double),
            (None, Some(single)) => (single.as_str(), Quote::Single),
            (None, None) => return None,
        };
        Some(Self { tag, src, quote })
    }

    /// Renders the attribute as it appears in the document, e.g. `src="a.png"`.
    pub fn attr(&self) -> String {
        src_attr(self.src, self.quote)
    }
}

/// Renders `src=<quote><value><quote>`.
pub fn src_attr(value: &str, quote: Quote) -> String {
    let q = quote.as_char();
    format!("src={q}{value}{q}")
}

/// Returns every `<img>` source in `html`, in document order.
///
/// The iterator is lazy and a fresh scan starts on each call.
///
/// # Example
///
/// ```
/// use repo_images::{img_srcs, Quote};
///
/// let html = r#"<p>x</p><img src="a.png"><img src='b.png'>"#;
/// let srcs: Vec<_> = img_srcs(html).map(|m| (m.src, m.quote)).collect();
/// assert_eq!(srcs, vec![("a.png", Quote::Double), ("b.png", Quote::Single)]);
/// ```
pub fn img_srcs(html: &str) -> impl Iterator<Item = ImgSrc<'_>> {
    IMG_SRC.captures_iter(html).filter_map(ImgSrc::from_captures)
}

/// Replaces the first occurrence of `src=<quote><from><quote>` in `html` with the
/// same attribute holding `to`.
///
/// Only the first textual occurrence is touched, so callers walking every match in
/// document order rewrite duplicated sources one at a time.
pub(crate) fn replace_first_src(html: &str, src: &ImgSrc<'_>, to: &str) -> String {
    html.replacen(&src.attr(), &src_attr(to, src.quote), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_quotes() {
        let html = r#"<p>x</p><img src="a.png"><img src='b.png'>"#;
        let matches: Vec<_> = img_srcs(html).collect();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].src, "a.png");
        assert_eq!(matches[0].quote, Quote::Double);
        assert_eq!(matches[0].tag, r#"<img src="a.png">"#);
        assert_eq!(matches[1].src, "b.png");
        assert_eq!(matches[1].quote, Quote::Single);
    }

    #[test]
    fn test_attributes_around_src() {
        let html = r#"<img alt="logo" src="img/logo.svg" width="20" />"#;
        let m = img_srcs(html).next().unwrap();
        assert_eq!(m.src, "img/logo.svg");
        assert_eq!(m.tag, html);
    }

    #[test]
    fn test_no_match() {
        assert_eq!(img_srcs("<p>no images</p>").count(), 0);
        assert_eq!(img_srcs(r#"<image src="a.png">"#).count(), 0);
        assert_eq!(img_srcs(r#"<img alt="unterminated" src=a.png>"#).count(), 0);
    }

    #[test]
    fn test_restartable() {
        let html = r#"<img src="a.png">"#;
        assert_eq!(img_srcs(html).count(), 1);
        assert_eq!(img_srcs(html).count(), 1);
    }

    #[test]
    fn test_replace_first_src_only_once() {
        let html = r#"<img src="a.png"><img src="a.png">"#;
        let m = img_srcs(html).next().unwrap();
        assert_eq!(
            replace_first_src(html, &m, "b.png"),
            r#"<img src="b.png"><img src="a.png">"#
        );
    }

    #[test]
    fn test_replace_keeps_quote_style() {
        let html = r#"<img class='x' src='a.png'>"#;
        let m = img_srcs(html).next().unwrap();
        assert_eq!(
            replace_first_src(html, &m, "/files/a.png"),
            r#"<img class='x' src='/files/a.png'>"#
        );
    }
}
