use lazy_regex::regex;
use reqwest::Url;
use scraper::{ElementRef, Node};

/// Absolute form of `href` as seen from `base`, the raw value when it does
/// not parse.
pub(crate) fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href.trim())
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

pub(crate) fn text_content(el: ElementRef) -> String {
    el.text().collect()
}

const LINE_BREAK: char = '\u{1}';
const BLOCK_BREAK: char = '\u{2}';

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "footer", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "li", "ol", "p", "section", "table", "tr", "ul",
];

fn push_rendered(el: ElementRef, out: &mut String) {
    let name = el.value().name();
    if name == "br" {
        out.push(LINE_BREAK);
        return;
    }

    let block = BLOCK_ELEMENTS.contains(&name);
    if block {
        out.push(BLOCK_BREAK);
    }
    for child in el.children() {
        match child.value() {
            Node::Text(t) => out.push_str(t),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    push_rendered(child, out);
                }
            }
            _ => {}
        }
    }
    if block {
        out.push(BLOCK_BREAK);
    }
}

/// Rendered text of `el`: whitespace runs collapse to one space, `<br>`
/// becomes a line break and each block boundary yields a single line break.
/// Breaks at the very start or end are dropped.
pub(crate) fn inner_text(el: ElementRef) -> String {
    let mut raw = String::new();
    push_rendered(el, &mut raw);

    let text = regex!(r"[ \t\r\n\f]+").replace_all(&raw, " ");
    let text = regex!(r"[ \x02]*\x02[ \x02]*").replace_all(&text, "\x02");
    let text = text
        .trim_matches(BLOCK_BREAK)
        .replace([LINE_BREAK, BLOCK_BREAK], "\n");
    regex!(r" *\n *").replace_all(&text, "\n").into_owned()
}

/// Replaces only the first line break with a single space.
pub(crate) fn collapse_first_line_break(s: &str) -> String {
    regex!(r"\r?\n").replacen(s, 1, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scraper::{Html, Selector};

    fn first_address(html: &str) -> String {
        let doc = Html::parse_fragment(html);
        let sel = Selector::parse("address").unwrap();
        inner_text(doc.select(&sel).next().unwrap())
    }

    #[test]
    fn test_inner_text_breaks() {
        assert_eq!(
            first_address("<address>\n   1 Elm St <br/>\n  Suite 4<br>Town,   ST\n</address>"),
            "1 Elm St\nSuite 4\nTown, ST"
        );
    }

    #[test]
    fn test_inner_text_nested() {
        assert_eq!(
            first_address("<address><span>1 Elm St</span><br><span>Town</span></address>"),
            "1 Elm St\nTown"
        );
    }

    #[test]
    fn test_inner_text_block_children() {
        let text =
            first_address("<address><div>123 Main St</div><div>Springfield, IL</div></address>");
        assert_eq!(text, "123 Main St\nSpringfield, IL");
        assert_eq!(collapse_first_line_break(&text), "123 Main St Springfield, IL");

        assert_eq!(
            first_address("<address><p> 1 A St </p>\n <p>Suite 2</p><p>Town</p></address>"),
            "1 A St\nSuite 2\nTown"
        );
    }

    #[test]
    fn test_inner_text_whitespace_across_tags() {
        assert_eq!(
            first_address("<address>123 Main St <span> Springfield</span></address>"),
            "123 Main St Springfield"
        );
    }

    #[test]
    fn test_collapse_first_line_break() {
        assert_eq!(collapse_first_line_break("a\nb\nc"), "a b\nc");
        assert_eq!(collapse_first_line_break("a\r\nb"), "a b");
        assert_eq!(collapse_first_line_break("a b"), "a b");
    }

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://northwesternmutual.com/financial/advisors/wi").unwrap();
        assert_eq!(
            resolve_url(&base, "/financial/advisor/jane-doe/"),
            "https://northwesternmutual.com/financial/advisor/jane-doe/"
        );
        assert_eq!(
            resolve_url(&base, "https://example.com/jane"),
            "https://example.com/jane"
        );
        assert_eq!(
            resolve_url(&base, "#"),
            "https://northwesternmutual.com/financial/advisors/wi#"
        );
    }
}
