//! Recursive serializer from a pruned DOM subtree to the restricted output
//! vocabulary. Read-only over the tree; all document mutation happens in the
//! pruning passes before this runs.

use ego_tree::NodeRef;
use scraper::Node;
use url::Url;

use crate::normalize::normalize_text;

/// Tags emitted unchanged around their simplified children.
const PASSTHROUGH_TAGS: &[&str] = &[
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "p",
    "blockquote",
    "ul",
    "ol",
    "li",
];

/// Tags skipped outright, children included.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "img"];

/// Serialize the children of `node` into the restricted vocabulary, with
/// anchors resolved against `base_url` and routed back through the proxy.
/// Unrecognized elements are transparent: their wrapper is dropped but their
/// children still render, so text and links survive inside layout wrappers.
pub fn simplify(node: NodeRef<'_, Node>, base_url: &Url) -> String {
    let mut output = String::new();
    for child in node.children() {
        match child.value() {
            Node::Text(text) => output.push_str(&normalize_text(text)),
            Node::Element(element) => {
                let name = element.name();
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }
                match name {
                    "a" => match proxied_href(element.attr("href"), base_url) {
                        Some(href) => {
                            output.push_str(&format!("<a href=\"{href}\">"));
                            output.push_str(&simplify(child, base_url));
                            output.push_str("</a>");
                        }
                        // Unresolvable links degrade to their text content
                        // rather than an href no client can follow.
                        None => output.push_str(&simplify(child, base_url)),
                    },
                    "strong" => wrap(&mut output, "b", child, base_url),
                    "em" => wrap(&mut output, "i", child, base_url),
                    "br" => output.push_str("<br>"),
                    other if PASSTHROUGH_TAGS.contains(&other) => {
                        wrap(&mut output, other, child, base_url);
                    }
                    _ => output.push_str(&simplify(child, base_url)),
                }
            }
            _ => {}
        }
    }
    output
}

fn proxied_href(href: Option<&str>, base_url: &Url) -> Option<String> {
    let absolute = base_url.join(href?).ok()?;
    Some(format!("/read?a={absolute}"))
}

fn wrap(output: &mut String, tag: &str, node: NodeRef<'_, Node>, base_url: &Url) {
    output.push_str(&format!("<{tag}>"));
    output.push_str(&simplify(node, base_url));
    output.push_str(&format!("</{tag}>"));
}

#[cfg(test)]
mod tests {
    use super::simplify;
    use scraper::{Html, Selector};
    use url::Url;

    fn simplified(html: &str, base: &str) -> String {
        let doc = Html::parse_document(html);
        let body = Selector::parse("body").expect("selector");
        let root = doc.select(&body).next().expect("body element");
        let base = Url::parse(base).expect("base url");
        simplify(*root, &base)
    }

    const WIKI_BASE: &str = "https://en.m.wikipedia.org/wiki/Cat";

    #[test]
    fn relative_links_become_proxy_routed_absolute_links() {
        let output = simplified("<body><a href=\"/wiki/Dog\">Dog</a></body>", WIKI_BASE);
        assert_eq!(
            output,
            "<a href=\"/read?a=https://en.m.wikipedia.org/wiki/Dog\">Dog</a>"
        );
    }

    #[test]
    fn absolute_links_are_still_proxy_routed() {
        let output = simplified(
            "<body><a href=\"https://example.com/page\">Out</a></body>",
            WIKI_BASE,
        );
        assert_eq!(output, "<a href=\"/read?a=https://example.com/page\">Out</a>");
    }

    #[test]
    fn anchor_without_href_unwraps_to_its_content() {
        let output = simplified("<body><a name=\"top\">Top</a></body>", WIKI_BASE);
        assert_eq!(output, "Top");
    }

    #[test]
    fn unresolvable_href_unwraps_to_its_content() {
        let output = simplified("<body><a href=\"http://[broken\">Text</a></body>", WIKI_BASE);
        assert_eq!(output, "Text");
    }

    #[test]
    fn strong_and_em_are_retagged() {
        let output = simplified(
            "<body><strong>bold</strong> and <em>italic</em></body>",
            WIKI_BASE,
        );
        assert_eq!(output, "<b>bold</b> and <i>italic</i>");
    }

    #[test]
    fn unknown_wrappers_are_transparent() {
        let output = simplified(
            "<body><div class=\"unknown-wrapper\"><p>Hello</p></div></body>",
            WIKI_BASE,
        );
        assert_eq!(output, "<p>Hello</p>");
    }

    #[test]
    fn scripts_styles_and_images_vanish_entirely() {
        let output = simplified(
            "<body><script>alert(1)</script><style>p{}</style><noscript>basic</noscript><img src=\"x\" alt=\"a cat\"><p>Text</p></body>",
            WIKI_BASE,
        );
        assert_eq!(output, "<p>Text</p>");
    }

    #[test]
    fn headings_lists_and_blockquotes_pass_through() {
        let output = simplified(
            "<body><h2>Title</h2><blockquote>q</blockquote><ul><li>one</li><li>two</li></ul></body>",
            WIKI_BASE,
        );
        assert_eq!(
            output,
            "<h2>Title</h2><blockquote>q</blockquote><ul><li>one</li><li>two</li></ul>"
        );
    }

    #[test]
    fn line_breaks_are_emitted_void() {
        let output = simplified("<body><p>a<br>b</p></body>", WIKI_BASE);
        assert_eq!(output, "<p>a<br>b</p>");
    }

    #[test]
    fn text_is_normalized_on_the_way_out() {
        let output = simplified("<body><p>It\u{2019}s 1914\u{2013}1918</p></body>", WIKI_BASE);
        assert_eq!(output, "<p>It's 1914-1918</p>");
    }

    #[test]
    fn nested_links_inside_wrappers_survive() {
        let output = simplified(
            "<body><div><span><a href=\"/wiki/Ant\">Ant</a></span></div></body>",
            WIKI_BASE,
        );
        assert_eq!(
            output,
            "<a href=\"/read?a=https://en.m.wikipedia.org/wiki/Ant\">Ant</a>"
        );
    }

    #[test]
    fn serialization_is_deterministic() {
        let doc = Html::parse_document(
            "<body><h2>T</h2><p>body <a href=\"/x\">link</a></p></body>",
        );
        let body = Selector::parse("body").expect("selector");
        let root = doc.select(&body).next().expect("body element");
        let base = Url::parse(WIKI_BASE).expect("base url");
        assert_eq!(simplify(*root, &base), simplify(*root, &base));
    }
}
