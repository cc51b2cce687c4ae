//! Static removal rule sets. A generic set applies to every fetched page;
//! the extended set applies only to Wikipedia hosts, where the markup is
//! predictable enough to strip chrome and whole trailing sections.

/// A single removal applied to a parsed document before serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalRule {
    /// CSS-style pattern; every matching element is deleted with its subtree.
    Selector(&'static str),
    /// Heading title; the heading and its following sibling run are deleted.
    Section(&'static str),
}

/// Rules applied to every page regardless of origin.
pub const GENERIC_RULES: &[RemovalRule] = &[
    RemovalRule::Selector("script"),
    RemovalRule::Selector("style"),
    RemovalRule::Selector("noscript"),
    RemovalRule::Selector("iframe"),
    RemovalRule::Selector("object"),
    RemovalRule::Selector("embed"),
    RemovalRule::Selector("video"),
    RemovalRule::Selector("audio"),
    RemovalRule::Selector("canvas"),
    RemovalRule::Selector("svg"),
    RemovalRule::Selector(".advertisement"),
    RemovalRule::Selector(".ads"),
    RemovalRule::Selector("#cookie-notice"),
    RemovalRule::Selector(".cookie-banner"),
];

/// Rules applied on top of [`GENERIC_RULES`] when the source is Wikipedia.
pub const WIKI_RULES: &[RemovalRule] = &[
    // Navigation and UI chrome
    RemovalRule::Selector("#mw-navigation"),
    RemovalRule::Selector("#mw-panel"),
    RemovalRule::Selector(".mw-editsection"),
    RemovalRule::Selector(".mw-jump-link"),
    RemovalRule::Selector(".mw-portlet"),
    RemovalRule::Selector(".sidebar"),
    RemovalRule::Selector("div[role=\"navigation\"]"),
    RemovalRule::Selector(".page-actions-menu"),
    RemovalRule::Selector(".header-action"),
    RemovalRule::Selector(".page-actions"),
    RemovalRule::Selector(".talk"),
    RemovalRule::Selector(".language-selector"),
    RemovalRule::Selector(".vector-page-toolbar"),
    RemovalRule::Selector("#p-views"),
    RemovalRule::Selector("#p-namespaces"),
    // Mobile skin chrome
    RemovalRule::Selector(".header"),
    RemovalRule::Selector(".header-chrome"),
    RemovalRule::Selector(".minerva__tab-container"),
    RemovalRule::Selector(".page-actions-menu__list"),
    // Content furniture a small screen cannot use
    RemovalRule::Selector(".infobox"),
    RemovalRule::Selector(".navbox"),
    RemovalRule::Selector(".vertical-navbox"),
    RemovalRule::Selector(".wikitable"),
    RemovalRule::Selector(".thumb"),
    RemovalRule::Selector(".toc"),
    RemovalRule::Selector("#toc"),
    RemovalRule::Selector(".reflist"),
    RemovalRule::Selector(".references"),
    RemovalRule::Selector("sup.reference"),
    RemovalRule::Selector(".hatnote"),
    RemovalRule::Selector(".ambox"),
    // Interlanguage widgets
    RemovalRule::Selector("#p-lang"),
    RemovalRule::Selector(".interlanguage-link"),
    RemovalRule::Selector(".languages"),
    // Trailing sections that are all links and footnotes
    RemovalRule::Section("Notes"),
    RemovalRule::Section("References"),
    RemovalRule::Section("External links"),
    RemovalRule::Section("Further reading"),
    RemovalRule::Section("See also"),
    RemovalRule::Section("Languages"),
    RemovalRule::Section("Bibliography"),
    RemovalRule::Section("Sources"),
];

/// The selector patterns of a rule set, in declaration order.
pub fn selector_patterns(rules: &'static [RemovalRule]) -> impl Iterator<Item = &'static str> {
    rules.iter().filter_map(|rule| match rule {
        RemovalRule::Selector(pattern) => Some(*pattern),
        RemovalRule::Section(_) => None,
    })
}

/// The section titles of a rule set, in declaration order.
pub fn section_titles(rules: &'static [RemovalRule]) -> impl Iterator<Item = &'static str> {
    rules.iter().filter_map(|rule| match rule {
        RemovalRule::Section(title) => Some(*title),
        RemovalRule::Selector(_) => None,
    })
}

/// True for `wikipedia.org` and any of its subdomains.
pub fn is_wiki_host(host: &str) -> bool {
    host == "wikipedia.org" || host.ends_with(".wikipedia.org")
}
