//! Orchestrates one transformation run: prune the parsed document with the
//! rule sets for its source host, find the content root, and serialize it.

use anyhow::{Result, bail};
use ego_tree::NodeId;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::normalize::normalize_text;
use crate::prune::{detach_all, prune, scrub_residue};
use crate::rules::{self, GENERIC_RULES, WIKI_RULES};
use crate::sections::prune_sections;
use crate::simplify::simplify;

/// Title used when the document has none.
pub const FALLBACK_TITLE: &str = "Article";

/// Candidate roots for the readable part of the page, most specific first.
const CONTENT_ROOTS: &[&str] = &["main", "article", "#content", ".content", "body"];

/// The pipeline's output: a plain-text title and a body string over the
/// restricted tag vocabulary, ready to drop into the page template.
#[derive(Debug, Clone)]
pub struct TransformedArticle {
    pub title: String,
    pub body: String,
}

/// Run the full pipeline over fetched HTML. The generic rule set always
/// applies; Wikipedia hosts additionally get the extended selectors, the
/// navigation-list heuristic, section pruning, and the residue scrub.
/// Fails only when no content root can be found, which the caller turns
/// into the generic failure page; no partial output is ever returned.
pub fn transform_article(html: &str, article_url: &Url) -> Result<TransformedArticle> {
    let mut doc = Html::parse_document(html);

    prune(&mut doc, rules::selector_patterns(GENERIC_RULES));
    if article_url.host_str().is_some_and(rules::is_wiki_host) {
        debug!(%article_url, "applying extended wiki rules");
        prune(&mut doc, rules::selector_patterns(WIKI_RULES));
        remove_navigation_lists(&mut doc);
        let titles: Vec<&str> = rules::section_titles(WIKI_RULES).collect();
        prune_sections(&mut doc, &titles);
        scrub_residue(&mut doc);
    }

    let title = extract_title(&doc);
    let body = render_content(&doc, article_url)?;
    Ok(TransformedArticle { title, body })
}

fn extract_title(doc: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return FALLBACK_TITLE.to_string();
    };
    doc.select(&selector)
        .next()
        .map(|element| normalize_text(element.text().collect::<String>().trim()))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}

fn render_content(doc: &Html, article_url: &Url) -> Result<String> {
    for pattern in CONTENT_ROOTS {
        let Ok(selector) = Selector::parse(pattern) else {
            continue;
        };
        if let Some(root) = doc.select(&selector).next() {
            return Ok(simplify(*root, article_url));
        }
    }
    bail!("no content element found in {article_url}")
}

/// Tab bars on some wiki skins are plain `ul` lists with no stable class.
/// Any list carrying the Article/Talk tab labels is navigation, not prose.
fn remove_navigation_lists(doc: &mut Html) {
    let Ok(selector) = Selector::parse("ul") else {
        return;
    };
    let matched: Vec<NodeId> = doc
        .select(&selector)
        .filter(|list| {
            let text = list.text().collect::<String>();
            text.contains("Article")
                && text.contains("Talk")
                && (text.contains("Edit") || text.contains("Watch"))
        })
        .map(|list| list.id())
        .collect();
    detach_all(doc, matched);
}
