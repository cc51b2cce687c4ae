//! Heading-driven section removal. Wiki articles close every section with
//! the next heading of equal or higher rank, so deleting a heading plus its
//! following sibling run up to that boundary removes the whole section.

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

use crate::prune::detach_all;

/// Delete every section whose h2/h3 heading text matches one of `titles`
/// (trimmed, case-insensitive). A level-2 run stops at the next h1 or h2; a
/// level-3 run also stops at the next h3. Lower headings (h4-h6) never close
/// a run. Duplicate matching titles each trigger their own run.
pub fn prune_sections(doc: &mut Html, titles: &[&str]) {
    let Ok(headings) = Selector::parse("h2, h3") else {
        return;
    };
    let mut doomed: Vec<NodeId> = Vec::new();
    for heading in doc.select(&headings) {
        let text = heading.text().collect::<String>();
        let text = text.trim();
        if !titles.iter().any(|title| title.eq_ignore_ascii_case(text)) {
            continue;
        }
        let rank = match heading.value().name() {
            "h3" => 3,
            _ => 2,
        };
        doomed.push(heading.id());
        let mut sibling = heading.next_sibling();
        while let Some(node) = sibling {
            if let Some(element) = ElementRef::wrap(node)
                && closes_section(element.value().name(), rank)
            {
                break;
            }
            doomed.push(node.id());
            sibling = node.next_sibling();
        }
    }
    detach_all(doc, doomed);
}

fn closes_section(name: &str, rank: u8) -> bool {
    heading_rank(name).is_some_and(|level| level <= rank)
}

fn heading_rank(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}
