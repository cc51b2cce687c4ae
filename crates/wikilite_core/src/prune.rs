//! Destructive document passes: selector-based element removal and the
//! catch-all scrub for leftover edit markers. Both collect node ids first
//! and detach afterwards, so no pass ever mutates a tree it is walking.

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

/// Tokens left behind by per-section edit affordances that survive the
/// selector rules on some skins.
const EDIT_MARKERS: &[&str] = &["edit", "[edit]", "Edit"];

/// Remove every element matching any of `patterns`, subtree included.
/// A pattern matching nothing is a no-op, as is one that fails to parse.
pub fn prune(doc: &mut Html, patterns: impl IntoIterator<Item = &'static str>) {
    for pattern in patterns {
        let Ok(selector) = Selector::parse(pattern) else {
            continue;
        };
        let matched: Vec<NodeId> = doc.select(&selector).map(|element| element.id()).collect();
        detach_all(doc, matched);
    }
}

/// Remove any element whose entire trimmed text content is an edit marker,
/// regardless of tag or position.
pub fn scrub_residue(doc: &mut Html) {
    let matched: Vec<NodeId> = doc
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| {
            let text = element.text().collect::<String>();
            EDIT_MARKERS.contains(&text.trim())
        })
        .map(|element| element.id())
        .collect();
    detach_all(doc, matched);
}

/// Detach a batch of nodes. Ids inside an already-detached subtree are
/// unlinked harmlessly, so overlapping batches need no deduplication.
pub(crate) fn detach_all(doc: &mut Html, ids: Vec<NodeId>) {
    for id in ids {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
}
