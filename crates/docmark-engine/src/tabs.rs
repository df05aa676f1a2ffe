//! Flattening and lookup over a document's nested tabs.

use serde::Serialize;

use crate::error::DocsError;
use crate::model::{Body, Document, Tab};

/// One entry of the flattened tab tree.
///
/// `tab` is `None` only for the synthetic entry that stands in for a document
/// without tabs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabNode<'a> {
    pub tab: Option<&'a Tab>,
    pub id: Option<&'a str>,
    pub title: Option<&'a str>,
    pub depth: usize,
    pub parent_id: Option<&'a str>,
}

impl<'a> TabNode<'a> {
    pub fn body(&self) -> Option<&'a Body> {
        self.tab.and_then(Tab::body)
    }

    pub fn to_metadata(&self) -> TabMetadata {
        TabMetadata {
            tab_id: self.id.map(str::to_string),
            title: self.title.map(str::to_string),
            depth: self.depth,
            parent_id: self.parent_id.map(str::to_string),
        }
    }
}

/// Owned listing entry for a tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabMetadata {
    pub tab_id: Option<String>,
    pub title: Option<String>,
    pub depth: usize,
    pub parent_id: Option<String>,
}

/// The tab a request addresses, or the whole document when `tab` is `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTarget<'a> {
    pub tab: Option<TabNode<'a>>,
    pub effective_tab_id: Option<&'a str>,
}

impl<'a> ResolvedTarget<'a> {
    /// Content of the resolved tab, falling back to the document body.
    pub fn body(&self, doc: &'a Document) -> Option<&'a Body> {
        match self.tab {
            Some(node) => node.body(),
            None => doc.body.as_ref(),
        }
    }

    pub fn effective_tab_id(&self) -> Option<String> {
        self.effective_tab_id.map(str::to_string)
    }
}

/// Pre-order walk of `tabs`: each tab, then its children one level deeper.
pub fn flatten_tabs(tabs: &[Tab]) -> Vec<TabNode<'_>> {
    let mut out = Vec::new();
    walk(tabs, 0, None, &mut out);
    out
}

fn walk<'a>(
    tabs: &'a [Tab],
    depth: usize,
    parent_id: Option<&'a str>,
    out: &mut Vec<TabNode<'a>>,
) {
    for tab in tabs {
        out.push(TabNode {
            tab: Some(tab),
            id: tab.id(),
            title: tab.title(),
            depth,
            parent_id,
        });
        walk(&tab.child_tabs, depth + 1, tab.id(), out);
    }
}

/// Flattened tabs of `doc`; a tabless document yields a single synthetic
/// root entry titled after the document.
pub fn flatten(doc: &Document) -> Vec<TabNode<'_>> {
    let nodes = flatten_tabs(&doc.tabs);
    if !nodes.is_empty() {
        return nodes;
    }
    vec![TabNode {
        tab: None,
        id: None,
        title: doc.title.as_deref(),
        depth: 0,
        parent_id: None,
    }]
}

/// Finds the tab `requested` names, or the first tab when none is named.
/// An empty id names no tab.
pub fn resolve<'a>(
    doc: &'a Document,
    requested: Option<&str>,
) -> Result<ResolvedTarget<'a>, DocsError> {
    let nodes = flatten_tabs(&doc.tabs);
    if let Some(requested) = requested.filter(|id| !id.is_empty()) {
        return nodes
            .into_iter()
            .find(|node| node.id == Some(requested))
            .map(|node| ResolvedTarget {
                tab: Some(node),
                effective_tab_id: node.id,
            })
            .ok_or_else(|| DocsError::tab_not_found(requested));
    }
    Ok(match nodes.first() {
        Some(first) => ResolvedTarget {
            tab: Some(*first),
            effective_tab_id: first.id,
        },
        None => ResolvedTarget {
            tab: None,
            effective_tab_id: None,
        },
    })
}

/// Listing of every tab in traversal order.
pub fn list_tabs(doc: &Document) -> Vec<TabMetadata> {
    flatten(doc).iter().map(TabNode::to_metadata).collect()
}
