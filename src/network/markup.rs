//! Page scraping, one implementation per known revision of the site markup.

use select::document::Document;
use select::node::Node;
use select::predicate::{Attr, Class, Name, Predicate};

use crate::network::lists::ListLink;

pub trait DocumentParser: Send + Sync {
    fn name(&self) -> &'static str;

    /// The list id behind the user's watchlist page.
    fn watchlist_id(&self, doc: &Document) -> Option<String>;

    /// Custom list anchors on the user's lists page, in document order.
    fn list_links(&self, doc: &Document) -> Vec<ListLink>;
}

/// `<meta property="pageId">` and `<a class="list-name">`
pub struct ClassicLayout;

impl DocumentParser for ClassicLayout {
    fn name(&self) -> &'static str {
        "classic"
    }

    fn watchlist_id(&self, doc: &Document) -> Option<String> {
        meta_content(doc, "pageId")
    }

    fn list_links(&self, doc: &Document) -> Vec<ListLink> {
        doc.find(Name("a").and(Class("list-name")))
            .filter_map(|node| link(node, |href| href.to_owned()))
            .collect()
    }
}

/// `<meta property="imdb:pageConst">` and summary-item title anchors whose
/// hrefs carry tracking query strings.
pub struct PageConstLayout;

impl DocumentParser for PageConstLayout {
    fn name(&self) -> &'static str {
        "page-const"
    }

    fn watchlist_id(&self, doc: &Document) -> Option<String> {
        meta_content(doc, "imdb:pageConst")
    }

    fn list_links(&self, doc: &Document) -> Vec<ListLink> {
        doc.find(Name("a").and(Class("ipc-metadata-list-summary-item__t")))
            .filter_map(|node| {
                link(node, |href| {
                    href.split(|c| c == '?' || c == '#')
                        .next()
                        .unwrap_or(href)
                        .to_owned()
                })
            })
            .filter(|l| l.href.starts_with("/list/"))
            .collect()
    }
}

fn meta_content(doc: &Document, property: &str) -> Option<String> {
    doc.find(Name("meta").and(Attr("property", property)))
        .filter_map(|node| node.attr("content"))
        .map(|content| content.trim().to_owned())
        .find(|content| !content.is_empty())
}

fn link(node: Node, clean_href: impl Fn(&str) -> String) -> Option<ListLink> {
    let title = node.text();
    match node.attr("href") {
        Some(href) => Some(ListLink {
            href: clean_href(href),
            title,
        }),
        None => {
            tracing::warn!(%title, "skipping list link without href");
            None
        }
    }
}

/// Tries every known layout in order.
pub struct Markup {
    layouts: Vec<Box<dyn DocumentParser>>,
}

impl Default for Markup {
    fn default() -> Self {
        Markup {
            layouts: vec![Box::new(ClassicLayout), Box::new(PageConstLayout)],
        }
    }
}

impl Markup {
    pub fn watchlist_id(&self, html: &str) -> Option<String> {
        let doc = Document::from(html);
        self.layouts.iter().find_map(|layout| {
            let id = layout.watchlist_id(&doc);
            if id.is_some() {
                tracing::debug!(layout = layout.name(), ?id, "found watchlist id");
            }
            id
        })
    }

    pub fn list_links(&self, html: &str) -> Vec<ListLink> {
        let doc = Document::from(html);
        for layout in &self.layouts {
            let links = layout.list_links(&doc);
            if !links.is_empty() {
                tracing::debug!(layout = layout.name(), count = links.len(), "found lists");
                return links;
            }
        }
        Vec::new()
    }
}
