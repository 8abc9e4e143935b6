//! Small helpers over the `scraper` DOM used by the page parsers.
//!
//! `scraper` documents are not `Send`, so parsers take page text, extract
//! owned data and drop the document before any further fetch is awaited.

use crate::error::{Error, Result};
use scraper::{ElementRef, Html, Selector};
use url::Url;

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Selector(format!("{}: {:?}", css, e)))
}

/// All elements matching `css`, in document order
pub fn select<'a>(document: &'a Html, css: &str) -> Result<Vec<ElementRef<'a>>> {
    let selector = selector(css)?;
    Ok(document.select(&selector).collect())
}

/// Concatenated text of an element and its descendants
pub fn text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text of the element's own leading text node, like lxml's `.text`
pub fn leading_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .next()
        .and_then(|node| node.value().as_text().map(|t| (&**t).to_string()))
        .unwrap_or_default()
}

/// Resolve `href` against the page URL it was found on
pub fn absolutize(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Links whose target contains `needle`, as (link text, absolute URL) pairs
pub fn links_containing(
    document: &Html,
    base: Option<&Url>,
    needle: &str,
) -> Result<Vec<(String, String)>> {
    let mut links = Vec::new();
    for link in select(document, "a[href]")? {
        let href = link.value().attr("href").unwrap_or_default();
        if !href.contains(needle) {
            continue;
        }
        let url = match base {
            Some(base) => absolutize(base, href),
            None => href.to_string(),
        };
        links.push((leading_text(link), url));
    }
    Ok(links)
}

/// Child elements of `element` with the given tag name
pub fn children_named<'a>(element: ElementRef<'a>, name: &str) -> Vec<ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == name)
        .collect()
}

/// Rows belonging directly to `table`, looking through implied row groups
pub fn table_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(children_named(child, "tr")),
            _ => {}
        }
    }
    rows
}

/// Trimmed text of each `td` in a row; index `n` holds XPath's `td[n + 1]`
pub fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    children_named(row, "td")
        .into_iter()
        .map(|cell| text(cell).trim().to_string())
        .collect()
}

/// Nearest ancestor element, `levels` steps up
pub fn ancestor(element: ElementRef<'_>, levels: usize) -> Option<ElementRef<'_>> {
    let mut current = element;
    for _ in 0..levels {
        current = current.parent().and_then(ElementRef::wrap)?;
    }
    Some(current)
}
