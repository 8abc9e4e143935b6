//! Bill introducers from the per-member bill lists.

use crate::config::ScrapeConfig;
use crate::error::{Error, Result};
use crate::html;
use crate::transport::Transport;
use crate::types::Chamber;
use regex::Regex;
use scraper::Html;
use std::collections::{BTreeSet, HashMap};
use url::Url;

/// Bill identifier to the set of members who introduced it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntroducerIndex {
    introducers: HashMap<String, BTreeSet<String>>,
}

impl IntroducerIndex {
    pub fn add(&mut self, bill_id: &str, name: &str) {
        self.introducers
            .entry(bill_id.to_string())
            .or_default()
            .insert(name.to_string());
    }

    /// Introducers of a bill, sorted by name
    pub fn get(&self, bill_id: &str) -> impl Iterator<Item = &str> {
        self.introducers
            .get(bill_id)
            .into_iter()
            .flat_map(|names| names.iter().map(String::as_str))
    }

    pub fn has(&self, bill_id: &str) -> bool {
        self.introducers
            .get(bill_id)
            .is_some_and(|names| !names.is_empty())
    }

    /// Number of bills with at least one introducer
    pub fn len(&self) -> usize {
        self.introducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.introducers.is_empty()
    }
}

/// A member and the URL of their bill list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberLink {
    pub name: String,
    pub url: String,
}

/// Extract members from a chamber's member list.
///
/// The member's name sits in the first cell of the link's row as
/// `<district> - <name>`; a cell in any other shape is an error.
pub fn parse_member_list(page: &str, url: &str) -> Result<Vec<MemberLink>> {
    let base = Url::parse(url)?;
    let name_pattern = Regex::new(r"^[SH]?\d+\s+-\s+(.*)$")?;
    let document = Html::parse_document(page);

    let mut members = Vec::new();
    for link in html::select(&document, "a[href*='MemberBills']")? {
        let row = html::ancestor(link, 2).ok_or(Error::MissingElement {
            what: "member row",
            url: url.to_string(),
        })?;
        let cell = html::row_cells(row).into_iter().next().unwrap_or_default();

        let name = name_pattern
            .captures(&cell)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .ok_or_else(|| Error::malformed("member name", cell.clone()))?;

        let href = link.value().attr("href").unwrap_or_default();
        members.push(MemberLink {
            name,
            url: html::absolutize(&base, href),
        });
    }
    Ok(members)
}

/// Bill identifiers linked from one member's bill list
pub fn parse_member_bills(page: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(page);
    Ok(html::links_containing(&document, None, "billstatus")?
        .into_iter()
        .map(|(text, _)| text.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect())
}

/// Build the introducer index from the member lists of `chambers`
pub async fn scrape_introducers(
    transport: &dyn Transport,
    config: &ScrapeConfig,
    chambers: &[Chamber],
) -> Result<IntroducerIndex> {
    let mut index = IntroducerIndex::default();

    for &chamber in chambers {
        let url = config.member_list_url(chamber);
        let body = transport.fetch(&url).await?;
        let members = parse_member_list(&body, &url)?;
        tracing::debug!(%chamber, members = members.len(), "member list");

        for member in members {
            let page = transport.fetch(&member.url).await?;
            for bill_id in parse_member_bills(&page)? {
                index.add(&bill_id, &member.name);
            }
        }
    }

    tracing::info!(bills = index.len(), "built introducer index");
    Ok(index)
}
