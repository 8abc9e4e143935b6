//! Subject tags from the alphabetic subject search pages.

use crate::config::{ScrapeConfig, SubjectLinkSource};
use crate::error::Result;
use crate::html;
use crate::transport::Transport;
use scraper::Html;
use std::collections::HashMap;
use url::Url;

/// Bill identifier to subject tags, in encounter order (duplicates kept)
#[derive(Debug, Clone, Default)]
pub struct SubjectIndex {
    subjects: HashMap<String, Vec<String>>,
}

impl SubjectIndex {
    pub fn add(&mut self, bill_id: &str, subject: &str) {
        self.subjects
            .entry(bill_id.to_string())
            .or_default()
            .push(subject.to_string());
    }

    pub fn get(&self, bill_id: &str) -> &[String] {
        self.subjects.get(bill_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of bills carrying at least one subject
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

/// What one letter's index page links to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectIndexPage {
    /// (subject name, absolute URL of the subject's bill list)
    pub subjects: Vec<(String, String)>,
    /// Bill identifiers linked from the index page itself
    pub bill_ids: Vec<String>,
}

pub fn parse_subject_index(page: &str, url: &str) -> Result<SubjectIndexPage> {
    let base = Url::parse(url)?;
    let document = Html::parse_document(page);

    let subjects = html::links_containing(&document, Some(&base), "subbills")?
        .into_iter()
        .map(|(name, href)| (name.trim().to_string(), href))
        .filter(|(name, href)| {
            if name.is_empty() {
                tracing::debug!(url = %href, "skipping subject link without text");
            }
            !name.is_empty()
        })
        .collect();

    Ok(SubjectIndexPage {
        subjects,
        bill_ids: bill_links(&document)?,
    })
}

/// Bill identifiers linked from a subject's own bill list page
pub fn parse_subject_page(page: &str) -> Result<Vec<String>> {
    bill_links(&Html::parse_document(page))
}

fn bill_links(document: &Html) -> Result<Vec<String>> {
    Ok(html::links_containing(document, None, "CGABillStatus")?
        .into_iter()
        .map(|(text, _)| text.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect())
}

/// Crawl the A-Z subject index.
///
/// Every subject link is followed. With [`SubjectLinkSource::IndexPage`] the
/// subject is attributed to every bill linked from the letter's index page
/// rather than from the subject page, reproducing the published data.
pub async fn scrape_subjects(
    transport: &dyn Transport,
    config: &ScrapeConfig,
) -> Result<SubjectIndex> {
    let mut index = SubjectIndex::default();

    for letter in 'A'..='Z' {
        let url = config.subject_index_url(letter);
        let body = transport.fetch(&url).await?;
        let page = parse_subject_index(&body, &url)?;

        for (subject, subject_url) in &page.subjects {
            let subject_body = transport.fetch(subject_url).await?;
            let bill_ids = match config.subject_links {
                SubjectLinkSource::IndexPage => page.bill_ids.clone(),
                SubjectLinkSource::SubjectPage => parse_subject_page(&subject_body)?,
            };
            for bill_id in &bill_ids {
                index.add(bill_id, subject);
            }
        }
        tracing::debug!(%letter, subjects = page.subjects.len(), "subject index page");
    }

    tracing::info!(bills = index.len(), "built subject index");
    Ok(index)
}
