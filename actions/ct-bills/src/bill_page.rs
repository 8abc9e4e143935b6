//! Per-bill status pages: introducer fallback, fiscal documents and votes.

use crate::config::ScrapeConfig;
use crate::error::{Error, Result};
use crate::html;
use crate::transport::Transport;
use crate::types::{Bill, Document};
use crate::votes;
use scraper::Html;
use url::Url;

const INTRODUCED_BY: &str = "Introduced by:";

/// A link to a roll-call tally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteLink {
    pub motion: String,
    pub url: String,
}

/// Everything read from one bill status page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillPage {
    pub introducer: Option<String>,
    pub documents: Vec<Document>,
    pub vote_links: Vec<VoteLink>,
}

/// Parse a bill status page.
///
/// The introducer is only read when `want_introducer` is set. It is the second
/// cell mentioning "Introduced by:"; the first is the enclosing layout cell.
pub fn parse_bill_page(page: &str, url: &str, want_introducer: bool) -> Result<BillPage> {
    let base = Url::parse(url)?;
    let document = Html::parse_document(page);
    let mut parsed = BillPage::default();

    if want_introducer {
        let cell = html::select(&document, "td")?
            .into_iter()
            .map(html::text)
            .filter(|text| text.contains(INTRODUCED_BY))
            .nth(1)
            .ok_or(Error::MissingElement {
                what: "introducer cell",
                url: url.to_string(),
            })?;
        parsed.introducer = Some(cell.replace(INTRODUCED_BY, "").trim().to_string());
    }

    for needle in ["/FN/", "/BA/"] {
        for (name, href) in html::links_containing(&document, Some(&base), needle)? {
            parsed.documents.push(Document {
                name: name.trim().to_string(),
                url: href,
            });
        }
    }

    for (motion, href) in html::links_containing(&document, Some(&base), "VOTE")? {
        let motion = motion.trim();
        // some tallies (2011 HJ 31) are linked with no text
        if motion.is_empty() {
            tracing::debug!(url = %href, "skipping vote link without text");
            continue;
        }
        parsed.vote_links.push(VoteLink {
            motion: motion.to_string(),
            url: href,
        });
    }

    Ok(parsed)
}

/// Fetch a bill's status page and fold its contents into `bill`.
///
/// `has_introducers` tells whether the member bill lists already name an
/// introducer; only when they do not is the page's introducer attached.
pub async fn scrape_bill_page(
    transport: &dyn Transport,
    config: &ScrapeConfig,
    bill: &mut Bill,
    has_introducers: bool,
) -> Result<()> {
    let url = config.bill_page_url(&bill.bill_id);
    let body = transport.fetch(&url).await?;
    bill.add_source(url.as_str());

    let want_introducer = bill.sponsors.is_empty() && !has_introducers;
    let page = parse_bill_page(&body, &url, want_introducer)?;

    if let Some(introducer) = page.introducer {
        bill.add_sponsor("introducer", introducer, None);
    }
    for document in page.documents {
        bill.add_document(document.name, document.url);
    }

    for link in page.vote_links {
        let tally = transport.fetch(&link.url).await?;
        if let Some(vote) = votes::parse_vote(&tally, &link.url, &link.motion, &bill.session)? {
            bill.add_vote(vote);
        }
    }

    Ok(())
}
