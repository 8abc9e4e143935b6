//! Bill records from the `bill_info.csv` dump.

use crate::bill_page;
use crate::config::ScrapeConfig;
use crate::error::{Error, Result};
use crate::feed;
use crate::introducers::IntroducerIndex;
use crate::registry::BillRegistry;
use crate::subjects::SubjectIndex;
use crate::transport::Transport;
use crate::types::{Bill, BillType, Chamber};
use serde::Deserialize;

/// One row of `bill_info.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct BillInfoRow {
    pub bill_num: String,
    pub sess_year: String,
    #[serde(default)]
    pub bill_title: String,
}

/// Build the bill for a feed row.
///
/// Returns `Ok(None)` for bills of chambers not being scraped. A row from
/// another session means the feed has moved on (or not yet reached) the
/// requested session and fails with [`Error::NoDataForPeriod`].
pub fn build_bill(row: &BillInfoRow, config: &ScrapeConfig) -> Result<Option<Bill>> {
    let bill_id = row.bill_num.as_str();
    let chamber = Chamber::from_bill_id(bill_id)
        .ok_or_else(|| Error::malformed("bill identifier", bill_id))?;

    if !config.wants(chamber) {
        return Ok(None);
    }

    if row.sess_year != config.session {
        return Err(Error::NoDataForPeriod {
            requested: config.session.clone(),
            found: row.sess_year.clone(),
        });
    }

    let mut bill = Bill::new(
        config.session.as_str(),
        chamber,
        bill_id,
        row.bill_title.as_str(),
        BillType::from_bill_id(bill_id),
    );
    bill.add_source(config.bill_info_url());
    Ok(Some(bill))
}

/// Attach introducers and subjects from the lookup tables
pub fn apply_lookups(bill: &mut Bill, introducers: &IntroducerIndex, subjects: &SubjectIndex) {
    for name in introducers.get(&bill.bill_id) {
        bill.add_sponsor("primary", name, Some("introducer"));
    }
    bill.subjects = subjects.get(&bill.bill_id).to_vec();
}

/// Create one bill per feed row, each completed from its status page and the
/// lookup tables.
pub async fn scrape_bill_info(
    transport: &dyn Transport,
    config: &ScrapeConfig,
    introducers: &IntroducerIndex,
    subjects: &SubjectIndex,
) -> Result<BillRegistry> {
    let text = transport.fetch(&config.bill_info_url()).await?;
    let rows: Vec<BillInfoRow> = feed::read_rows(&text)?;
    let mut bills = BillRegistry::new();

    for row in &rows {
        let Some(mut bill) = build_bill(row, config)? else {
            continue;
        };

        let has_introducers = introducers.has(&bill.bill_id);
        bill_page::scrape_bill_page(transport, config, &mut bill, has_introducers).await?;
        apply_lookups(&mut bill, introducers, subjects);

        if bills.insert(bill).is_some() {
            tracing::warn!(bill_id = %row.bill_num, "bill listed more than once in bill info feed");
        }
    }

    tracing::info!(bills = bills.len(), "collected bill info");
    Ok(bills)
}
