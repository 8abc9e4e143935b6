use crate::bill_info;
use crate::committees::{self, CommitteeNames};
use crate::config::ScrapeConfig;
use crate::error::Result;
use crate::history;
use crate::introducers::{self, IntroducerIndex};
use crate::registry::BillRegistry;
use crate::subjects::{self, SubjectIndex};
use crate::transport::Transport;
use crate::types::{Bill, Chamber};
use crate::versions;
use async_stream::stream;
use futures::Stream;
use std::sync::Arc;

/// Lookup tables built before any bill is created; read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct SessionLookups {
    pub committees: CommitteeNames,
    pub subjects: SubjectIndex,
    pub introducers: IntroducerIndex,
}

/// Runs a full scrape of one session
pub struct SessionProcessor {
    config: ScrapeConfig,
    transport: Arc<dyn Transport>,
}

impl SessionProcessor {
    /// Create a new processor with the given configuration
    pub fn new(config: ScrapeConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Build the committee, subject and introducer tables
    pub async fn build_lookups(&self) -> Result<SessionLookups> {
        let transport = self.transport.as_ref();

        let committees = committees::scrape_committee_names(transport, &self.config).await?;
        let subjects = subjects::scrape_subjects(transport, &self.config).await?;
        let introducers = introducers::scrape_introducers(
            transport,
            &self.config,
            &[Chamber::Upper, Chamber::Lower],
        )
        .await?;

        Ok(SessionLookups {
            committees,
            subjects,
            introducers,
        })
    }

    /// Scrape every source and return the reconciled bills.
    ///
    /// Sources are read strictly in order: lookups, bill info (with status
    /// pages and votes), versions per chamber, then history.
    pub async fn scrape(&self) -> Result<BillRegistry> {
        let transport = self.transport.as_ref();
        tracing::info!(session = %self.config.session, "scraping session");

        let lookups = self.build_lookups().await?;

        let mut bills = bill_info::scrape_bill_info(
            transport,
            &self.config,
            &lookups.introducers,
            &lookups.subjects,
        )
        .await?;

        for &chamber in &self.config.chambers {
            versions::scrape_versions(transport, &self.config, chamber, &mut bills).await?;
        }

        history::scrape_bill_history(transport, &self.config, &lookups.committees, &mut bills)
            .await?;

        Ok(bills)
    }

    /// Scrape the session and yield each finished bill.
    ///
    /// Bills are only released once every source has been merged, so the
    /// stream either yields one error or all bills.
    pub fn process(&self) -> impl Stream<Item = Result<Bill>> + '_ {
        Box::pin(stream! {
            let bills = match self.scrape().await {
                Ok(bills) => bills,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            for bill in bills.into_bills() {
                yield Ok(bill);
            }
        })
    }
}
