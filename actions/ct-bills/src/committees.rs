use crate::config::ScrapeConfig;
use crate::error::Result;
use crate::feed;
use crate::transport::Transport;
use serde::Deserialize;
use std::collections::HashMap;

/// One row of `committee.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct CommitteeRow {
    pub comm_code: String,
    pub comm_name: String,
}

/// Committee code to display name
#[derive(Debug, Clone, Default)]
pub struct CommitteeNames {
    names: HashMap<String, String>,
}

impl CommitteeNames {
    pub fn from_rows(rows: impl IntoIterator<Item = CommitteeRow>) -> Self {
        let names = rows
            .into_iter()
            .map(|row| {
                let name = row.comm_name.trim();
                let name = name.strip_suffix(" Committee").unwrap_or(name);
                (row.comm_code.trim().to_string(), name.to_string())
            })
            .collect();
        Self { names }
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Display name for `code`, or the code itself when unknown
    pub fn resolve<'a>(&'a self, code: &'a str) -> &'a str {
        match self.get(code) {
            Some(name) => name,
            None => {
                tracing::debug!(code, "unknown committee code");
                code
            }
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

pub fn parse_committee_names(text: &str) -> Result<CommitteeNames> {
    let rows: Vec<CommitteeRow> = feed::read_rows(text)?;
    Ok(CommitteeNames::from_rows(rows))
}

pub async fn scrape_committee_names(
    transport: &dyn Transport,
    config: &ScrapeConfig,
) -> Result<CommitteeNames> {
    let text = transport.fetch(&config.committee_url()).await?;
    let names = parse_committee_names(&text)?;
    tracing::info!(committees = names.len(), "loaded committee names");
    Ok(names)
}
