//! Action history from the `bill_history.csv` dump.
//!
//! Rows are grouped per bill, ordered by timestamp, rewritten into readable
//! descriptions and tagged. The chamber holding the bill is tracked across a
//! bill's actions: transmittal and passage actions hand it to the other body
//! for the actions that follow.

use crate::committees::CommitteeNames;
use crate::config::ScrapeConfig;
use crate::error::{Error, Result};
use crate::feed;
use crate::registry::BillRegistry;
use crate::transport::Transport;
use crate::types::{ActionTag, Chamber};
use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde::Deserialize;

/// One row of `bill_history.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryRow {
    pub bill_num: String,
    /// `YYYY-MM-DD HH:MM:SS`, so string order is chronological
    pub act_date: String,
    pub act_desc: String,
    #[serde(default)]
    pub qual1: String,
    #[serde(default)]
    pub qual2: String,
}

/// Tagging rule applied to the final description
struct TagRule {
    pattern: Regex,
    tag: fn(&Captures) -> ActionTag,
}

/// Rewrites action descriptions and assigns their tags.
///
/// Tag rules are independent: every matching rule contributes its tag, and
/// `other` is used only when nothing matched.
pub struct ActionClassifier {
    referral: Regex,
    olr_ofa: Regex,
    rules: Vec<TagRule>,
}

impl ActionClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            referral: Regex::new(r"COMM(?:ITTEE|\.) ON$")?,
            olr_ofa: Regex::new(r"REFERRED TO OLR, OFA (.*)")?,
            rules: vec![
                TagRule {
                    pattern: Regex::new(r"^(?:ADOPTED, (?:HOUSE|SENATE)|(?:HOUSE|SENATE) PASSED)")?,
                    tag: |_| ActionTag::BillPassed,
                },
                TagRule {
                    pattern: Regex::new(r"^Joint ((?:Un)?[Ff]avorable)")?,
                    tag: |caps| {
                        if caps[1].to_lowercase() == "unfavorable" {
                            ActionTag::CommitteePassedUnfavorable
                        } else {
                            ActionTag::CommitteePassedFavorable
                        }
                    },
                },
            ],
        })
    }

    /// Final description and tags for a history row
    pub fn classify(
        &self,
        row: &HistoryRow,
        committees: &CommitteeNames,
        session: &str,
    ) -> (String, Vec<ActionTag>) {
        let mut description = row.act_desc.trim().to_string();
        let mut tags = Vec::new();

        if self.referral.is_match(&description) {
            let committee = committees.resolve(&row.qual1);
            description = format!("{} {}", description, committee);
            tags.push(ActionTag::CommitteeReferred);
        } else if !row.qual1.is_empty() {
            if row.qual1.contains(session) {
                if row.qual2.is_empty() {
                    description = format!("{} ({})", description, row.qual1);
                } else {
                    description = format!("{} ({} {})", description, row.qual1, row.qual2);
                }
            } else {
                description = format!("{} {}", description, row.qual1);
            }
        }

        if let Some(caps) = self.olr_ofa.captures(&description) {
            description = format!(
                "REFERRED TO Office of Legislative Research AND Office of Fiscal Analysis {}",
                &caps[1]
            );
        }

        for rule in &self.rules {
            if let Some(caps) = rule.pattern.captures(&description) {
                tags.push((rule.tag)(&caps));
            }
        }

        if tags.is_empty() {
            tags.push(ActionTag::Other);
        }
        (description, tags)
    }
}

/// Chamber holding the bill after an action with this description
fn next_chamber(description: &str, current: Chamber) -> Chamber {
    let mut chamber = current;
    if description.contains("TRANS.TO HOUSE") || description == "SENATE PASSED" {
        chamber = Chamber::Lower;
    }
    if description.contains("TRANSMITTED TO SENATE") || description == "HOUSE PASSED" {
        chamber = Chamber::Upper;
    }
    chamber
}

fn parse_action_date(raw: &str) -> Result<NaiveDate> {
    NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date())
        .map_err(|_| Error::InvalidDate(raw.to_string()))
}

/// Append history rows to the bills they belong to.
///
/// Rows for bills not in the registry are dropped. Returns the number of
/// actions attached.
pub fn merge_history(
    rows: Vec<HistoryRow>,
    committees: &CommitteeNames,
    bills: &mut BillRegistry,
) -> Result<usize> {
    let classifier = ActionClassifier::new()?;

    let mut buckets: IndexMap<String, Vec<HistoryRow>> = IndexMap::new();
    for row in rows {
        if bills.contains(&row.bill_num) {
            buckets.entry(row.bill_num.clone()).or_default().push(row);
        }
    }

    let mut attached = 0;
    for (bill_id, mut actions) in buckets {
        let Some(bill) = bills.get_mut(&bill_id) else {
            continue;
        };

        // stable, so same-timestamp rows keep feed order
        actions.sort_by(|a, b| a.act_date.cmp(&b.act_date));

        let mut chamber = bill.chamber;
        for row in &actions {
            let date = parse_action_date(&row.act_date)?;
            let (description, tags) = classifier.classify(row, committees, &bill.session);
            let following = next_chamber(&description, chamber);
            bill.add_action(chamber, description, date, tags);
            chamber = following;
            attached += 1;
        }
    }

    Ok(attached)
}

pub async fn scrape_bill_history(
    transport: &dyn Transport,
    config: &ScrapeConfig,
    committees: &CommitteeNames,
    bills: &mut BillRegistry,
) -> Result<()> {
    let text = transport.fetch(&config.bill_history_url()).await?;
    let rows: Vec<HistoryRow> = feed::read_rows(&text)?;
    let attached = merge_history(rows, committees, bills)?;
    tracing::info!(actions = attached, "merged bill history");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::committees::CommitteeRow;
    use crate::types::{Bill, BillType};

    fn row(bill: &str, date: &str, desc: &str, qual1: &str, qual2: &str) -> HistoryRow {
        HistoryRow {
            bill_num: bill.to_string(),
            act_date: date.to_string(),
            act_desc: desc.to_string(),
            qual1: qual1.to_string(),
            qual2: qual2.to_string(),
        }
    }

    fn committees() -> CommitteeNames {
        CommitteeNames::from_rows(vec![CommitteeRow {
            comm_code: "JUD".to_string(),
            comm_name: "Judiciary Committee".to_string(),
        }])
    }

    fn classify(desc: &str, qual1: &str, qual2: &str) -> (String, Vec<ActionTag>) {
        ActionClassifier::new().unwrap().classify(
            &row("HB05001", "2011-03-01 10:00:00", desc, qual1, qual2),
            &committees(),
            "2011",
        )
    }

    #[test]
    fn test_olr_ofa_is_spelled_out() {
        let (description, tags) = classify("REFERRED TO OLR, OFA FOR REVIEW", "", "");
        assert_eq!(
            description,
            "REFERRED TO Office of Legislative Research AND Office of Fiscal Analysis FOR REVIEW"
        );
        assert_eq!(tags, vec![ActionTag::Other]);
    }

    #[test]
    fn test_committee_referral() {
        let (description, tags) = classify("REFERRED TO JOINT COMMITTEE ON", "JUD", "");
        assert_eq!(description, "REFERRED TO JOINT COMMITTEE ON Judiciary");
        assert_eq!(tags, vec![ActionTag::CommitteeReferred]);

        let (description, _) = classify("REF. TO JOINT COMM. ON", "XYZ", "");
        assert_eq!(description, "REF. TO JOINT COMM. ON XYZ");
    }

    #[test]
    fn test_qualifiers() {
        let (description, _) = classify("FILE NUMBER", "2011 FILE 123", "CAL. 45");
        assert_eq!(description, "FILE NUMBER (2011 FILE 123 CAL. 45)");

        let (description, _) = classify("FILE NUMBER", "2011 FILE 123", "");
        assert_eq!(description, "FILE NUMBER (2011 FILE 123)");

        let (description, _) = classify("PUBLIC ACT", "11-45", "");
        assert_eq!(description, "PUBLIC ACT 11-45");
    }

    #[test]
    fn test_passage_and_committee_tags() {
        assert_eq!(classify("HOUSE PASSED", "", "").1, vec![ActionTag::BillPassed]);
        assert_eq!(
            classify("ADOPTED, SENATE", "", "").1,
            vec![ActionTag::BillPassed]
        );
        assert_eq!(
            classify("Joint Favorable Substitute", "", "").1,
            vec![ActionTag::CommitteePassedFavorable]
        );
        assert_eq!(
            classify("Joint Unfavorable Report", "", "").1,
            vec![ActionTag::CommitteePassedUnfavorable]
        );
        assert_eq!(classify("PASSED HOUSE", "", "").1, vec![ActionTag::Other]);
    }

    #[test]
    fn test_merge_orders_and_tracks_chamber() {
        let mut bills = BillRegistry::new();
        bills.insert(Bill::new("2011", Chamber::Lower, "HB05001", "T", BillType::Bill));

        let rows = vec![
            row("HB05001", "2011-04-02 09:00:00", "TRANSMITTED TO SENATE", "", ""),
            row("HB05001", "2011-03-01 10:00:00", "REFERRED TO JOINT COMMITTEE ON", "JUD", ""),
            row("HB05001", "2011-04-01 12:00:00", "HOUSE PASSED", "", ""),
            row("HB05001", "2011-04-03 09:00:00", "SENATE PASSED", "", ""),
            row("HB05001", "2011-04-04 09:00:00", "SIGNED BY GOVERNOR", "", ""),
            row("SB00999", "2011-04-01 12:00:00", "SENATE PASSED", "", ""),
        ];

        let attached = merge_history(rows, &committees(), &mut bills).unwrap();
        assert_eq!(attached, 5);

        let bill = bills.get("HB05001").unwrap();
        let actors: Vec<Chamber> = bill.actions.iter().map(|a| a.actor).collect();
        assert_eq!(
            actors,
            vec![
                Chamber::Lower,
                Chamber::Lower,
                Chamber::Upper,
                Chamber::Upper,
                Chamber::Lower,
            ]
        );
        assert!(bill.actions.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(
            bill.actions[0].description,
            "REFERRED TO JOINT COMMITTEE ON Judiciary"
        );
        assert!(!bills.contains("SB00999"));
    }

    #[test]
    fn test_same_timestamp_keeps_feed_order() {
        let mut bills = BillRegistry::new();
        bills.insert(Bill::new("2011", Chamber::Upper, "SB00001", "T", BillType::Bill));
        let rows = vec![
            row("SB00001", "2011-03-01 10:00:00", "FIRST", "", ""),
            row("SB00001", "2011-03-01 10:00:00", "SECOND", "", ""),
        ];
        merge_history(rows, &committees(), &mut bills).unwrap();
        let descriptions: Vec<&str> = bills
            .get("SB00001")
            .unwrap()
            .actions
            .iter()
            .map(|a| a.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["FIRST", "SECOND"]);
    }

    #[test]
    fn test_bad_timestamp_is_fatal() {
        let mut bills = BillRegistry::new();
        bills.insert(Bill::new("2011", Chamber::Upper, "SB00001", "T", BillType::Bill));
        let rows = vec![row("SB00001", "03/01/2011", "FIRST", "", "")];
        assert!(matches!(
            merge_history(rows, &committees(), &mut bills),
            Err(Error::InvalidDate(_))
        ));
    }
}
