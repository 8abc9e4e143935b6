//! Roll-call tally sheets.
//!
//! Tally pages put several members on each table row. The house sheet has
//! four column groups of (yea, nay, absent, name); the senate sheet has two
//! groups with a leading spacer cell and the name one column further right.

use crate::error::{Error, Result};
use crate::html;
use crate::types::{Chamber, Vote, VoteOption};
use chrono::NaiveDate;
use regex::Regex;
use scraper::Html;

/// Marker of budget address pages, which are linked like votes but carry no tally
const BUDGET_ADDRESS: &str = "BUDGET ADDRESS";

/// Column layout of a chamber's tally table. Columns are 1-based, matching
/// XPath `td[n]` numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteLayout {
    pub chamber: Chamber,
    pub groups: &'static [usize],
    pub name_offset: usize,
    pub yes_offset: usize,
    pub no_offset: usize,
}

impl VoteLayout {
    pub const LOWER: VoteLayout = VoteLayout {
        chamber: Chamber::Lower,
        groups: &[1, 5, 9, 13],
        name_offset: 3,
        yes_offset: 0,
        no_offset: 1,
    };

    pub const UPPER: VoteLayout = VoteLayout {
        chamber: Chamber::Upper,
        groups: &[1, 6],
        name_offset: 4,
        yes_offset: 1,
        no_offset: 2,
    };

    /// House tallies live under `.../VOTE/H...`, everything else is senate
    pub fn for_url(url: &str) -> Self {
        if url.contains("VOTE/H") {
            Self::LOWER
        } else {
            Self::UPPER
        }
    }
}

/// First run of digits in the first span mentioning `label`
fn labelled_count(document: &Html, label: &'static str, digits: &Regex) -> Result<u32> {
    let text = labelled_span(document, label)?;
    digits
        .find(&text)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| Error::malformed(label, text))
}

fn labelled_span(document: &Html, label: &str) -> Result<String> {
    Ok(html::select(document, "span")?
        .into_iter()
        .map(html::text)
        .find(|text| text.contains(label))
        .unwrap_or_default())
}

/// Text of the 1-based `column`, empty when the row is shorter
fn cell(cells: &[String], column: usize) -> &str {
    cells.get(column - 1).map(String::as_str).unwrap_or("")
}

/// Parse one tally page.
///
/// Returns `Ok(None)` for budget address pages. `session` supplies the year,
/// since the sheet only prints month and day.
pub fn parse_vote(page: &str, url: &str, motion: &str, session: &str) -> Result<Option<Vote>> {
    if page.contains(BUDGET_ADDRESS) {
        tracing::debug!(url, "skipping budget address");
        return Ok(None);
    }

    let layout = VoteLayout::for_url(url);
    let document = Html::parse_document(page);
    let digits = Regex::new(r"\d+")?;

    let yes_count = labelled_count(&document, "Those voting Yea", &digits)?;
    let no_count = labelled_count(&document, "Those voting Nay", &digits)?;
    let other_count = labelled_count(&document, "Those absent", &digits)?;
    let threshold = labelled_count(&document, "Necessary for", &digits)?;

    let taken_on = labelled_span(&document, "Taken on")?;
    let date_pattern = Regex::new(r"Taken\s+on\s+(\d+/\s?\d+)")?;
    let month_day = date_pattern
        .captures(&taken_on)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace(' ', ""))
        .ok_or_else(|| Error::malformed("vote date", taken_on.clone()))?;
    let date_text = format!("{} {}", month_day, session);
    let date = NaiveDate::parse_from_str(&date_text, "%m/%d %Y")
        .map_err(|_| Error::InvalidDate(date_text.clone()))?;

    let mut vote = Vote::new(
        layout.chamber,
        date,
        motion,
        (yes_count, no_count, other_count),
        threshold,
    );
    vote.add_source(url);

    let table = html::select(&document, "table")?
        .into_iter()
        .next()
        .ok_or(Error::MissingElement {
            what: "roll call table",
            url: url.to_string(),
        })?;

    for row in html::table_rows(table) {
        let cells = html::row_cells(row);

        for &group in layout.groups {
            let name = cell(&cells, group + layout.name_offset);
            if name.is_empty() || name == "VACANT" {
                continue;
            }

            let position = if cell(&cells, group + layout.yes_offset).contains('Y') {
                VoteOption::Yes
            } else if cell(&cells, group + layout.no_offset).contains('N') {
                VoteOption::No
            } else {
                VoteOption::Other
            };
            vote.record(name, position);
        }
    }

    Ok(Some(vote))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUSE_URL: &str = "http://www.cga.ct.gov/2011/VOTE/H/2011HV-00123-R00HB05001-HV.htm";
    const SENATE_URL: &str = "http://www.cga.ct.gov/2011/VOTE/S/2011SV-00045-R00SB00001-SV.htm";

    fn house_page() -> String {
        let mut rows = String::new();
        rows.push_str(
            "<tr><td>Y</td><td></td><td></td><td>ABERCROMBIE</td>\
                 <td></td><td>N</td><td></td><td>ACKERT</td>\
                 <td></td><td></td><td>X</td><td>ADINOLFI</td>\
                 <td></td><td></td><td></td><td>VACANT</td></tr>",
        );
        rows.push_str(
            "<tr><td>Y</td><td></td><td></td><td>ALBERTS</td>\
                 <td></td><td></td><td></td><td></td></tr>",
        );
        format!(
            "<html><body>\
             <span>Taken on 4/12</span>\
             <span>Those voting Yea 85</span>\
             <span>Those voting Nay 60</span>\
             <span>Those absent and not voting 6</span>\
             <span>Necessary for Passage 73</span>\
             <table>{}</table></body></html>",
            rows
        )
    }

    #[test]
    fn test_house_tally() {
        let vote = parse_vote(&house_page(), HOUSE_URL, "Passed", "2011")
            .unwrap()
            .unwrap();

        assert_eq!(vote.chamber, Chamber::Lower);
        assert_eq!((vote.yes_count, vote.no_count, vote.other_count), (85, 60, 6));
        assert_eq!(vote.threshold, 73);
        assert!(vote.passed);
        assert_eq!(vote.date, NaiveDate::from_ymd_opt(2011, 4, 12).unwrap());
        assert_eq!(vote.motion, "Passed");
        assert_eq!(vote.sources, vec![HOUSE_URL]);
        assert_eq!(vote.names_with(VoteOption::Yes), vec!["ABERCROMBIE", "ALBERTS"]);
        assert_eq!(vote.names_with(VoteOption::No), vec!["ACKERT"]);
        assert_eq!(vote.names_with(VoteOption::Other), vec!["ADINOLFI"]);
    }

    #[test]
    fn test_senate_tally_layout() {
        let page = "<html><body>\
             <span>Taken on 5/ 3</span>\
             <span>Those voting Yea 20</span>\
             <span>Those voting Nay 16</span>\
             <span>Those absent and not voting 0</span>\
             <span>Necessary for Adoption 18</span>\
             <table><tr>\
               <td></td><td>Y</td><td></td><td></td><td>LEBEAU</td>\
               <td></td><td></td><td>N</td><td></td><td>COLEMAN</td>\
             </tr></table></body></html>";
        let vote = parse_vote(page, SENATE_URL, "Adopted", "2011")
            .unwrap()
            .unwrap();

        assert_eq!(vote.chamber, Chamber::Upper);
        assert_eq!(vote.date, NaiveDate::from_ymd_opt(2011, 5, 3).unwrap());
        assert!(vote.passed);
        assert_eq!(vote.names_with(VoteOption::Yes), vec!["LEBEAU"]);
        assert_eq!(vote.names_with(VoteOption::No), vec!["COLEMAN"]);
    }

    #[test]
    fn test_budget_address_yields_no_vote() {
        let page = "<html><body><span>GOVERNOR'S BUDGET ADDRESS, FEBRUARY 16</span></body></html>";
        assert_eq!(parse_vote(page, HOUSE_URL, "Budget", "2011").unwrap(), None);
    }

    #[test]
    fn test_missing_count_is_malformed() {
        let page = house_page().replace("Those voting Nay 60", "Those voting Nay");
        let result = parse_vote(&page, HOUSE_URL, "Passed", "2011");
        assert!(matches!(
            result,
            Err(Error::MalformedField { field: "Those voting Nay", .. })
        ));
    }

    #[test]
    fn test_threshold_equal_to_yes_fails() {
        let page = house_page().replace("Necessary for Passage 73", "Necessary for Passage 85");
        let vote = parse_vote(&page, HOUSE_URL, "Passed", "2011").unwrap().unwrap();
        assert!(!vote.passed);
    }
}
