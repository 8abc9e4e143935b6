//! Parsing of directory listings.
//!
//! Handles the text listings returned by FTP servers, both Unix `ls -l` style
//! and the IIS/DOS style the legislature's server uses, plus the HTML index
//! pages an HTTP mirror serves for the same directories.

use crate::error::Result;
use crate::html;
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use scraper::Html;
use url::Url;

/// One file or directory in a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub filename: String,
    pub size: Option<u64>,
    pub is_dir: bool,
    pub modified: Option<NaiveDateTime>,
}

/// Parse a directory listing into entries, in listing order.
///
/// `url` is the listing's own URL, ending in `/`. Lines matching no known
/// format (totals, banners) are skipped.
pub fn parse_directory_listing(text: &str, url: &str) -> Result<Vec<ListingEntry>> {
    if looks_like_html(text) {
        return parse_html_index(text, url);
    }

    let unix = Regex::new(
        r"^([dl-])\S{9}\S*\s+\d+\s+\S+\s+\S+\s+(\d+)\s+([A-Z][a-z]{2}\s+\d{1,2}\s+(?:\d{1,2}:\d{2}|\d{4}))\s+(.+)$",
    )?;
    let dos = Regex::new(r"^(\d{2}-\d{2}-\d{2,4}\s+\d{1,2}:\d{2}[AP]M)\s+(<DIR>|\d+)\s+(.+)$")?;

    let mut entries = Vec::new();
    for line in text.lines() {
        let line = line.trim_end();

        if let Some(caps) = dos.captures(line) {
            let is_dir = &caps[2] == "<DIR>";
            entries.push(ListingEntry {
                filename: caps[3].to_string(),
                size: if is_dir { None } else { caps[2].parse().ok() },
                is_dir,
                modified: parse_dos_timestamp(&caps[1]),
            });
        } else if let Some(caps) = unix.captures(line) {
            let mut filename = caps[4].to_string();
            // symlinks list as "name -> target"
            if &caps[1] == "l" {
                if let Some(pos) = filename.find(" -> ") {
                    filename.truncate(pos);
                }
            }
            entries.push(ListingEntry {
                filename,
                size: caps[2].parse().ok(),
                is_dir: &caps[1] == "d",
                modified: parse_unix_timestamp(&caps[3]),
            });
        }
    }

    Ok(entries)
}

fn looks_like_html(text: &str) -> bool {
    let head: String = text.chars().take(512).collect::<String>().to_lowercase();
    head.contains("<html") || head.contains("<!doctype") || head.contains("<a ")
}

/// Entries of an HTTP index page. Hrefs may be relative or absolute paths;
/// links resolving outside the directory (parent, sort links) are skipped.
fn parse_html_index(text: &str, url: &str) -> Result<Vec<ListingEntry>> {
    let base = Url::parse(url)?;
    let document = Html::parse_document(text);

    let mut entries = Vec::new();
    for link in html::select(&document, "a[href]")? {
        let href = link.value().attr("href").unwrap_or_default();
        let Ok(target) = base.join(href) else {
            continue;
        };
        if target.query().is_some() || target.host_str() != base.host_str() {
            continue;
        }
        let Some(rest) = target.path().strip_prefix(base.path()) else {
            continue;
        };

        let is_dir = rest.ends_with('/');
        let filename = rest
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        if filename.is_empty() {
            continue;
        }
        entries.push(ListingEntry {
            filename,
            size: None,
            is_dir,
            modified: None,
        });
    }
    Ok(entries)
}

fn parse_dos_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDateTime::parse_from_str(&normalized, "%m-%d-%y %I:%M%p")
        .or_else(|_| NaiveDateTime::parse_from_str(&normalized, "%m-%d-%Y %I:%M%p"))
        .ok()
}

/// Only listings that print the year yield a timestamp; `Mar  1 10:00` style
/// entries leave the year to the reader and are left undated.
fn parse_unix_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDate::parse_from_str(&normalized, "%b %d %Y")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
