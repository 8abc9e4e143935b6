use crate::config::ScrapeConfig;
use crate::error::{Error, Result};
use crate::listing::{self, ListingEntry};
use crate::registry::BillRegistry;
use crate::transport::Transport;
use crate::types::Chamber;
use regex::Regex;

/// Parses `2011HB-05001-R01...` into (`HB05001`, `R01`)
pub struct VersionFilename {
    pattern: Regex,
}

impl VersionFilename {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(r"^\d{4}([A-Z]+-\d{5})-(R\d\d)")?,
        })
    }

    pub fn parse(&self, filename: &str) -> Result<(String, String)> {
        let caps = self
            .pattern
            .captures(filename)
            .ok_or_else(|| Error::malformed("version filename", filename))?;
        Ok((caps[1].replace('-', ""), caps[2].to_string()))
    }
}

/// Attach listed files as versions of the bills they name.
///
/// `directory_url` is the listing's URL, ending in `/`. Subdirectories are
/// ignored and files for bills outside the registry are skipped. Returns the
/// number of versions attached.
pub fn attach_versions(
    entries: &[ListingEntry],
    directory_url: &str,
    bills: &mut BillRegistry,
) -> Result<usize> {
    let filenames = VersionFilename::new()?;
    let mut attached = 0;

    for entry in entries.iter().filter(|e| !e.is_dir) {
        let (bill_id, label) = filenames.parse(&entry.filename)?;
        let Some(bill) = bills.get_mut(&bill_id) else {
            continue;
        };
        bill.add_version(label, format!("{}{}", directory_url, entry.filename));
        attached += 1;
    }

    Ok(attached)
}

pub async fn scrape_versions(
    transport: &dyn Transport,
    config: &ScrapeConfig,
    chamber: Chamber,
    bills: &mut BillRegistry,
) -> Result<()> {
    let url = config.versions_url(chamber);
    let text = transport.fetch(&url).await?;
    let entries = listing::parse_directory_listing(&text, &url)?;
    let attached = attach_versions(&entries, &url, bills)?;
    tracing::info!(%chamber, versions = attached, "attached bill versions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::transport::StaticTransport;
    use crate::types::{Bill, BillType};

    const DIR: &str = "ftp://ftp.cga.ct.gov/2011/tob/h/";

    fn file(name: &str) -> ListingEntry {
        ListingEntry {
            filename: name.to_string(),
            size: Some(1024),
            is_dir: false,
            modified: None,
        }
    }

    fn registry() -> BillRegistry {
        let mut bills = BillRegistry::new();
        bills.insert(Bill::new("2011", Chamber::Lower, "HB05001", "T", BillType::Bill));
        bills
    }

    #[test]
    fn test_parse_filename() {
        let filenames = VersionFilename::new().unwrap();
        assert_eq!(
            filenames.parse("2011HB-05001-R01.htm").unwrap(),
            ("HB05001".to_string(), "R01".to_string())
        );
        assert_eq!(
            filenames.parse("2011SJ-00012-R00-SJ.htm").unwrap(),
            ("SJ00012".to_string(), "R00".to_string())
        );
        assert!(matches!(
            filenames.parse("README.txt"),
            Err(Error::MalformedField { field: "version filename", .. })
        ));
    }

    #[test]
    fn test_attaches_registered_bill_and_skips_others() {
        let mut bills = registry();
        let entries = vec![file("2011HB-05001-R01.htm"), file("2011HB-06999-R00.htm")];

        let attached = attach_versions(&entries, DIR, &mut bills).unwrap();
        assert_eq!(attached, 1);
        let versions = &bills.get("HB05001").unwrap().versions;
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].name, "R01");
        assert_eq!(versions[0].url, "ftp://ftp.cga.ct.gov/2011/tob/h/2011HB-05001-R01.htm");
    }

    #[test]
    fn test_versions_accumulate() {
        let mut bills = registry();
        let entries = vec![
            file("2011HB-05001-R00-HB.htm"),
            file("2011HB-05001-R01-HB.htm"),
            ListingEntry {
                filename: "archive".to_string(),
                size: None,
                is_dir: true,
                modified: None,
            },
        ];
        attach_versions(&entries, DIR, &mut bills).unwrap();
        let labels: Vec<&str> = bills
            .get("HB05001")
            .unwrap()
            .versions
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(labels, vec!["R00", "R01"]);
    }

    #[test]
    fn test_scrape_versions_from_http_index() {
        let config = ConfigBuilder::new("2011").build().unwrap();
        let index = r#"<html><body><pre>
            <A HREF="/2011/tob/">[To Parent Directory]</A><br>
            <A HREF="/2011/tob/h/2011HB-05001-R00-HB.htm">2011HB-05001-R00-HB.htm</A><br>
            <A HREF="/2011/tob/h/2011HB-05001-R01-HB.htm">2011HB-05001-R01-HB.htm</A><br>
            </pre></body></html>"#;
        let transport = StaticTransport::new().with(DIR, index);
        let mut bills = registry();

        tokio_test::block_on(scrape_versions(&transport, &config, Chamber::Lower, &mut bills))
            .unwrap();

        let urls: Vec<&str> = bills
            .get("HB05001")
            .unwrap()
            .versions
            .iter()
            .map(|v| v.url.as_str())
            .collect();
        assert_eq!(
            urls,
            vec![
                "ftp://ftp.cga.ct.gov/2011/tob/h/2011HB-05001-R00-HB.htm",
                "ftp://ftp.cga.ct.gov/2011/tob/h/2011HB-05001-R01-HB.htm",
            ]
        );
    }
}
