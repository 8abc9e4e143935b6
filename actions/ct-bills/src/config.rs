use crate::error::{Error, Result};
use crate::types::Chamber;
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// Which page supplies the bill identifiers tagged with a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubjectLinkSource {
    /// Bill links of the letter index page the subject was found on.
    /// This over-attributes subjects but matches the long-standing output.
    #[default]
    IndexPage,
    /// Bill links of the subject's own page
    SubjectPage,
}

impl From<&str> for SubjectLinkSource {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "subject-page" | "subject_page" => SubjectLinkSource::SubjectPage,
            _ => SubjectLinkSource::IndexPage,
        }
    }
}

/// Configuration for one session scrape
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Session year, e.g. "2011"
    pub session: String,
    pub chambers: Vec<Chamber>,
    /// Root of the data dumps and versioned documents
    pub data_url: String,
    /// Root of the HTML status pages
    pub web_url: String,
    /// HTTP mirror used in place of `ftp://` URLs
    pub ftp_mirror: Option<String>,
    pub subject_links: SubjectLinkSource,
    pub timeout_secs: u64,
}

impl ScrapeConfig {
    /// Create a new default configuration
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            chambers: vec![Chamber::Upper, Chamber::Lower],
            data_url: "ftp://ftp.cga.ct.gov".to_string(),
            web_url: "http://www.cga.ct.gov".to_string(),
            ftp_mirror: None,
            subject_links: SubjectLinkSource::IndexPage,
            timeout_secs: 60,
        }
    }

    /// Load a configuration from a YAML file; absent fields keep their defaults.
    ///
    /// The result is not validated, so command-line overrides can still fill
    /// in the session. Pass it through `ConfigBuilder::build` before use.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.session.len() != 4 || self.session.parse::<i32>().is_err() {
            return Err(Error::Config(format!(
                "Session must be a four-digit year, got '{}'",
                self.session
            )));
        }

        if self.chambers.is_empty() {
            return Err(Error::Config("At least one chamber is required".to_string()));
        }

        Url::parse(&self.data_url)?;
        Url::parse(&self.web_url)?;
        if let Some(mirror) = &self.ftp_mirror {
            Url::parse(mirror)?;
        }

        Ok(())
    }

    pub fn wants(&self, chamber: Chamber) -> bool {
        self.chambers.contains(&chamber)
    }

    fn data(&self, path: &str) -> String {
        format!("{}/{}", self.data_url.trim_end_matches('/'), path)
    }

    fn web(&self, path: &str) -> String {
        format!("{}/{}", self.web_url.trim_end_matches('/'), path)
    }

    pub fn bill_info_url(&self) -> String {
        self.data("pub/data/bill_info.csv")
    }

    pub fn bill_history_url(&self) -> String {
        self.data("pub/data/bill_history.csv")
    }

    pub fn committee_url(&self) -> String {
        self.data("pub/data/committee.csv")
    }

    /// Directory of versioned bill texts for a chamber (trailing slash included)
    pub fn versions_url(&self, chamber: Chamber) -> String {
        self.data(&format!("{}/tob/{}/", self.session, chamber.letter()))
    }

    pub fn subject_index_url(&self, letter: char) -> String {
        self.web(&format!(
            "asp/cgasubjectsearch/default.asp?LeadingChar={}",
            letter
        ))
    }

    pub fn member_list_url(&self, chamber: Chamber) -> String {
        self.web(&format!("asp/menu/{}list.asp", chamber.letter()))
    }

    pub fn bill_page_url(&self, bill_id: &str) -> String {
        self.web(&format!(
            "asp/cgabillstatus/cgabillstatus.asp?selBillType=Bill&bill_num={}&which_year={}",
            bill_id, self.session
        ))
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self::new("")
    }
}

/// Builder for creating configurations
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: ScrapeConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default settings
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            config: ScrapeConfig::new(session),
        }
    }

    /// Start from an existing configuration, e.g. one loaded from YAML
    pub fn from_config(config: ScrapeConfig) -> Self {
        Self { config }
    }

    pub fn session(mut self, session: impl Into<String>) -> Self {
        self.config.session = session.into();
        self
    }

    /// Set the chambers to scrape
    pub fn chambers(mut self, chambers: Vec<Chamber>) -> Self {
        self.config.chambers = chambers;
        self
    }

    /// Set chambers from comma-separated string
    pub fn chambers_str(mut self, chambers: &str) -> Result<Self> {
        let parsed: Result<Vec<Chamber>> = chambers
            .split(',')
            .map(|s| s.parse::<Chamber>().map_err(Error::Config))
            .collect();
        self.config.chambers = parsed?;
        Ok(self)
    }

    pub fn data_url(mut self, url: impl Into<String>) -> Self {
        self.config.data_url = url.into();
        self
    }

    pub fn web_url(mut self, url: impl Into<String>) -> Self {
        self.config.web_url = url.into();
        self
    }

    pub fn ftp_mirror(mut self, url: impl Into<String>) -> Self {
        self.config.ftp_mirror = Some(url.into());
        self
    }

    pub fn subject_links(mut self, source: SubjectLinkSource) -> Self {
        self.config.subject_links = source;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<ScrapeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_urls() {
        let config = ConfigBuilder::new("2011").build().unwrap();
        assert_eq!(
            config.bill_info_url(),
            "ftp://ftp.cga.ct.gov/pub/data/bill_info.csv"
        );
        assert_eq!(config.versions_url(Chamber::Lower), "ftp://ftp.cga.ct.gov/2011/tob/h/");
        assert_eq!(
            config.member_list_url(Chamber::Upper),
            "http://www.cga.ct.gov/asp/menu/slist.asp"
        );
        assert_eq!(
            config.bill_page_url("HB05001"),
            "http://www.cga.ct.gov/asp/cgabillstatus/cgabillstatus.asp?selBillType=Bill&bill_num=HB05001&which_year=2011"
        );
        assert_eq!(
            config.subject_index_url('Q'),
            "http://www.cga.ct.gov/asp/cgasubjectsearch/default.asp?LeadingChar=Q"
        );
    }

    #[test]
    fn test_rejects_non_year_session() {
        assert!(matches!(
            ConfigBuilder::new("2011A").build(),
            Err(Error::Config(_))
        ));
        assert!(ConfigBuilder::new("").build().is_err());
    }

    #[test]
    fn test_rejects_empty_chambers() {
        assert!(ConfigBuilder::new("2011").chambers(vec![]).build().is_err());
    }

    #[test]
    fn test_chambers_str() {
        let config = ConfigBuilder::new("2011")
            .chambers_str("lower")
            .unwrap()
            .build()
            .unwrap();
        assert!(config.wants(Chamber::Lower));
        assert!(!config.wants(Chamber::Upper));
        assert!(ConfigBuilder::new("2011").chambers_str("lower,joint").is_err());
    }

    #[test]
    fn test_from_yaml_file_defaults_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "session: \"2012\"").unwrap();
        writeln!(file, "chambers: [upper]").unwrap();
        writeln!(file, "subject_links: subject-page").unwrap();

        let config = ScrapeConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.session, "2012");
        assert_eq!(config.chambers, vec![Chamber::Upper]);
        assert_eq!(config.subject_links, SubjectLinkSource::SubjectPage);
        assert_eq!(config.web_url, "http://www.cga.ct.gov");
        assert_eq!(config.timeout_secs, 60);
    }
}
