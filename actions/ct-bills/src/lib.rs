//! Acquisition and reconciliation of Connecticut General Assembly bills.
//!
//! One session's bills are assembled from the legislature's data dumps
//! (bill info, history, committees), its HTML status, member and subject
//! pages, roll-call tally sheets and the versioned bill text directories.

pub mod bill_info;
pub mod bill_page;
pub mod committees;
pub mod config;
pub mod error;
pub mod feed;
pub mod history;
pub mod html;
pub mod introducers;
pub mod listing;
pub mod processor;
pub mod registry;
pub mod sink;
pub mod subjects;
pub mod transport;
pub mod types;
pub mod versions;
pub mod votes;

pub use config::{ConfigBuilder, ScrapeConfig, SubjectLinkSource};
pub use error::{Error, Result};
pub use processor::{SessionLookups, SessionProcessor};
pub use registry::BillRegistry;
pub use sink::{BillSink, DirectorySink, JsonLinesSink};
pub use transport::{HttpTransport, StaticTransport, Transport};
pub use types::{Action, ActionTag, Bill, BillType, Chamber, Sponsor, Vote, VoteOption};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{ConfigBuilder, ScrapeConfig, SubjectLinkSource};
    pub use crate::error::{Error, Result};
    pub use crate::processor::SessionProcessor;
    pub use crate::sink::{BillSink, DirectorySink, JsonLinesSink};
    pub use crate::transport::{HttpTransport, StaticTransport, Transport};
    pub use crate::types::{Bill, Chamber};
    pub use futures::StreamExt;
}
