use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two legislative bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    Upper,
    Lower,
}

impl Chamber {
    /// Chamber implied by the first character of a bill identifier (`H` house, `S` senate)
    pub fn from_bill_id(bill_id: &str) -> Option<Self> {
        match bill_id.chars().next() {
            Some('H') => Some(Chamber::Lower),
            Some('S') => Some(Chamber::Upper),
            _ => None,
        }
    }

    /// Lowercase letter used in legislature URLs (`s` senate, `h` house)
    pub fn letter(self) -> char {
        match self {
            Chamber::Upper => 's',
            Chamber::Lower => 'h',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Chamber::Upper => "upper",
            Chamber::Lower => "lower",
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chamber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upper" | "senate" => Ok(Chamber::Upper),
            "lower" | "house" => Ok(Chamber::Lower),
            other => Err(format!(
                "Invalid chamber '{}'. Allowed values are: upper, lower",
                other
            )),
        }
    }
}

/// Bill classification derived from the identifier prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillType {
    #[serde(rename = "bill")]
    Bill,
    #[serde(rename = "resolution")]
    Resolution,
    #[serde(rename = "joint resolution")]
    JointResolution,
}

impl BillType {
    /// `SJ`/`HJ` are joint resolutions, `SR`/`HR` resolutions, anything else a bill
    pub fn from_bill_id(bill_id: &str) -> Self {
        let bytes = bill_id.as_bytes();
        match bytes {
            [b'S' | b'H', b'J', ..] => BillType::JointResolution,
            [b'S' | b'H', b'R', ..] => BillType::Resolution,
            _ => BillType::Bill,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sponsor {
    pub role: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_type: Option<String>,
}

/// A linked supporting document (fiscal note, bill analysis)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub url: String,
}

/// One textual revision of a bill, labelled like `R01`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub name: String,
    pub url: String,
}

/// Semantic classification attached to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionTag {
    #[serde(rename = "committee:referred")]
    CommitteeReferred,
    #[serde(rename = "bill:passed")]
    BillPassed,
    #[serde(rename = "committee:passed:favorable")]
    CommitteePassedFavorable,
    #[serde(rename = "committee:passed:unfavorable")]
    CommitteePassedUnfavorable,
    #[serde(rename = "other")]
    Other,
}

impl ActionTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionTag::CommitteeReferred => "committee:referred",
            ActionTag::BillPassed => "bill:passed",
            ActionTag::CommitteePassedFavorable => "committee:passed:favorable",
            ActionTag::CommitteePassedUnfavorable => "committee:passed:unfavorable",
            ActionTag::Other => "other",
        }
    }
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dated entry in a bill's procedural history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub actor: Chamber,
    pub description: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub tags: Vec<ActionTag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteOption {
    Yes,
    No,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberVote {
    pub name: String,
    pub vote: VoteOption,
}

/// A recorded roll call on one motion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub chamber: Chamber,
    pub date: NaiveDate,
    pub motion: String,
    pub passed: bool,
    pub yes_count: u32,
    pub no_count: u32,
    pub other_count: u32,
    /// Votes needed for passage, as printed on the tally sheet
    pub threshold: u32,
    pub roll_call: Vec<MemberVote>,
    pub sources: Vec<String>,
}

impl Vote {
    pub fn new(
        chamber: Chamber,
        date: NaiveDate,
        motion: impl Into<String>,
        counts: (u32, u32, u32),
        threshold: u32,
    ) -> Self {
        let (yes_count, no_count, other_count) = counts;
        Self {
            chamber,
            date,
            motion: motion.into(),
            passed: yes_count > threshold,
            yes_count,
            no_count,
            other_count,
            threshold,
            roll_call: Vec::new(),
            sources: Vec::new(),
        }
    }

    pub fn record(&mut self, name: impl Into<String>, vote: VoteOption) {
        self.roll_call.push(MemberVote {
            name: name.into(),
            vote,
        });
    }

    pub fn add_source(&mut self, url: impl Into<String>) {
        self.sources.push(url.into());
    }

    /// Names recorded with the given position, in roll-call order
    pub fn names_with(&self, vote: VoteOption) -> Vec<&str> {
        self.roll_call
            .iter()
            .filter(|m| m.vote == vote)
            .map(|m| m.name.as_str())
            .collect()
    }
}

/// A complete bill record for one session
///
/// Every collection starts empty so downstream stages can rely on each field
/// being present; stages only append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub session: String,
    pub chamber: Chamber,
    pub bill_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub bill_type: BillType,
    pub sponsors: Vec<Sponsor>,
    pub actions: Vec<Action>,
    pub votes: Vec<Vote>,
    pub documents: Vec<Document>,
    pub versions: Vec<Version>,
    pub subjects: Vec<String>,
    pub sources: Vec<String>,
}

impl Bill {
    pub fn new(
        session: impl Into<String>,
        chamber: Chamber,
        bill_id: impl Into<String>,
        title: impl Into<String>,
        bill_type: BillType,
    ) -> Self {
        Self {
            session: session.into(),
            chamber,
            bill_id: bill_id.into(),
            title: title.into(),
            bill_type,
            sponsors: Vec::new(),
            actions: Vec::new(),
            votes: Vec::new(),
            documents: Vec::new(),
            versions: Vec::new(),
            subjects: Vec::new(),
            sources: Vec::new(),
        }
    }

    pub fn add_source(&mut self, url: impl Into<String>) {
        self.sources.push(url.into());
    }

    pub fn add_sponsor(
        &mut self,
        role: impl Into<String>,
        name: impl Into<String>,
        official_type: Option<&str>,
    ) {
        self.sponsors.push(Sponsor {
            role: role.into(),
            name: name.into(),
            official_type: official_type.map(str::to_string),
        });
    }

    pub fn add_document(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.documents.push(Document {
            name: name.into(),
            url: url.into(),
        });
    }

    pub fn add_version(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.versions.push(Version {
            name: name.into(),
            url: url.into(),
        });
    }

    pub fn add_vote(&mut self, vote: Vote) {
        self.votes.push(vote);
    }

    pub fn add_action(
        &mut self,
        actor: Chamber,
        description: impl Into<String>,
        date: NaiveDate,
        tags: Vec<ActionTag>,
    ) {
        self.actions.push(Action {
            actor,
            description: description.into(),
            date,
            tags,
        });
    }
}
