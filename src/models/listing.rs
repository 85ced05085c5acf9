use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ListingStatus {
    Pending,
    Approved,
    Suspended,
    Banned,
}

/// Admin moderation verbs, parsed from the update form. Anything that does
/// not parse is rejected as an unknown action instead of being ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ModerationAction {
    Approve,
    Suspend,
    Ban,
}

impl ModerationAction {
    pub fn target_status(self) -> ListingStatus {
        match self {
            Self::Approve => ListingStatus::Approved,
            Self::Suspend => ListingStatus::Suspended,
            Self::Ban => ListingStatus::Banned,
        }
    }
}

/// A submitted community server entry. Name, URL and description are stored
/// as given; `submitted_by` is attribution only and never cascades.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub status: ListingStatus,
    pub submitted_by: String,
}
