//! Column keys and the raw statuses they group

use serde::{Deserialize, Serialize};
use std::fmt;

/// A kanban lane. Coarser than [`MatchStatus`]: several statuses share a lane.
///
/// Variant order is display order; `Ord` follows it so maps keyed by
/// `ColumnKey` iterate left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKey {
    New,
    Applied,
    Interviewing,
    Offer,
    Closed,
}

impl ColumnKey {
    /// Number of lanes on the board
    pub const COUNT: usize = 5;

    /// All lanes in display order
    pub const ALL: [ColumnKey; Self::COUNT] = [
        ColumnKey::New,
        ColumnKey::Applied,
        ColumnKey::Interviewing,
        ColumnKey::Offer,
        ColumnKey::Closed,
    ];

    /// Lane for matches whose status is missing or unrecognized
    pub const FALLBACK: ColumnKey = ColumnKey::New;

    /// Dense index into per-column arrays
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Applied => "applied",
            Self::Interviewing => "interviewing",
            Self::Offer => "offer",
            Self::Closed => "closed",
        }
    }

    /// Human-readable lane title
    pub fn title(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Applied => "Applied",
            Self::Interviewing => "Interviewing",
            Self::Offer => "Offer",
            Self::Closed => "Closed",
        }
    }

    /// Parse a lane key as written by [`ColumnKey::as_str`]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == s)
    }

    /// Lane for a raw status string, falling back to [`ColumnKey::FALLBACK`]
    pub fn for_status(status: &str) -> Self {
        MatchStatus::parse(status)
            .map(MatchStatus::column)
            .unwrap_or(Self::FALLBACK)
    }

    /// Status written back when a match is dropped into this lane
    pub fn status(self) -> MatchStatus {
        match self {
            Self::New => MatchStatus::New,
            Self::Applied => MatchStatus::Applied,
            Self::Interviewing => MatchStatus::Interviewing,
            Self::Offer => MatchStatus::Offer,
            Self::Closed => MatchStatus::Archived,
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw status values known to the system of record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    New,
    Shortlisted,
    Applied,
    Screening,
    Interviewing,
    Offer,
    Hired,
    Rejected,
    Withdrawn,
    Archived,
}

impl MatchStatus {
    const ALL: [MatchStatus; 10] = [
        MatchStatus::New,
        MatchStatus::Shortlisted,
        MatchStatus::Applied,
        MatchStatus::Screening,
        MatchStatus::Interviewing,
        MatchStatus::Offer,
        MatchStatus::Hired,
        MatchStatus::Rejected,
        MatchStatus::Withdrawn,
        MatchStatus::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Shortlisted => "shortlisted",
            Self::Applied => "applied",
            Self::Screening => "screening",
            Self::Interviewing => "interviewing",
            Self::Offer => "offer",
            Self::Hired => "hired",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
            Self::Archived => "archived",
        }
    }

    /// Parse a raw status. Case-insensitive, surrounding whitespace ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
    }

    /// Lane this status renders in
    pub fn column(self) -> ColumnKey {
        match self {
            Self::New | Self::Shortlisted => ColumnKey::New,
            Self::Applied | Self::Screening => ColumnKey::Applied,
            Self::Interviewing => ColumnKey::Interviewing,
            Self::Offer | Self::Hired => ColumnKey::Offer,
            Self::Rejected | Self::Withdrawn | Self::Archived => ColumnKey::Closed,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
