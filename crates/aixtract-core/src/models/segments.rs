//! Pages split into upper and lower segments.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::document::RawFragment;

/// One of the two vertical regions a page is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Segment {
    /// Region above (and including) the split line. Index 0.
    Upper,
    /// Region below the split line. Index 1.
    Lower,
}

impl Segment {
    /// Both segments in index order.
    pub const ALL: [Segment; 2] = [Segment::Upper, Segment::Lower];

    pub fn index(self) -> u8 {
        match self {
            Segment::Upper => 0,
            Segment::Lower => 1,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Segment::Upper),
            1 => Some(Segment::Lower),
            _ => None,
        }
    }
}

impl From<Segment> for u8 {
    fn from(segment: Segment) -> Self {
        segment.index()
    }
}

impl TryFrom<u8> for Segment {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Segment::from_index(index).ok_or_else(|| format!("invalid segment index {}", index))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Upper => write!(f, "0 (upper)"),
            Segment::Lower => write!(f, "1 (lower)"),
        }
    }
}

/// A page's deduplicated fragments partitioned into two ordered segments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageContent {
    #[serde(rename = "0")]
    pub upper: Vec<RawFragment>,
    #[serde(rename = "1")]
    pub lower: Vec<RawFragment>,
}

impl PageContent {
    pub fn new(upper: Vec<RawFragment>, lower: Vec<RawFragment>) -> Self {
        Self { upper, lower }
    }

    pub fn segment(&self, segment: Segment) -> &[RawFragment] {
        match segment {
            Segment::Upper => &self.upper,
            Segment::Lower => &self.lower,
        }
    }

    /// Segments in index order.
    pub fn segments(&self) -> impl Iterator<Item = (Segment, &[RawFragment])> {
        Segment::ALL.into_iter().map(move |s| (s, self.segment(s)))
    }

    /// Total number of fragments across both segments.
    pub fn len(&self) -> usize {
        self.upper.len() + self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upper.is_empty() && self.lower.is_empty()
    }
}

/// Preprocessing output for a whole document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreprocessedDocument {
    pub pages: BTreeMap<u32, PageContent>,
}

impl PreprocessedDocument {
    /// Fragments of every page, upper segment first.
    pub fn fragment_map(&self) -> BTreeMap<u32, Vec<RawFragment>> {
        self.pages
            .iter()
            .map(|(page, content)| {
                let fragments = content
                    .segments()
                    .flat_map(|(_, fragments)| fragments.iter().cloned())
                    .collect();
                (*page, fragments)
            })
            .collect()
    }
}
