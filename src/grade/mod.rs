//! Difficulty labels and the two grading taxonomies found in the logbook.
//!
//! A label is parsed once into a [`Grade`]. Both the [`Category`] used to
//! split the table and the [`SortKey`] used to order chart legends are derived
//! from that single parse, so the two can never disagree about a label.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::warn;

static NUMERIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)([+-]?)$").expect("numeric grade pattern is valid")
});

static ALPHA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([0-9]+)([a-z]+)$").expect("alpha grade pattern is valid")
});

/// Taxonomy a difficulty label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    /// Digits with an optional `+` or `-`, e.g. `5`, `5+`, `6-`.
    NumericGroup,
    /// Digits followed by letters, e.g. `4a`, `6b`.
    AlphaGroup,
    /// Anything else.
    Unknown,
}

impl Category {
    /// All categories in a fixed order.
    pub const ALL: [Category; 3] = [
        Category::NumericGroup,
        Category::AlphaGroup,
        Category::Unknown,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::NumericGroup => write!(f, "Numeric Group"),
            Category::AlphaGroup => write!(f, "Alpha Group"),
            Category::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Trailing modifier of a numeric grade. Variant order is the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suffix {
    Minus,
    Plain,
    Plus,
}

impl Suffix {
    fn from_marker(marker: &str) -> Self {
        match marker {
            "+" => Suffix::Plus,
            "-" => Suffix::Minus,
            _ => Suffix::Plain,
        }
    }

    /// Signed code of the suffix: `-1`, `0` or `+1`.
    pub fn code(self) -> i8 {
        match self {
            Suffix::Minus => -1,
            Suffix::Plain => 0,
            Suffix::Plus => 1,
        }
    }
}

/// A difficulty label parsed into its taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grade {
    Numeric { value: u64, suffix: Suffix },
    Alpha { value: u64, letters: String },
    Unknown { raw: String },
    /// The label has a recognised shape but its number does not fit a `u64`.
    Unrankable { category: Category, raw: String },
}

impl Grade {
    /// Parses a label. Anchored patterns are tried numeric first, then alpha.
    pub fn parse(label: &str) -> Self {
        if let Some(caps) = NUMERIC_PATTERN.captures(label) {
            return match caps[1].parse::<u64>() {
                Ok(value) => Grade::Numeric {
                    value,
                    suffix: Suffix::from_marker(&caps[2]),
                },
                Err(_) => Grade::Unrankable {
                    category: Category::NumericGroup,
                    raw: label.to_string(),
                },
            };
        }

        if let Some(caps) = ALPHA_PATTERN.captures(label) {
            return match caps[1].parse::<u64>() {
                Ok(value) => Grade::Alpha {
                    value,
                    letters: caps[2].to_string(),
                },
                Err(_) => Grade::Unrankable {
                    category: Category::AlphaGroup,
                    raw: label.to_string(),
                },
            };
        }

        Grade::Unknown {
            raw: label.to_string(),
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Grade::Numeric { .. } => Category::NumericGroup,
            Grade::Alpha { .. } => Category::AlphaGroup,
            Grade::Unknown { .. } => Category::Unknown,
            Grade::Unrankable { category, .. } => *category,
        }
    }

    /// Ordering key for the grade, or `None` when no key can be derived.
    pub fn sort_key(&self) -> Option<SortKey> {
        match self {
            Grade::Numeric { value, suffix } => Some(SortKey::Ranked {
                value: *value,
                tail: Tail::Suffix(suffix.code()),
            }),
            Grade::Alpha { value, letters } => Some(SortKey::Ranked {
                value: *value,
                tail: Tail::Letters(letters.to_lowercase()),
            }),
            Grade::Unknown { raw } => Some(SortKey::Unranked(raw.clone())),
            Grade::Unrankable { .. } => None,
        }
    }
}

/// Part of a ranked key that breaks ties between equal grade numbers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tail {
    /// Suffix code: `-1` for `-`, `0` for none, `+1` for `+`.
    Suffix(i8),
    Letters(String),
}

/// Total order over labels of either taxonomy.
///
/// Ranked keys compare by number, then by suffix or letters. Every unranked
/// key sorts after every ranked one, alphabetically among themselves.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SortKey {
    Ranked { value: u64, tail: Tail },
    Unranked(String),
}

/// Classifies a label by its shape.
pub fn classify(label: &str) -> Category {
    Grade::parse(label).category()
}

/// Derives the ordering key of a label.
///
/// Labels that match a grade pattern but whose number cannot be represented
/// are reported and yield `None` instead of aborting the caller's sort.
pub fn sort_key(label: &str) -> Option<SortKey> {
    let key = Grade::parse(label).sort_key();
    if key.is_none() {
        warn!(label, "grade number out of range, no sort key derived");
    }
    key
}

/// Returns the distinct labels in legend order.
///
/// Keyed labels come first in key order, with the raw text as tie-break so that
/// e.g. `05` and `5` keep a stable relative order. Labels without a key follow,
/// alphabetically.
pub fn sort_labels<'a, I>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let distinct: BTreeSet<&str> = labels.into_iter().collect();

    let mut keyed: Vec<(SortKey, &str)> = Vec::with_capacity(distinct.len());
    let mut unkeyed: Vec<&str> = Vec::new();
    for label in distinct {
        match sort_key(label) {
            Some(key) => keyed.push((key, label)),
            None => unkeyed.push(label),
        }
    }

    keyed.sort_by(|(lhs_key, lhs), (rhs_key, rhs)| match lhs_key.cmp(rhs_key) {
        Ordering::Equal => lhs.cmp(rhs),
        other => other,
    });

    keyed
        .into_iter()
        .map(|(_, label)| label)
        .chain(unkeyed)
        .map(str::to_string)
        .collect()
}
