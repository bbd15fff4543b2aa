//! Filter and sort state for the store listing.
//!
//! The address bar is the source of truth: [`FilterState::from_location`]
//! derives the state from a query string and [`FilterState::apply_to`]
//! projects it back. Every filter has exactly one URL parameter and one
//! backend parameter, declared once in [`FILTER_PARAMS`].

use std::fmt;
use std::str::FromStr;

use crate::categories::CategoryId;
use crate::query::Location;
use crate::stores::StoreStatus;
use crate::UnknownVariant;

/// Value written to the URL for a checked boolean filter.
pub const FLAG_ON: &str = "1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Status,
    NameLetter,
    CashbackEnabled,
    Promoted,
    Sharable,
    Sort,
    Category,
}

/// One row of the URL-to-backend parameter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterParam {
    pub key: FilterKey,
    /// Name in the storefront URL.
    pub url: &'static str,
    /// Name in the `GET /stores` request.
    pub backend: &'static str,
}

/// Indexed by `FilterKey as usize`; the order must match the enum.
pub const FILTER_PARAMS: [FilterParam; 7] = [
    FilterParam {
        key: FilterKey::Status,
        url: "status",
        backend: "status",
    },
    FilterParam {
        key: FilterKey::NameLetter,
        url: "name_like",
        backend: "name_like",
    },
    FilterParam {
        key: FilterKey::CashbackEnabled,
        url: "isCashbackEnabled",
        backend: "cashback_enabled",
    },
    FilterParam {
        key: FilterKey::Promoted,
        url: "isPromoted",
        backend: "is_promoted",
    },
    FilterParam {
        key: FilterKey::Sharable,
        url: "isSharable",
        backend: "is_sharable",
    },
    FilterParam {
        key: FilterKey::Sort,
        url: "_sort",
        backend: "_sort",
    },
    FilterParam {
        key: FilterKey::Category,
        url: "cats",
        backend: "cats",
    },
];

impl FilterKey {
    #[must_use]
    pub fn param(self) -> &'static FilterParam {
        &FILTER_PARAMS[self as usize]
    }

    #[must_use]
    pub fn url_param(self) -> &'static str {
        self.param().url
    }

    #[must_use]
    pub fn backend_param(self) -> &'static str {
        self.param().backend
    }
}

/// The three checkbox filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagFilter {
    CashbackEnabled,
    Promoted,
    Sharable,
}

impl FlagFilter {
    pub const ALL: [FlagFilter; 3] = [
        FlagFilter::CashbackEnabled,
        FlagFilter::Promoted,
        FlagFilter::Sharable,
    ];

    #[must_use]
    pub fn key(self) -> FilterKey {
        match self {
            FlagFilter::CashbackEnabled => FilterKey::CashbackEnabled,
            FlagFilter::Promoted => FilterKey::Promoted,
            FlagFilter::Sharable => FilterKey::Sharable,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FlagFilter::CashbackEnabled => "Cashback Enabled",
            FlagFilter::Promoted => "Promoted",
            FlagFilter::Sharable => "Share & Earn",
        }
    }
}

impl FromStr for FlagFilter {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cashback" | "iscashbackenabled" | "cashback_enabled" => Ok(FlagFilter::CashbackEnabled),
            "promoted" | "ispromoted" | "is_promoted" => Ok(FlagFilter::Promoted),
            "sharable" | "issharable" | "is_sharable" | "share" => Ok(FlagFilter::Sharable),
            _ => Err(UnknownVariant {
                kind: "filter",
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    Featured,
    /// Shown to users as "Popularity".
    Clicks,
    Cashback,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Name,
        SortField::Featured,
        SortField::Clicks,
        SortField::Cashback,
    ];

    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Featured => "featured",
            SortField::Clicks => "clicks",
            SortField::Cashback => "cashback",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::Featured => "Featured",
            SortField::Clicks => "Popularity",
            SortField::Cashback => "Cashback",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for SortField {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "featured" => Ok(SortField::Featured),
            "clicks" | "popularity" => Ok(SortField::Clicks),
            "cashback" => Ok(SortField::Cashback),
            _ => Err(UnknownVariant {
                kind: "sort field",
                value: s.to_owned(),
            }),
        }
    }
}

/// Normalizes an alphabet filter letter; only ASCII letters are accepted.
#[must_use]
pub fn normalize_letter(letter: char) -> Option<char> {
    letter
        .is_ascii_alphabetic()
        .then(|| letter.to_ascii_uppercase())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub status: Option<StoreStatus>,
    pub name_letter: Option<char>,
    pub cashback_enabled: bool,
    pub promoted: bool,
    pub sharable: bool,
    pub sort: Option<SortField>,
    pub category: Option<CategoryId>,
}

impl FilterState {
    /// Derives the filter state from a query string.
    ///
    /// Absent or unparseable parameters fall back to their defaults. Boolean
    /// filters are on only when their parameter is exactly `1`.
    #[must_use]
    pub fn from_location(location: &Location) -> Self {
        let get = |key: FilterKey| location.get(key.url_param());
        let flag = |key: FilterKey| get(key) == Some(FLAG_ON);

        Self {
            status: get(FilterKey::Status)
                .and_then(|v| v.parse::<StoreStatus>().ok()),
            name_letter: get(FilterKey::NameLetter).and_then(parse_letter),
            cashback_enabled: flag(FilterKey::CashbackEnabled),
            promoted: flag(FilterKey::Promoted),
            sharable: flag(FilterKey::Sharable),
            sort: get(FilterKey::Sort).and_then(|v| v.parse::<SortField>().ok()),
            category: get(FilterKey::Category).and_then(|v| v.trim().parse::<CategoryId>().ok()),
        }
    }

    /// Builds a query string holding only this state's parameters, in table order.
    #[must_use]
    pub fn to_location(&self) -> Location {
        let mut location = Location::new();
        self.apply_to(&mut location);
        location
    }

    /// Writes every filter parameter into `location`: set when active,
    /// removed otherwise. Unrelated parameters are left untouched.
    pub fn apply_to(&self, location: &mut Location) {
        for param in &FILTER_PARAMS {
            match self.value(param.key) {
                Some(value) => location.set(param.url, value),
                None => location.remove(param.url),
            }
        }
    }

    /// The URL value for `key`, or `None` when the filter is inactive.
    ///
    /// [`StoreStatus::Unknown`] is not a filterable status and never reaches
    /// the URL.
    #[must_use]
    pub fn value(&self, key: FilterKey) -> Option<String> {
        let flag = |on: bool| on.then(|| FLAG_ON.to_owned());
        match key {
            FilterKey::Status => self
                .status
                .filter(|s| *s != StoreStatus::Unknown)
                .map(|s| s.as_wire().to_owned()),
            FilterKey::NameLetter => self.name_letter.map(String::from),
            FilterKey::CashbackEnabled => flag(self.cashback_enabled),
            FilterKey::Promoted => flag(self.promoted),
            FilterKey::Sharable => flag(self.sharable),
            FilterKey::Sort => self.sort.map(|s| s.as_wire().to_owned()),
            FilterKey::Category => self.category.map(|c| c.to_string()),
        }
    }

    #[must_use]
    pub fn flag(&self, filter: FlagFilter) -> bool {
        match filter {
            FlagFilter::CashbackEnabled => self.cashback_enabled,
            FlagFilter::Promoted => self.promoted,
            FlagFilter::Sharable => self.sharable,
        }
    }

    pub fn set_flag(&mut self, filter: FlagFilter, on: bool) {
        match filter {
            FlagFilter::CashbackEnabled => self.cashback_enabled = on,
            FlagFilter::Promoted => self.promoted = on,
            FlagFilter::Sharable => self.sharable = on,
        }
    }

    /// Radio-style toggle: the active letter clears, any other replaces it.
    /// Non-letters are ignored.
    pub fn toggle_letter(&mut self, letter: char) {
        let Some(letter) = normalize_letter(letter) else {
            return;
        };
        self.name_letter = if self.name_letter == Some(letter) {
            None
        } else {
            Some(letter)
        };
    }
}

fn parse_letter(raw: &str) -> Option<char> {
    let mut chars = raw.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => normalize_letter(c),
        _ => None,
    }
}

#[cfg(test)]
#[path = "filters_test.rs"]
mod tests;
