//! Filtering and sorting of a crewmate snapshot.
//!
//! Everything here is pure: the same snapshot, parameters and `now` always
//! yield the same visible set.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::crewmate::Crewmate;
use crate::stats::Aggregates;

/// Creation-time window of the analytics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    /// Last 7 days.
    #[serde(rename = "7d")]
    Week,
    /// Last 30 days.
    #[serde(rename = "30d")]
    Month,
    /// Last 90 days.
    #[serde(rename = "90d")]
    Quarter,
    /// No bound.
    #[default]
    #[serde(rename = "all")]
    All,
}

impl TimeRange {
    /// Window length in days, or `None` when unbounded.
    #[must_use]
    pub fn days(self) -> Option<i64> {
        match self {
            Self::Week => Some(7),
            Self::Month => Some(30),
            Self::Quarter => Some(90),
            Self::All => None,
        }
    }

    /// Number of days charted by the daily creation trend.
    ///
    /// The unbounded range charts the last year.
    #[must_use]
    pub fn trend_days(self) -> i64 {
        self.days().unwrap_or(365)
    }

    /// Earliest creation time kept by this range.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.days().map(|d| now - Duration::days(d))
    }

    /// Check whether a crewmate falls inside the window.
    #[must_use]
    pub fn contains(self, crewmate: &Crewmate, now: DateTime<Utc>) -> bool {
        self.cutoff(now).map_or(true, |cutoff| crewmate.created_at >= cutoff)
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Quarter => "90d",
            Self::All => "all",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7d" | "7" | "week" => Ok(Self::Week),
            "30d" | "30" | "month" => Ok(Self::Month),
            "90d" | "90" | "quarter" => Ok(Self::Quarter),
            "all" => Ok(Self::All),
            other => Err(format!("unknown time range '{other}' (expected 7d, 30d, 90d or all)")),
        }
    }
}

/// The gallery's category filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Keep everything.
    #[default]
    All,
    /// Keep favorites only.
    Favorites,
    /// Keep crewmates whose stored color equals this one exactly.
    Color(String),
}

impl CategoryFilter {
    /// Check whether a crewmate passes the filter.
    #[must_use]
    pub fn matches(&self, crewmate: &Crewmate) -> bool {
        match self {
            Self::All => true,
            Self::Favorites => crewmate.is_favorite,
            Self::Color(color) => crewmate.color == *color,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Favorites => f.write_str("favorites"),
            Self::Color(color) => f.write_str(color),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "all" => Self::All,
            "favorites" => Self::Favorites,
            color => Self::Color(color.to_string()),
        })
    }
}

/// Sort order of the visible set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most recently created first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// Alphabetical by name.
    Name,
    /// Fastest first.
    Speed,
}

impl SortKey {
    /// Compare two crewmates under this key. Ties compare equal.
    #[must_use]
    pub fn compare(self, a: &Crewmate, b: &Crewmate) -> Ordering {
        match self {
            Self::Newest => b.created_at.cmp(&a.created_at),
            Self::Oldest => a.created_at.cmp(&b.created_at),
            Self::Name => compare_names(&a.name, &b.name),
            Self::Speed => b.speed.cmp(&a.speed),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Name => "name",
            Self::Speed => "speed",
        })
    }
}

/// Case-insensitive comparison with a case-sensitive tie-break.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Everything that shapes the visible set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewParams {
    /// Creation-time window.
    pub time_range: TimeRange,
    /// Favorites / color filter.
    pub filter: CategoryFilter,
    /// Free-text name search.
    pub search: String,
    /// Sort order.
    pub sort: SortKey,
}

impl ViewParams {
    /// Parameters with the given sort and no filtering.
    #[must_use]
    pub fn sorted_by(sort: SortKey) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    /// Check whether the name matches the search text.
    ///
    /// A blank search matches everything.
    #[must_use]
    pub fn matches_search(&self, crewmate: &Crewmate) -> bool {
        let query = self.search.trim();
        query.is_empty()
            || crewmate
                .name
                .to_lowercase()
                .contains(&query.to_lowercase())
    }

    /// Check whether a crewmate passes every filter.
    #[must_use]
    pub fn keeps(&self, crewmate: &Crewmate, now: DateTime<Utc>) -> bool {
        self.time_range.contains(crewmate, now)
            && self.filter.matches(crewmate)
            && self.matches_search(crewmate)
    }

    /// Filter and sort a snapshot.
    ///
    /// Filters apply in order: time range, category, search. The sort is
    /// stable, so ties keep their snapshot order.
    #[must_use]
    pub fn apply<'a, C: Borrow<Crewmate>>(
        &self,
        all: &'a [C],
        now: DateTime<Utc>,
    ) -> Vec<&'a Crewmate> {
        let mut visible: Vec<&Crewmate> = all
            .iter()
            .map(Borrow::borrow)
            .filter(|c| self.time_range.contains(c, now))
            .filter(|c| self.filter.matches(c))
            .filter(|c| self.matches_search(c))
            .collect();
        visible.sort_by(|a, b| self.sort.compare(a, b));
        visible
    }
}

/// A computed view: the visible set and its aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionView {
    /// Filtered and sorted crewmates.
    pub visible: Vec<Crewmate>,
    /// Aggregates over the visible set.
    pub aggregates: Aggregates,
}

impl CollectionView {
    /// Compute the view of `all` under `params`.
    #[must_use]
    pub fn compute<C: Borrow<Crewmate>>(
        all: &[C],
        params: &ViewParams,
        now: DateTime<Utc>,
    ) -> Self {
        let visible: Vec<Crewmate> = params.apply(all, now).into_iter().cloned().collect();
        let aggregates = Aggregates::compute(&visible, params.time_range, now);
        Self {
            visible,
            aggregates,
        }
    }
}
