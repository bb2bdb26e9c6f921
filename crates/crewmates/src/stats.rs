//! Aggregate statistics over a set of crewmates.
//!
//! All functions take whatever set the caller has already filtered; none of
//! them look at the full collection.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::crewmate::{Crewmate, CrewmateColor, FALLBACK_HEX};
use crate::view::TimeRange;

/// Histogram bucket for a stored color.
///
/// Ordering follows the palette, with [`ColorBucket::Other`] last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorBucket {
    /// A palette color.
    Known(CrewmateColor),
    /// Any color outside the palette.
    Other,
}

impl ColorBucket {
    /// Bucket for a stored color string.
    #[must_use]
    pub fn of(color: &str) -> Self {
        CrewmateColor::from_name(color).map_or(Self::Other, Self::Known)
    }

    /// Capitalized label.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Known(color) => color.label(),
            Self::Other => "Other".to_string(),
        }
    }

    /// Hex display color.
    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            Self::Known(color) => color.hex(),
            Self::Other => FALLBACK_HEX,
        }
    }
}

impl fmt::Display for ColorBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(color) => write!(f, "{color}"),
            Self::Other => f.write_str("other"),
        }
    }
}

impl Serialize for ColorBucket {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Count of crewmates per color bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColorHistogram(BTreeMap<ColorBucket, usize>);

impl ColorHistogram {
    /// Count colors in a set.
    #[must_use]
    pub fn of<C: Borrow<Crewmate>>(set: &[C]) -> Self {
        let mut counts = BTreeMap::new();
        for c in set {
            *counts.entry(ColorBucket::of(&c.borrow().color)).or_insert(0) += 1;
        }
        Self(counts)
    }

    /// Count for one bucket.
    #[must_use]
    pub fn get(&self, bucket: ColorBucket) -> usize {
        self.0.get(&bucket).copied().unwrap_or(0)
    }

    /// Non-empty buckets in palette order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorBucket, usize)> + '_ {
        self.0.iter().map(|(b, n)| (*b, *n))
    }

    /// The most common bucket; ties go to the earliest in palette order.
    #[must_use]
    pub fn most_popular(&self) -> Option<ColorBucket> {
        let mut best: Option<(ColorBucket, usize)> = None;
        for (bucket, count) in self.iter() {
            if best.map_or(true, |(_, n)| count > n) {
                best = Some((bucket, count));
            }
        }
        best.map(|(bucket, _)| bucket)
    }

    /// Buckets by descending count, palette order within equal counts.
    #[must_use]
    pub fn ranked(&self) -> Vec<(ColorBucket, usize)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Share of `total` held by one bucket, as a whole percentage.
    #[must_use]
    pub fn percentage(&self, bucket: ColorBucket, total: usize) -> u32 {
        percent(self.get(bucket), total)
    }
}

/// Three-way speed grouping used by the statistics page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedTier {
    /// 0 to 33.
    Slow,
    /// 34 to 66.
    Medium,
    /// 67 and up.
    Fast,
}

impl SpeedTier {
    /// All tiers, slowest first.
    pub const ALL: [Self; 3] = [Self::Slow, Self::Medium, Self::Fast];

    /// Tier of a speed.
    #[must_use]
    pub fn of(speed: u8) -> Self {
        match speed {
            0..=33 => Self::Slow,
            34..=66 => Self::Medium,
            _ => Self::Fast,
        }
    }

    /// Label including the range.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Slow => "Slow (0-33)",
            Self::Medium => "Medium (34-66)",
            Self::Fast => "Fast (67-100)",
        }
    }
}

/// Counts per [`SpeedTier`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpeedTiers {
    /// Crewmates at 0 to 33.
    pub slow: usize,
    /// Crewmates at 34 to 66.
    pub medium: usize,
    /// Crewmates at 67 and up.
    pub fast: usize,
}

impl SpeedTiers {
    /// Count tiers in a set.
    #[must_use]
    pub fn of<C: Borrow<Crewmate>>(set: &[C]) -> Self {
        let mut tiers = Self::default();
        for c in set {
            match SpeedTier::of(c.borrow().speed) {
                SpeedTier::Slow => tiers.slow += 1,
                SpeedTier::Medium => tiers.medium += 1,
                SpeedTier::Fast => tiers.fast += 1,
            }
        }
        tiers
    }

    /// Count for one tier.
    #[must_use]
    pub fn get(&self, tier: SpeedTier) -> usize {
        match tier {
            SpeedTier::Slow => self.slow,
            SpeedTier::Medium => self.medium,
            SpeedTier::Fast => self.fast,
        }
    }
}

/// Five-way speed grouping used by the analytics charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedBand {
    /// 0 to 20.
    VerySlow,
    /// 21 to 40.
    Slow,
    /// 41 to 60.
    Medium,
    /// 61 to 80.
    Fast,
    /// 81 to 100.
    VeryFast,
}

impl SpeedBand {
    /// All bands, slowest first.
    pub const ALL: [Self; 5] = [
        Self::VerySlow,
        Self::Slow,
        Self::Medium,
        Self::Fast,
        Self::VeryFast,
    ];

    /// Band of a speed.
    #[must_use]
    pub fn of(speed: u8) -> Self {
        match speed {
            0..=20 => Self::VerySlow,
            21..=40 => Self::Slow,
            41..=60 => Self::Medium,
            61..=80 => Self::Fast,
            _ => Self::VeryFast,
        }
    }

    /// Label including the range.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::VerySlow => "Very Slow (0-20)",
            Self::Slow => "Slow (21-40)",
            Self::Medium => "Medium (41-60)",
            Self::Fast => "Fast (61-80)",
            Self::VeryFast => "Very Fast (81-100)",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::VerySlow => 0,
            Self::Slow => 1,
            Self::Medium => 2,
            Self::Fast => 3,
            Self::VeryFast => 4,
        }
    }
}

/// Counts per [`SpeedBand`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeedBands([usize; 5]);

impl SpeedBands {
    /// Count bands in a set.
    #[must_use]
    pub fn of<C: Borrow<Crewmate>>(set: &[C]) -> Self {
        let mut counts = [0; 5];
        for c in set {
            counts[SpeedBand::of(c.borrow().speed).index()] += 1;
        }
        Self(counts)
    }

    /// Count for one band.
    #[must_use]
    pub fn get(&self, band: SpeedBand) -> usize {
        self.0[band.index()]
    }

    /// `(band, count)` pairs, slowest first.
    pub fn iter(&self) -> impl Iterator<Item = (SpeedBand, usize)> + '_ {
        SpeedBand::ALL.into_iter().map(|b| (b, self.get(b)))
    }
}

impl Serialize for SpeedBands {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Headline numbers for a set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of crewmates.
    pub total: usize,
    /// Mean speed, one decimal place; 0 for an empty set.
    pub average_speed: f64,
    /// Number of favorites.
    pub favorites: usize,
    /// Favorites as a whole percentage of the total.
    pub favorite_percentage: u32,
    /// Number of distinct stored color values.
    pub distinct_colors: usize,
    /// Most common color bucket.
    pub most_popular_color: Option<ColorBucket>,
    /// Crewmates created per day since the oldest, one decimal place.
    pub creation_rate: f64,
}

impl Summary {
    /// Summarize a set as of `now`.
    #[must_use]
    pub fn of<C: Borrow<Crewmate>>(set: &[C], now: DateTime<Utc>) -> Self {
        let total = set.len();
        let favorites = set
            .iter()
            .map(Borrow::borrow)
            .filter(|c: &&Crewmate| c.is_favorite)
            .count();
        Self {
            total,
            average_speed: average_speed(set),
            favorites,
            favorite_percentage: percent(favorites, total),
            distinct_colors: distinct_colors(set),
            most_popular_color: ColorHistogram::of(set).most_popular(),
            creation_rate: creation_rate(set, now),
        }
    }
}

/// One day of the creation trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    /// Calendar day (UTC).
    pub date: NaiveDate,
    /// Crewmates created that day.
    pub count: usize,
}

/// Everything the statistics and analytics views show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    /// Headline numbers.
    pub summary: Summary,
    /// Color distribution.
    pub colors: ColorHistogram,
    /// Three-way speed distribution.
    pub speed_tiers: SpeedTiers,
    /// Five-way speed distribution.
    pub speed_bands: SpeedBands,
    /// Category distribution, for crewmates that have one.
    pub categories: BTreeMap<String, usize>,
    /// Daily creation counts over the range's trend window.
    pub trend: Vec<DailyCount>,
}

impl Aggregates {
    /// Compute every aggregate over an already-filtered set.
    #[must_use]
    pub fn compute<C: Borrow<Crewmate>>(set: &[C], range: TimeRange, now: DateTime<Utc>) -> Self {
        Self {
            summary: Summary::of(set, now),
            colors: ColorHistogram::of(set),
            speed_tiers: SpeedTiers::of(set),
            speed_bands: SpeedBands::of(set),
            categories: category_histogram(set),
            trend: daily_trend(set, range.trend_days(), now),
        }
    }
}

/// Mean speed rounded to one decimal place; 0 for an empty set.
#[must_use]
pub fn average_speed<C: Borrow<Crewmate>>(set: &[C]) -> f64 {
    if set.is_empty() {
        return 0.0;
    }
    let sum: u64 = set.iter().map(|c| u64::from(c.borrow().speed)).sum();
    round1(count_f64(sum) / count_f64(set.len() as u64))
}

/// Number of distinct stored color values.
#[must_use]
pub fn distinct_colors<C: Borrow<Crewmate>>(set: &[C]) -> usize {
    set.iter()
        .map(|c| c.borrow().color.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Crewmates per day since the oldest one, rounded to one decimal place.
///
/// Elapsed days are whole days, at least one.
#[must_use]
pub fn creation_rate<C: Borrow<Crewmate>>(set: &[C], now: DateTime<Utc>) -> f64 {
    let Some(oldest) = set.iter().map(|c| c.borrow().created_at).min() else {
        return 0.0;
    };
    let days = (now - oldest).num_days().max(1);
    round1(count_f64(set.len() as u64) / count_f64(days.unsigned_abs()))
}

/// Daily creation counts from the day `days` before `now` through today.
///
/// The first day is the one holding the window's cutoff, so every crewmate a
/// `days`-long time range keeps lands in some entry. Days without creations
/// are included with a zero count. Crewmates created outside the window are
/// ignored.
#[must_use]
pub fn daily_trend<C: Borrow<Crewmate>>(set: &[C], days: i64, now: DateTime<Utc>) -> Vec<DailyCount> {
    let today = now.date_naive();
    let mut counts: BTreeMap<NaiveDate, usize> = (0..=days.max(0))
        .map(|offset| (today - Duration::days(offset), 0))
        .collect();

    for c in set {
        if let Some(count) = counts.get_mut(&c.borrow().created_on()) {
            *count += 1;
        }
    }

    counts
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

/// Count crewmates per category, skipping those without one.
#[must_use]
pub fn category_histogram<C: Borrow<Crewmate>>(set: &[C]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for c in set {
        if let Some(category) = c.borrow().category.as_deref().filter(|s| !s.is_empty()) {
            *counts.entry(category.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Whole percentage of `part` in `total`; 0 when `total` is 0.
#[must_use]
pub fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let pct = (count_f64(part as u64) * 100.0 / count_f64(total as u64)).round();
    // part <= total, so pct is in 0..=100.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        pct as u32
    }
}

/// Counts stay far below 2^52, so the conversion is exact.
#[allow(clippy::cast_precision_loss)]
fn count_f64(n: u64) -> f64 {
    n as f64
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crewmate::fixtures::{crewmate, favorite, now};

    #[test]
    fn test_color_bucket_of() {
        assert_eq!(ColorBucket::of("red"), ColorBucket::Known(CrewmateColor::Red));
        assert_eq!(ColorBucket::of("teal"), ColorBucket::Other);
        assert_eq!(ColorBucket::Other.hex(), FALLBACK_HEX);
        assert!(ColorBucket::Known(CrewmateColor::Lime) < ColorBucket::Other);
    }

    #[test]
    fn test_color_histogram_buckets_unknown_as_other() {
        let crew = vec![
            crewmate("1", "A1", 10, "red", 0),
            crewmate("2", "B2", 10, "teal", 0),
            crewmate("3", "C3", 10, "magenta", 0),
            crewmate("4", "D4", 10, "red", 0),
        ];
        let hist = ColorHistogram::of(&crew);
        assert_eq!(hist.get(ColorBucket::Known(CrewmateColor::Red)), 2);
        assert_eq!(hist.get(ColorBucket::Other), 2);
        assert_eq!(hist.get(ColorBucket::Known(CrewmateColor::Blue)), 0);
    }

    #[test]
    fn test_most_popular_tie_breaks_by_palette_order() {
        // blue is seen first, but red comes first in the palette.
        let crew = vec![
            crewmate("1", "A1", 10, "blue", 0),
            crewmate("2", "B2", 10, "red", 0),
            crewmate("3", "C3", 10, "blue", 0),
            crewmate("4", "D4", 10, "red", 0),
        ];
        assert_eq!(
            ColorHistogram::of(&crew).most_popular(),
            Some(ColorBucket::Known(CrewmateColor::Red))
        );
    }

    #[test]
    fn test_most_popular_prefers_known_over_other_on_tie() {
        let crew = vec![
            crewmate("1", "A1", 10, "teal", 0),
            crewmate("2", "B2", 10, "lime", 0),
        ];
        assert_eq!(
            ColorHistogram::of(&crew).most_popular(),
            Some(ColorBucket::Known(CrewmateColor::Lime))
        );
    }

    #[test]
    fn test_most_popular_empty() {
        let crew: Vec<Crewmate> = Vec::new();
        assert_eq!(ColorHistogram::of(&crew).most_popular(), None);
    }

    #[test]
    fn test_ranked_colors() {
        let crew = vec![
            crewmate("1", "A1", 10, "green", 0),
            crewmate("2", "B2", 10, "blue", 0),
            crewmate("3", "C3", 10, "green", 0),
            crewmate("4", "D4", 10, "red", 0),
        ];
        let ranked = ColorHistogram::of(&crew).ranked();
        assert_eq!(
            ranked,
            vec![
                (ColorBucket::Known(CrewmateColor::Green), 2),
                (ColorBucket::Known(CrewmateColor::Red), 1),
                (ColorBucket::Known(CrewmateColor::Blue), 1),
            ]
        );
    }

    #[test]
    fn test_speed_tier_boundaries() {
        assert_eq!(SpeedTier::of(0), SpeedTier::Slow);
        assert_eq!(SpeedTier::of(33), SpeedTier::Slow);
        assert_eq!(SpeedTier::of(34), SpeedTier::Medium);
        assert_eq!(SpeedTier::of(66), SpeedTier::Medium);
        assert_eq!(SpeedTier::of(67), SpeedTier::Fast);
        assert_eq!(SpeedTier::of(100), SpeedTier::Fast);
    }

    #[test]
    fn test_speed_band_boundaries() {
        assert_eq!(SpeedBand::of(20), SpeedBand::VerySlow);
        assert_eq!(SpeedBand::of(21), SpeedBand::Slow);
        assert_eq!(SpeedBand::of(40), SpeedBand::Slow);
        assert_eq!(SpeedBand::of(41), SpeedBand::Medium);
        assert_eq!(SpeedBand::of(60), SpeedBand::Medium);
        assert_eq!(SpeedBand::of(61), SpeedBand::Fast);
        assert_eq!(SpeedBand::of(80), SpeedBand::Fast);
        assert_eq!(SpeedBand::of(81), SpeedBand::VeryFast);
        assert_eq!(SpeedBand::of(100), SpeedBand::VeryFast);
    }

    #[test]
    fn test_speed_bands_example() {
        let crew = vec![
            favorite("1", "Forty", 40, "red", 0),
            crewmate("2", "NinetyFive", 95, "blue", 0),
            crewmate("3", "Seventy", 70, "green", 0),
        ];
        let bands = SpeedBands::of(&crew);
        assert_eq!(bands.get(SpeedBand::Fast), 1);
        assert_eq!(bands.get(SpeedBand::VeryFast), 1);
        assert_eq!(bands.get(SpeedBand::Medium), 0);
        assert_eq!(bands.get(SpeedBand::Slow), 1);
        assert_eq!(bands.get(SpeedBand::VerySlow), 0);

        let tiers = SpeedTiers::of(&crew);
        assert_eq!((tiers.slow, tiers.medium, tiers.fast), (0, 1, 2));
    }

    #[test]
    fn test_summary() {
        let crew = vec![
            favorite("1", "Forty", 40, "red", 2),
            crewmate("2", "NinetyFive", 95, "blue", 1),
            crewmate("3", "Seventy", 70, "red", 0),
        ];
        let summary = Summary::of(&crew, now());
        assert_eq!(summary.total, 3);
        assert!((summary.average_speed - 68.3).abs() < f64::EPSILON);
        assert_eq!(summary.favorites, 1);
        assert_eq!(summary.favorite_percentage, 33);
        assert_eq!(summary.distinct_colors, 2);
        assert_eq!(
            summary.most_popular_color,
            Some(ColorBucket::Known(CrewmateColor::Red))
        );
        assert!((summary.creation_rate - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_empty() {
        let crew: Vec<Crewmate> = Vec::new();
        let summary = Summary::of(&crew, now());
        assert_eq!(summary.total, 0);
        assert!(summary.average_speed.abs() < f64::EPSILON);
        assert_eq!(summary.favorite_percentage, 0);
        assert!(summary.creation_rate.abs() < f64::EPSILON);
        assert!(summary.most_popular_color.is_none());
    }

    #[test]
    fn test_creation_rate_uses_at_least_one_day() {
        let crew = vec![
            crewmate("1", "A1", 10, "red", 0),
            crewmate("2", "B2", 10, "red", 0),
            crewmate("3", "C3", 10, "red", 0),
        ];
        assert!((creation_rate(&crew, now()) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_creation_rate_rounds() {
        let crew = vec![
            crewmate("1", "A1", 10, "red", 3),
            crewmate("2", "B2", 10, "red", 0),
        ];
        // 2 / 3 = 0.666...
        assert!((creation_rate(&crew, now()) - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_daily_trend_fills_zero_days() {
        let crew = vec![
            crewmate("1", "A1", 10, "red", 0),
            crewmate("2", "B2", 10, "red", 0),
            crewmate("3", "C3", 10, "red", 2),
            crewmate("4", "D4", 10, "red", 30),
        ];
        let trend = daily_trend(&crew, 7, now());
        assert_eq!(trend.len(), 8);
        assert_eq!(trend[0].date, (now() - Duration::days(7)).date_naive());
        assert_eq!(trend[7].date, now().date_naive());
        assert_eq!(trend[7].count, 2);
        assert_eq!(trend[6].count, 0);
        assert_eq!(trend[5].count, 1);
        assert_eq!(trend.iter().map(|d| d.count).sum::<usize>(), 3);
        assert!(trend.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_daily_trend_empty_set_still_has_days() {
        let crew: Vec<Crewmate> = Vec::new();
        let trend = daily_trend(&crew, 30, now());
        assert_eq!(trend.len(), 31);
        assert!(trend.iter().all(|d| d.count == 0));
    }

    #[test]
    fn test_daily_trend_covers_cutoff_day() {
        let mut edge = crewmate("1", "Edge", 10, "red", 0);
        edge.created_at = now() - Duration::days(6) - Duration::hours(23);
        let mut late = crewmate("2", "Late", 10, "red", 0);
        late.created_at = now() - Duration::days(7) + Duration::minutes(1);
        let crew = vec![edge, late, crewmate("3", "Old", 10, "red", 8)];

        let kept = crew
            .iter()
            .filter(|c| TimeRange::Week.contains(c, now()))
            .count();
        let trend = daily_trend(&crew, TimeRange::Week.trend_days(), now());
        assert_eq!(kept, 2);
        assert_eq!(trend.iter().map(|d| d.count).sum::<usize>(), kept);
    }

    #[test]
    fn test_category_histogram() {
        let mut a = crewmate("1", "A1", 10, "red", 0);
        a.category = Some("Pilot".to_string());
        let mut b = crewmate("2", "B2", 10, "red", 0);
        b.category = Some("Pilot".to_string());
        let mut c = crewmate("3", "C3", 10, "red", 0);
        c.category = Some(String::new());
        let d = crewmate("4", "D4", 10, "red", 0);

        let hist = category_histogram(&[a, b, c, d]);
        assert_eq!(hist.len(), 1);
        assert_eq!(hist.get("Pilot"), Some(&2));
    }

    #[test]
    fn test_summary_counts_favorites_owned_and_borrowed() {
        let crew = vec![
            favorite("1", "A1", 10, "red", 0),
            crewmate("2", "B2", 20, "blue", 0),
            favorite("3", "C3", 30, "red", 1),
        ];
        let borrowed: Vec<&Crewmate> = crew.iter().collect();

        let owned = Summary::of(&crew, now());
        assert_eq!(owned.favorites, 2);
        assert_eq!(owned.favorite_percentage, 67);
        assert_eq!(Summary::of(&borrowed, now()), owned);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(3, 3), 100);
    }

    #[test]
    fn test_aggregates_serialize() {
        let crew = vec![crewmate("1", "A1", 10, "teal", 0)];
        let aggregates = Aggregates::compute(&crew, TimeRange::Week, now());
        let json = serde_json::to_value(&aggregates).unwrap();
        assert_eq!(json["colors"]["other"], 1);
        assert_eq!(json["speed_bands"]["very_slow"], 1);
        assert_eq!(json["trend"].as_array().unwrap().len(), 8);
    }
}
