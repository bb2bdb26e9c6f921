//! Achievement evaluation.
//!
//! Achievements are derived from the full collection on every call. Nothing
//! is persisted: a rule is unlocked exactly when its condition holds now.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::crewmate::Crewmate;
use crate::stats::distinct_colors;

/// How hard an achievement is to earn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    /// Earned early by everyone.
    Common,
    /// Takes some effort.
    Uncommon,
    /// Takes a sizeable crew.
    Rare,
    /// Takes a full palette.
    Epic,
    /// Takes a very large crew.
    Legendary,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        })
    }
}

/// The condition behind an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// At least this many crewmates.
    CountAtLeast(usize),
    /// At least this many distinct colors.
    DistinctColorsAtLeast(usize),
    /// Some crewmate at or above this speed.
    AnySpeedAtLeast(u8),
    /// Some crewmate at exactly this speed.
    AnySpeedExactly(u8),
    /// At least this many favorites.
    FavoritesAtLeast(usize),
    /// A non-empty crew whose mean speed lies in `low..=high`.
    MeanSpeedBetween(u8, u8),
    /// At least this many crewmates, with no two sharing a name ignoring case.
    UniqueNamesAtLeast(usize),
}

/// Progress toward a rule: `current` out of `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// What the collection has now.
    pub current: usize,
    /// What the rule asks for.
    pub target: usize,
}

impl Rule {
    /// Check the rule against a collection.
    #[must_use]
    pub fn is_satisfied(self, crew: &[Crewmate]) -> bool {
        match self {
            Self::CountAtLeast(n) => crew.len() >= n,
            Self::DistinctColorsAtLeast(n) => distinct_colors(crew) >= n,
            Self::AnySpeedAtLeast(speed) => crew.iter().any(|c| c.speed >= speed),
            Self::AnySpeedExactly(speed) => crew.iter().any(|c| c.speed == speed),
            Self::FavoritesAtLeast(n) => favorites(crew) >= n,
            Self::MeanSpeedBetween(low, high) => {
                // low <= sum/n <= high, kept in integers.
                let n = crew.len() as u64;
                let sum: u64 = crew.iter().map(|c| u64::from(c.speed)).sum();
                n > 0 && sum >= u64::from(low) * n && sum <= u64::from(high) * n
            }
            Self::UniqueNamesAtLeast(n) => {
                crew.len() >= n && unique_lowercase_names(crew) == crew.len()
            }
        }
    }

    /// Display-only progress toward the rule. Never affects scoring.
    #[must_use]
    pub fn progress(self, crew: &[Crewmate]) -> Progress {
        let done = usize::from(self.is_satisfied(crew));
        let (current, target) = match self {
            Self::CountAtLeast(n) => (crew.len(), n),
            Self::DistinctColorsAtLeast(n) => (distinct_colors(crew), n),
            Self::FavoritesAtLeast(n) => (favorites(crew), n),
            Self::UniqueNamesAtLeast(n) => (unique_lowercase_names(crew), n),
            Self::AnySpeedAtLeast(_) | Self::AnySpeedExactly(_) | Self::MeanSpeedBetween(..) => {
                (done, 1)
            }
        };
        Progress {
            current: current.min(target),
            target,
        }
    }
}

fn favorites(crew: &[Crewmate]) -> usize {
    crew.iter().filter(|c| c.is_favorite).count()
}

fn unique_lowercase_names(crew: &[Crewmate]) -> usize {
    crew.iter()
        .map(|c| c.name.to_lowercase())
        .collect::<HashSet<_>>()
        .len()
}

/// A fixed achievement definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// What the player has to do.
    pub description: &'static str,
    /// How hard it is.
    pub rarity: Rarity,
    /// Points awarded when unlocked.
    pub points: u32,
    /// Unlock condition.
    pub rule: Rule,
}

/// Every achievement, in display order.
pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "first_crewmate",
        name: "First Steps",
        description: "Create your first crewmate",
        rarity: Rarity::Common,
        points: 10,
        rule: Rule::CountAtLeast(1),
    },
    Achievement {
        id: "crew_of_five",
        name: "Crew Assembly",
        description: "Build a crew of 5 crewmates",
        rarity: Rarity::Common,
        points: 25,
        rule: Rule::CountAtLeast(5),
    },
    Achievement {
        id: "dozen_crew",
        name: "Squadron Leader",
        description: "Assemble 12 crewmates",
        rarity: Rarity::Uncommon,
        points: 50,
        rule: Rule::CountAtLeast(12),
    },
    Achievement {
        id: "speed_demon",
        name: "Speed Demon",
        description: "Create a crewmate with speed 95 or higher",
        rarity: Rarity::Uncommon,
        points: 30,
        rule: Rule::AnySpeedAtLeast(95),
    },
    Achievement {
        id: "rainbow_collector",
        name: "Rainbow Collector",
        description: "Have crewmates in 8 different colors",
        rarity: Rarity::Rare,
        points: 75,
        rule: Rule::DistinctColorsAtLeast(8),
    },
    Achievement {
        id: "favorite_five",
        name: "Favorites Club",
        description: "Mark 5 crewmates as favorites",
        rarity: Rarity::Uncommon,
        points: 40,
        rule: Rule::FavoritesAtLeast(5),
    },
    Achievement {
        id: "perfectionist",
        name: "Perfectionist",
        description: "Create a crewmate with maximum speed",
        rarity: Rarity::Rare,
        points: 100,
        rule: Rule::AnySpeedExactly(100),
    },
    Achievement {
        id: "fleet_commander",
        name: "Fleet Commander",
        description: "Command a fleet of 25 crewmates",
        rarity: Rarity::Rare,
        points: 150,
        rule: Rule::CountAtLeast(25),
    },
    Achievement {
        id: "color_master",
        name: "Color Master",
        description: "Use all 12 colors",
        rarity: Rarity::Epic,
        points: 200,
        rule: Rule::DistinctColorsAtLeast(12),
    },
    Achievement {
        id: "centurion",
        name: "Centurion",
        description: "Reach 100 crewmates",
        rarity: Rarity::Legendary,
        points: 500,
        rule: Rule::CountAtLeast(100),
    },
    Achievement {
        id: "speed_balance",
        name: "Balanced Force",
        description: "Keep your crew's average speed between 45 and 55",
        rarity: Rarity::Uncommon,
        points: 35,
        rule: Rule::MeanSpeedBetween(45, 55),
    },
    Achievement {
        id: "name_creative",
        name: "Creative Naming",
        description: "Give 10 crewmates unique names",
        rarity: Rarity::Rare,
        points: 80,
        rule: Rule::UniqueNamesAtLeast(10),
    },
];

/// Look up an achievement by id.
#[must_use]
pub fn find(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Player rank, earned from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Rank {
    /// 0 points.
    Rookie,
    /// 50 points.
    SquadronLeader,
    /// 100 points.
    FleetCaptain,
    /// 250 points.
    SpaceAdmiral,
    /// 500 points.
    EliteCommander,
    /// 1000 points.
    LegendaryCaptain,
}

impl Rank {
    /// Ranks with their minimum score, lowest first.
    pub const THRESHOLDS: [(u32, Self); 6] = [
        (0, Self::Rookie),
        (50, Self::SquadronLeader),
        (100, Self::FleetCaptain),
        (250, Self::SpaceAdmiral),
        (500, Self::EliteCommander),
        (1000, Self::LegendaryCaptain),
    ];

    /// The highest rank whose threshold is at most `points`.
    #[must_use]
    pub fn for_points(points: u32) -> Self {
        Self::THRESHOLDS
            .iter()
            .rev()
            .find(|(min, _)| points >= *min)
            .map_or(Self::Rookie, |(_, rank)| *rank)
    }

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Rookie => "Rookie",
            Self::SquadronLeader => "Squadron Leader",
            Self::FleetCaptain => "Fleet Captain",
            Self::SpaceAdmiral => "Space Admiral",
            Self::EliteCommander => "Elite Commander",
            Self::LegendaryCaptain => "Legendary Captain",
        }
    }

    /// The next rank and its threshold, if any.
    #[must_use]
    pub fn next(self) -> Option<(u32, Self)> {
        Self::THRESHOLDS.iter().copied().find(|(_, rank)| *rank > self)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One achievement's state for a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementStatus {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// What the player has to do.
    pub description: &'static str,
    /// How hard it is.
    pub rarity: Rarity,
    /// Points awarded when unlocked.
    pub points: u32,
    /// Whether the condition holds.
    pub unlocked: bool,
    /// Display progress.
    pub progress: Progress,
}

/// The evaluated achievements of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scorecard {
    /// Every achievement in display order.
    pub achievements: Vec<AchievementStatus>,
    /// Sum of unlocked points.
    pub total_points: u32,
    /// `total_points / 100 + 1`.
    pub level: u32,
    /// Rank for `total_points`.
    pub rank: Rank,
}

impl Scorecard {
    /// Number of unlocked achievements.
    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    /// Whether the achievement with this id is unlocked.
    #[must_use]
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id && a.unlocked)
    }
}

/// Evaluate every achievement against the full collection.
#[must_use]
pub fn evaluate(crew: &[Crewmate]) -> Scorecard {
    let achievements: Vec<AchievementStatus> = ACHIEVEMENTS
        .iter()
        .map(|a| AchievementStatus {
            id: a.id,
            name: a.name,
            description: a.description,
            rarity: a.rarity,
            points: a.points,
            unlocked: a.rule.is_satisfied(crew),
            progress: a.rule.progress(crew),
        })
        .collect();

    let total_points = achievements
        .iter()
        .filter(|a| a.unlocked)
        .map(|a| a.points)
        .sum();

    Scorecard {
        achievements,
        total_points,
        level: total_points / 100 + 1,
        rank: Rank::for_points(total_points),
    }
}
