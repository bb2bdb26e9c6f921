//! Core crewmate types.
//!
//! This module defines the crewmate record, the fixed color palette, and the
//! form-boundary input types used to create and update crewmates.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, FieldError, FieldErrors, Result};

/// Minimum length of a crewmate name after trimming.
pub const MIN_NAME_LEN: usize = 2;

/// Highest allowed speed.
pub const MAX_SPEED: u8 = 100;

/// Display color used for colors outside the palette.
pub const FALLBACK_HEX: &str = "#3f474e";

/// One of the twelve crewmate colors.
///
/// Declaration order is the canonical palette order; it is used wherever a
/// deterministic ordering over colors is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrewmateColor {
    /// Red.
    Red,
    /// Blue.
    Blue,
    /// Green.
    Green,
    /// Pink.
    Pink,
    /// Orange.
    Orange,
    /// Yellow.
    Yellow,
    /// Black.
    Black,
    /// White.
    White,
    /// Purple.
    Purple,
    /// Brown.
    Brown,
    /// Cyan.
    Cyan,
    /// Lime.
    Lime,
}

impl CrewmateColor {
    /// The full palette in canonical order.
    pub const ALL: [Self; 12] = [
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Pink,
        Self::Orange,
        Self::Yellow,
        Self::Black,
        Self::White,
        Self::Purple,
        Self::Brown,
        Self::Cyan,
        Self::Lime,
    ];

    /// The stored name of this color.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Pink => "pink",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Black => "black",
            Self::White => "white",
            Self::Purple => "purple",
            Self::Brown => "brown",
            Self::Cyan => "cyan",
            Self::Lime => "lime",
        }
    }

    /// Look up a palette color by its stored name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Hex display color.
    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            Self::Red => "#c51111",
            Self::Blue => "#1919c7",
            Self::Green => "#00b04f",
            Self::Pink => "#ee54bb",
            Self::Orange => "#f07c1d",
            Self::Yellow => "#f5f557",
            Self::Black => "#3f474e",
            Self::White => "#d6e0f0",
            Self::Purple => "#6b2fbb",
            Self::Brown => "#71491e",
            Self::Cyan => "#38fedc",
            Self::Lime => "#50ef39",
        }
    }

    /// Capitalized label, e.g. `Red`.
    #[must_use]
    pub fn label(self) -> String {
        capitalize(self.as_str())
    }
}

impl fmt::Display for CrewmateColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a palette color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color '{0}' (expected one of: red, blue, green, pink, orange, yellow, black, white, purple, brown, cyan, lime)")]
pub struct ParseColorError(pub String);

impl FromStr for CrewmateColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_name(&s.trim().to_lowercase()).ok_or_else(|| ParseColorError(s.to_string()))
    }
}

/// Hex display color for any stored color string.
///
/// Colors outside the palette get [`FALLBACK_HEX`].
#[must_use]
pub fn display_hex(color: &str) -> &'static str {
    CrewmateColor::from_name(color).map_or(FALLBACK_HEX, CrewmateColor::hex)
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Opaque crewmate identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrewmateId(String);

impl CrewmateId {
    /// Generate a fresh, time-ordered identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CrewmateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<String> for CrewmateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for CrewmateId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for CrewmateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A stored crewmate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crewmate {
    /// Unique identifier.
    pub id: CrewmateId,

    /// Display name.
    pub name: String,

    /// Speed in `0..=100`.
    pub speed: u8,

    /// Color name. Normally a palette color, but tolerated otherwise.
    pub color: String,

    /// Optional free-text category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Optional free-text success metric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_metric: Option<String>,

    /// Whether the crewmate is marked as a favorite.
    #[serde(default)]
    pub is_favorite: bool,

    /// When the crewmate was created.
    pub created_at: DateTime<Utc>,

    /// When the crewmate was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Crewmate {
    /// The palette color, if the stored color is one.
    #[must_use]
    pub fn known_color(&self) -> Option<CrewmateColor> {
        CrewmateColor::from_name(&self.color)
    }

    /// Hex display color, falling back for unknown colors.
    #[must_use]
    pub fn display_hex(&self) -> &'static str {
        display_hex(&self.color)
    }

    /// Calendar day (UTC) on which the crewmate was created.
    #[must_use]
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// The editable fields of this crewmate as a draft.
    #[must_use]
    pub fn to_draft(&self) -> CrewmateDraft {
        CrewmateDraft {
            name: self.name.clone(),
            speed: self.speed,
            color: self.color.clone(),
            category: self.category.clone(),
            success_metric: self.success_metric.clone(),
            is_favorite: self.is_favorite,
        }
    }
}

/// Input for creating a crewmate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewmateDraft {
    /// Display name.
    pub name: String,
    /// Speed in `0..=100`.
    pub speed: u8,
    /// Color name.
    pub color: String,
    /// Optional category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Optional success metric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_metric: Option<String>,
    /// Initial favorite flag.
    #[serde(default)]
    pub is_favorite: bool,
}

impl Default for CrewmateDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            speed: 50,
            color: CrewmateColor::Red.as_str().to_string(),
            category: None,
            success_metric: None,
            is_favorite: false,
        }
    }
}

impl CrewmateDraft {
    /// Create a draft with the required fields set.
    #[must_use]
    pub fn new(name: impl Into<String>, speed: u8, color: CrewmateColor) -> Self {
        Self {
            name: name.into(),
            speed,
            color: color.as_str().to_string(),
            ..Self::default()
        }
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the favorite flag.
    #[must_use]
    pub fn favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    /// Validate the draft at the form boundary.
    ///
    /// All failing fields are reported together.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] listing every invalid field.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if let Some(e) = check_name(&self.name) {
            errors.push(e);
        }
        if let Some(e) = check_speed(self.speed) {
            errors.push(e);
        }
        if let Some(e) = check_color(&self.color) {
            errors.push(e);
        }
        finish(errors)
    }
}

/// Partial update of a crewmate. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrewmatePatch {
    /// New name.
    pub name: Option<String>,
    /// New speed.
    pub speed: Option<u8>,
    /// New color.
    pub color: Option<String>,
    /// New category; `Some(None)` clears it.
    pub category: Option<Option<String>>,
    /// New success metric; `Some(None)` clears it.
    pub success_metric: Option<Option<String>>,
    /// New favorite flag.
    pub is_favorite: Option<bool>,
}

impl CrewmatePatch {
    /// A patch that only sets the favorite flag.
    #[must_use]
    pub fn favorite(is_favorite: bool) -> Self {
        Self {
            is_favorite: Some(is_favorite),
            ..Self::default()
        }
    }

    /// Check whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Validate the fields present in the patch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] listing every invalid field.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if let Some(e) = self.name.as_deref().and_then(check_name) {
            errors.push(e);
        }
        if let Some(e) = self.speed.and_then(check_speed) {
            errors.push(e);
        }
        if let Some(e) = self.color.as_deref().and_then(check_color) {
            errors.push(e);
        }
        finish(errors)
    }

    /// Apply the patch to a crewmate in memory.
    pub fn apply_to(&self, crewmate: &mut Crewmate) {
        if let Some(name) = &self.name {
            crewmate.name.clone_from(name);
        }
        if let Some(speed) = self.speed {
            crewmate.speed = speed;
        }
        if let Some(color) = &self.color {
            crewmate.color.clone_from(color);
        }
        if let Some(category) = &self.category {
            crewmate.category.clone_from(category);
        }
        if let Some(metric) = &self.success_metric {
            crewmate.success_metric.clone_from(metric);
        }
        if let Some(fav) = self.is_favorite {
            crewmate.is_favorite = fav;
        }
    }
}

fn check_name(name: &str) -> Option<FieldError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Some(FieldError::new("name", "Name is required"))
    } else if trimmed.chars().count() < MIN_NAME_LEN {
        Some(FieldError::new(
            "name",
            format!("Name must be at least {MIN_NAME_LEN} characters"),
        ))
    } else {
        None
    }
}

fn check_speed(speed: u8) -> Option<FieldError> {
    (speed > MAX_SPEED).then(|| {
        FieldError::new("speed", format!("Speed must be between 0 and {MAX_SPEED}"))
    })
}

fn check_color(color: &str) -> Option<FieldError> {
    if color.is_empty() {
        Some(FieldError::new("color", "Color is required"))
    } else if CrewmateColor::from_name(color).is_none() {
        Some(FieldError::new("color", format!("Unknown color '{color}'")))
    } else {
        None
    }
}

fn finish(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(FieldErrors(errors)))
    }
}
