//! Contains the reference [`Palette`] that sampled colors are matched against.

use crate::{srgb_to_lab, Color, MatchError};
use palette::Lab;
use std::{collections::HashSet, ops::Deref};

/// An immutable, ordered collection of reference [`Color`]s.
///
/// A [`Palette`] is guaranteed to be non-empty and to have unique color codes.
/// The order of the colors is used to break ties between equally distant colors.
/// The CIELAB value of each color is computed once, when the palette is created.
///
/// A palette is meant to be created once and then shared by reference
/// (e.g., with a [`Ranker`](crate::Ranker)) for the lifetime of the program.
///
/// # Examples
/// ```
/// # use colorfinder::{Color, Palette, MatchError};
/// # fn main() -> Result<(), MatchError> {
/// let palette = Palette::new(vec![
///     Color::new("001", "Bright White", 255, 255, 255),
///     Color::new("002", "Jet Black", 0, 0, 0),
/// ])?;
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.get("002").map(Color::name), Some("Jet Black"));
///
/// assert!(Palette::new(Vec::new()).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Color>", into = "Vec<Color>")
)]
pub struct Palette {
    /// The colors in insertion order.
    colors: Vec<Color>,
    /// The CIELAB value of each color in `colors`.
    labs: Vec<Lab>,
}

impl Palette {
    /// Creates a new [`Palette`] from the given colors.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidPalette`] if `colors` is empty,
    /// if two colors share the same code,
    /// or if the hex string of a color does not match its components.
    pub fn new(colors: Vec<Color>) -> Result<Self, MatchError> {
        if colors.is_empty() {
            return Err(MatchError::InvalidPalette("palette has no colors".to_owned()));
        }

        let mut codes = HashSet::with_capacity(colors.len());
        for color in &colors {
            color.check_hex()?;
            if !codes.insert(color.code()) {
                return Err(MatchError::InvalidPalette(format!(
                    "palette has more than one color with code {}",
                    color.code()
                )));
            }
        }

        let labs = colors.iter().map(|color| srgb_to_lab(color.srgb())).collect();

        Ok(Self { colors, labs })
    }

    /// Returns the 10 color sample palette.
    #[must_use]
    pub fn sample() -> Self {
        let colors = vec![
            Color::new("001", "Bright White", 255, 255, 255),
            Color::new("002", "Jet Black", 0, 0, 0),
            Color::new("003", "Scarlet Red", 255, 36, 0),
            Color::new("004", "Sky Blue", 135, 206, 235),
            Color::new("005", "Lime Green", 50, 205, 50),
            Color::new("006", "Sunshine Yellow", 255, 253, 55),
            Color::new("007", "Royal Purple", 120, 81, 169),
            Color::new("008", "Orange Flame", 255, 103, 0),
            Color::new("009", "Ocean Teal", 0, 128, 128),
            Color::new("010", "Chocolate Brown", 123, 63, 0),
        ];
        let labs = colors.iter().map(|color| srgb_to_lab(color.srgb())).collect();
        Self { colors, labs }
    }

    /// Returns the color with the given code, if any.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Color> {
        self.colors.iter().find(|color| color.code() == code)
    }

    /// Returns the index of the color with the given code, if any.
    #[must_use]
    pub fn position(&self, code: &str) -> Option<usize> {
        self.colors.iter().position(|color| color.code() == code)
    }

    /// Returns the colors of the palette as a slice.
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Returns the cached CIELAB values, parallel to [`Palette::colors`].
    #[must_use]
    pub fn labs(&self) -> &[Lab] {
        &self.labs
    }
}

impl Deref for Palette {
    type Target = [Color];

    fn deref(&self) -> &Self::Target {
        &self.colors
    }
}

impl AsRef<[Color]> for Palette {
    fn as_ref(&self) -> &[Color] {
        self
    }
}

impl TryFrom<Vec<Color>> for Palette {
    type Error = MatchError;

    fn try_from(colors: Vec<Color>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<Color> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}
