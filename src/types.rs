//! Contains various types needed across the crate.

use palette::{cast::ComponentsAs, Srgb, Srgba};
use std::fmt::Display;
use thiserror::Error;

/// The error type returned by fallible palette, ranking, and extraction functions.
///
/// None of these errors are transient: the crate performs no I/O,
/// so every error is the direct result of the input given by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The palette is empty, has duplicate codes, or has a malformed/inconsistent color.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),
    /// A pixel coordinate was outside the image bounds,
    /// or a pixel buffer did not match its stated dimensions.
    #[error("invalid pixel: {0}")]
    InvalidPixel(String),
    /// An option value was out of its valid range (e.g., `k == 0`).
    #[error("invalid options: {0}")]
    InvalidOptions(&'static str),
    /// Extraction was stopped early through a cancellation flag.
    #[error("extraction was cancelled")]
    Cancelled,
}

/// A reference color in a [`Palette`](crate::Palette).
///
/// Colors are immutable once created. The `code` is the stable identifier of the color
/// and must be unique within a palette.
///
/// # Examples
/// ```
/// # use colorfinder::{Color, MatchError};
/// # fn main() -> Result<(), MatchError> {
/// let red = Color::new("003", "Scarlet Red", 255, 36, 0);
/// assert_eq!(red.hex(), "#FF2400");
///
/// let same = Color::from_hex("003", "Scarlet Red", "#ff2400")?;
/// assert_eq!(red, same);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "PascalCase", try_from = "ColorRecord")
)]
pub struct Color {
    /// The unique identifier of the color.
    code: String,
    /// The human readable name.
    name: String,
    /// The `#RRGGBB` form of the color.
    hex: String,
    /// The red component.
    r: u8,
    /// The green component.
    g: u8,
    /// The blue component.
    b: u8,
}

impl Color {
    /// Creates a new [`Color`] from its components, deriving the hex string.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, r: u8, g: u8, b: u8) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            hex: to_hex(r, g, b),
            r,
            g,
            b,
        }
    }

    /// Creates a new [`Color`] from a `#RRGGBB` or `RRGGBB` hex string (case-insensitive).
    ///
    /// The stored hex string is normalized to uppercase with a leading `#`.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidPalette`] if `hex` is not six hex digits.
    pub fn from_hex(
        code: impl Into<String>,
        name: impl Into<String>,
        hex: &str,
    ) -> Result<Self, MatchError> {
        let code = code.into();
        let [r, g, b] = parse_hex(hex).ok_or_else(|| {
            MatchError::InvalidPalette(format!("color {code} has malformed hex {hex:?}"))
        })?;
        Ok(Self::new(code, name, r, g, b))
    }

    /// The unique identifier of this color.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The human readable name of this color.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `#RRGGBB` form of this color.
    #[must_use]
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// The red component.
    #[must_use]
    pub const fn r(&self) -> u8 {
        self.r
    }

    /// The green component.
    #[must_use]
    pub const fn g(&self) -> u8 {
        self.g
    }

    /// The blue component.
    #[must_use]
    pub const fn b(&self) -> u8 {
        self.b
    }

    /// Returns this color as an [`Srgb<u8>`].
    #[must_use]
    pub const fn srgb(&self) -> Srgb<u8> {
        Srgb::new(self.r, self.g, self.b)
    }

    /// Checks that the stored hex string agrees with the stored components.
    pub(crate) fn check_hex(&self) -> Result<(), MatchError> {
        match parse_hex(&self.hex) {
            Some(rgb) if rgb == [self.r, self.g, self.b] => Ok(()),
            Some(_) => Err(MatchError::InvalidPalette(format!(
                "color {} has hex {} which does not match ({}, {}, {})",
                self.code, self.hex, self.r, self.g, self.b
            ))),
            None => Err(MatchError::InvalidPalette(format!(
                "color {} has malformed hex {:?}",
                self.code, self.hex
            ))),
        }
    }
}

/// The serialized form of a [`Color`], before its hex string is checked and normalized.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ColorRecord {
    /// The unique identifier of the color.
    code: String,
    /// The human readable name.
    name: String,
    /// The hex string as written in the record.
    hex: String,
    /// The red component.
    r: u8,
    /// The green component.
    g: u8,
    /// The blue component.
    b: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<ColorRecord> for Color {
    type Error = MatchError;

    fn try_from(record: ColorRecord) -> Result<Self, Self::Error> {
        let ColorRecord { code, name, hex, r, g, b } = record;
        let color = Self::from_hex(code, name, &hex)?;
        if color.srgb() == Srgb::new(r, g, b) {
            Ok(color)
        } else {
            Err(MatchError::InvalidPalette(format!(
                "color {} has hex {hex} which does not match ({r}, {g}, {b})",
                color.code
            )))
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.code, self.name, self.hex)
    }
}

/// Formats the given components as `#RRGGBB`.
fn to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// Parses `#RRGGBB` or `RRGGBB` into its components.
fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }

    let mut rgb = [0; 3];
    for (c, i) in rgb.iter_mut().zip((0..6).step_by(2)) {
        *c = u8::from_str_radix(digits.get(i..(i + 2))?, 16).ok()?;
    }
    Some(rgb)
}

/// A palette color paired with its distance to a query color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    /// The matched palette color.
    pub color: &'a Color,
    /// The distance between the query and `color` under the ranker's metric.
    ///
    /// This is always non-negative.
    pub distance: f32,
}

/// The result of ranking a query color against a palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking<'a> {
    /// The closest palette color.
    pub best: Match<'a>,
    /// The next closest palette colors in ascending order of distance.
    ///
    /// This never contains a color with the same code as `best`.
    pub rest: Vec<Match<'a>>,
}

impl<'a> Ranking<'a> {
    /// Returns an iterator over `best` followed by `rest`.
    pub fn iter(&self) -> impl Iterator<Item = &Match<'a>> {
        std::iter::once(&self.best).chain(&self.rest)
    }
}

/// A borrowed, flattened RGBA8 pixel buffer of a rendered image.
///
/// This is what a canvas read-back or a decoded image provides:
/// `width * height` pixels in row-major order, 4 bytes per pixel.
///
/// # Examples
/// ```
/// # use colorfinder::{PixelBuffer, PixelSource, MatchError};
/// # use palette::Srgb;
/// # fn main() -> Result<(), MatchError> {
/// let buf = [255, 0, 0, 255, 0, 0, 255, 255];
/// let pixels = PixelBuffer::new(&buf, 2, 1)?;
/// assert_eq!(pixels.pixel(1, 0)?, Srgb::new(0, 0, 255));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBuffer<'a> {
    /// The pixels of the image.
    pixels: &'a [Srgba<u8>],
    /// The width of the image.
    width: u32,
    /// The height of the image.
    height: u32,
}

impl<'a> PixelBuffer<'a> {
    /// Creates a new [`PixelBuffer`] over a flattened RGBA8 buffer.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidPixel`] if `rgba.len() != width * height * 4`.
    pub fn new(rgba: &'a [u8], width: u32, height: u32) -> Result<Self, MatchError> {
        let expected = u64::from(width) * u64::from(height) * 4;
        if rgba.len() as u64 == expected {
            Ok(Self { pixels: rgba.components_as(), width, height })
        } else {
            Err(MatchError::InvalidPixel(format!(
                "buffer of {} bytes does not hold a {width}x{height} RGBA image ({expected} bytes)",
                rgba.len()
            )))
        }
    }

    /// Returns the width of the image.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixels of the image in row-major order.
    #[must_use]
    pub const fn pixels(&self) -> &'a [Srgba<u8>] {
        self.pixels
    }
}
