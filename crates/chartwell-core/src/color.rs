//! Color handling for Chartwell charts
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, and the hue-stepping generator used to give series
//! and pie slices distinct colors.
//!
//! # Generated colors
//!
//! Generated colors are a pure function of an index and a total count:
//! the hue is `index * 360 / total` degrees (modulo 360), with fixed
//! saturation ([`GENERATED_SATURATION`]) and lightness
//! ([`GENERATED_LIGHTNESS`]).
//!
//! ```
//! use chartwell_core::color::{Color, hue_step};
//!
//! assert_eq!(hue_step(1, 2), 180.0);
//! let second = Color::generated(1, 2);
//! assert_eq!(second, Color::hsl(180.0, 70.0, 50.0));
//! ```

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{AlphaColor, DynamicColor, Hsl, Srgb};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Saturation (percent) of every generated color.
pub const GENERATED_SATURATION: f32 = 70.0;

/// Lightness (percent) of every generated color.
pub const GENERATED_LIGHTNESS: f32 = 50.0;

/// Returns the hue, in degrees, of the generated color at `index` out of `total`.
///
/// The hue circle is divided evenly: `hue = index * 360 / total mod 360`.
/// A `total` of zero yields a hue of `0.0`.
pub fn hue_step(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (index as f64 * 360.0 / total as f64) % 360.0
}

/// Wrapper around the `DynamicColor` type from the color crate
/// This provides convenience methods for working with colors in Chartwell
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use chartwell_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Creates an opaque color in the HSL color space.
    ///
    /// # Arguments
    ///
    /// * `hue` - Hue angle in degrees
    /// * `saturation` - Saturation in percent (0-100)
    /// * `lightness` - Lightness in percent (0-100)
    pub fn hsl(hue: f64, saturation: f32, lightness: f32) -> Self {
        let hsl = AlphaColor::<Hsl>::new([hue as f32, saturation, lightness, 1.0]);
        Self {
            color: DynamicColor::from_alpha_color(hsl),
        }
    }

    /// Creates a color from 8-bit sRGB channels and an alpha value.
    pub fn srgba(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        let srgb = AlphaColor::<Srgb>::new([
            f32::from(red) / 255.0,
            f32::from(green) / 255.0,
            f32::from(blue) / 255.0,
            alpha,
        ]);
        Self {
            color: DynamicColor::from_alpha_color(srgb),
        }
    }

    /// Returns the generated color for position `index` out of `total`.
    ///
    /// See [`hue_step`] for the hue formula.
    pub fn generated(index: usize, total: usize) -> Self {
        Self::hsl(
            hue_step(index, total),
            GENERATED_SATURATION,
            GENERATED_LIGHTNESS,
        )
    }

    /// Creates a new color with the specified alpha (transparency) value.
    ///
    /// # Arguments
    ///
    /// * `alpha` - The alpha value to set, typically between 0.0 (fully transparent)
    ///   and 1.0 (fully opaque)
    ///
    /// # Examples
    ///
    /// ```
    /// use chartwell_core::color::Color;
    ///
    /// let red = Color::new("red").unwrap();
    /// let semi_transparent_red = red.with_alpha(0.5);
    /// assert_eq!(semi_transparent_red.alpha(), 0.5);
    /// ```
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha (transparency) component of this color.
    ///
    /// The alpha value is between 0.0 (fully transparent) and 1.0 (fully opaque).
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}
