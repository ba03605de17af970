//! CSS gradient builder.
//!
//! A [`Gradient`] holds the color stops and direction for one editing
//! session and renders the matching CSS.

use std::fmt;
use std::str::FromStr;

use crate::color::{parse_hex, random_hex, rgb_to_hex};
use crate::error::{Error, Result};

/// Where a gradient runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GradientDirection {
    /// A `linear-gradient` direction such as `to right` or `135deg`.
    Linear(String),
    /// A circular `radial-gradient`.
    Circle,
}

impl Default for GradientDirection {
    fn default() -> Self {
        GradientDirection::Linear("to right".to_string())
    }
}

impl FromStr for GradientDirection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim() {
            "circle" => GradientDirection::Circle,
            other => GradientDirection::Linear(other.to_string()),
        })
    }
}

/// Ordered color stops plus a direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gradient {
    colors: Vec<String>,
    direction: GradientDirection,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            colors: vec!["#667eea".to_string(), "#764ba2".to_string()],
            direction: GradientDirection::default(),
        }
    }
}

impl Gradient {
    /// Build a gradient from hex stops; each stop is validated and normalized.
    pub fn new<S: AsRef<str>>(colors: &[S], direction: GradientDirection) -> Result<Self> {
        let colors = colors
            .iter()
            .map(|c| parse_hex(c.as_ref()).map(rgb_to_hex))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { colors, direction })
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn direction(&self) -> &GradientDirection {
        &self.direction
    }

    pub fn set_direction(&mut self, direction: GradientDirection) {
        self.direction = direction;
    }

    pub fn push_color(&mut self, hex: &str) -> Result<()> {
        self.colors.push(rgb_to_hex(parse_hex(hex)?));
        Ok(())
    }

    /// Append a random stop and return it.
    pub fn add_random_color(&mut self) -> Result<&str> {
        self.colors.push(random_hex()?);
        Ok(self.colors.last().map(String::as_str).unwrap_or_default())
    }

    pub fn set_color(&mut self, index: usize, hex: &str) -> Result<()> {
        let len = self.colors.len();
        let slot = self
            .colors
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        *slot = rgb_to_hex(parse_hex(hex)?);
        Ok(())
    }

    /// The CSS value, e.g. `linear-gradient(to right, #667eea, #764ba2)`.
    pub fn css_value(&self) -> String {
        let stops = self.colors.join(", ");
        match &self.direction {
            GradientDirection::Circle => format!("radial-gradient(circle, {stops})"),
            GradientDirection::Linear(dir) => format!("linear-gradient({dir}, {stops})"),
        }
    }

    /// A full declaration ready to paste into a stylesheet.
    pub fn css_declaration(&self) -> String {
        format!("background: {};", self.css_value())
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css_declaration())
    }
}
