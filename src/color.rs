use core::fmt;

use crate::{Error, Result};

/// Alpha byte prepended to every fill color, about 49% opacity.
pub const FILL_ALPHA: &str = "7d";

/// A KML `aabbggrr` color string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbgrColor(String);

impl AbgrColor {
    /// Converts `#RRGGBB` into `7dBBGGRR`. Hex digits keep their case.
    pub fn from_rgb_hex(rgb: &str) -> Result<Self> {
        let rgb = rgb.trim();
        if rgb.is_empty() {
            return Err(Error::InvalidColorInput("no color provided".to_string()));
        }
        let hex = rgb
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| Error::InvalidColorInput(format!("expected #RRGGBB, got {:?}", rgb)))?;
        let (r, g, b) = (&hex[0..2], &hex[2..4], &hex[4..6]);
        Ok(AbgrColor(format!("{}{}{}{}", FILL_ALPHA, b, g, r)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbgrColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
