use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 10 caractères — sortie nette, du plus dense au plus clair.
pub const CHARSET_CLEAN: &str = "@#%*+=-:. ";

/// 11 caractères — bon contraste, une nuance de plus que `CHARSET_CLEAN`.
pub const CHARSET_BALANCED: &str = "@%#*+=-:,. ";

/// Palette ordonnée de caractères, du plus dense ("@") au plus clair (" ").
///
/// # Example
/// ```
/// use sg_core::charset::Palette;
/// let p = Palette::clean();
/// assert_eq!(p.len(), 10);
/// assert_eq!(p.get(0), '@');
/// assert_eq!(p.get(9), ' ');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    chars: Vec<char>,
}

impl Palette {
    /// The 10-character "clean" palette.
    #[must_use]
    pub fn clean() -> Self {
        Self {
            chars: CHARSET_CLEAN.chars().collect(),
        }
    }

    /// The 11-character "balanced" palette.
    #[must_use]
    pub fn balanced() -> Self {
        Self {
            chars: CHARSET_BALANCED.chars().collect(),
        }
    }

    /// Number of characters (N).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false: both palettes hold at least 10 characters.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character at `index`, clamped to the last entry.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> char {
        self.chars[index.min(self.chars.len() - 1)]
    }

    /// `true` if `ch` belongs to the palette.
    #[must_use]
    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }
}

/// Méthode de quantification luminance → index de palette.
///
/// # Example
/// ```
/// use sg_core::charset::Method;
/// assert_eq!(Method::lenient("simple"), Method::Simple);
/// assert_eq!(Method::lenient("n'importe quoi"), Method::Balanced);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Gamma 0.85 puis mapping linéaire.
    #[default]
    Balanced,
    /// Mapping linéaire direct `p * N / 256`.
    Simple,
}

impl Method {
    /// Lowercase name used in config files and on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Simple => "simple",
        }
    }

    /// Palette paired with this method.
    ///
    /// `simple` uses the clean palette, `balanced` the 11-character one.
    #[must_use]
    pub fn palette(self) -> Palette {
        match self {
            Self::Balanced => Palette::balanced(),
            Self::Simple => Palette::clean(),
        }
    }

    /// Parse a user-supplied name, falling back to `Balanced`.
    ///
    /// An empty string is the menu's "accept default" answer and is not logged.
    #[must_use]
    pub fn lenient(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::Balanced;
        }
        trimmed.parse().unwrap_or_else(|e| {
            log::warn!("{e}, utilisation de 'balanced'");
            Self::Balanced
        })
    }
}

impl FromStr for Method {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balanced" => Ok(Self::Balanced),
            "simple" => Ok(Self::Simple),
            other => Err(CoreError::InvalidInput(format!("méthode inconnue '{other}'"))),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_have_expected_lengths() {
        assert_eq!(Palette::clean().len(), 10);
        assert_eq!(Palette::balanced().len(), 11);
    }

    #[test]
    fn palettes_run_dense_to_light() {
        for p in [Palette::clean(), Palette::balanced()] {
            assert_eq!(p.get(0), '@');
            assert_eq!(p.get(p.len() - 1), ' ');
        }
    }

    #[test]
    fn get_clamps_out_of_range_index() {
        let p = Palette::clean();
        assert_eq!(p.get(500), ' ');
    }

    #[test]
    fn method_parsing() {
        assert_eq!("BALANCED".parse::<Method>().ok(), Some(Method::Balanced));
        assert_eq!(" simple ".parse::<Method>().ok(), Some(Method::Simple));
        assert!("fast".parse::<Method>().is_err());
        assert_eq!(Method::lenient(""), Method::Balanced);
        assert_eq!(Method::lenient("fast"), Method::Balanced);
    }

    #[test]
    fn method_selects_palette() {
        assert_eq!(Method::Simple.palette(), Palette::clean());
        assert_eq!(Method::Balanced.palette(), Palette::balanced());
    }
}
