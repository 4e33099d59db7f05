//! RGB colors and the read-only named palette.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use rand::Rng;
use serde::Deserialize;

/// A color string that is neither a palette name nor `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color {0:?}, expected a palette name or #rrggbb")]
pub struct UnknownColor(pub String);

/// An opaque RGB triple.
///
/// Parses from a palette name (`"pink"`) or a hex triple (`"#ffafaf"`), which
/// is also how config files spell it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const ORANGE: Color = Color::rgb(255, 200, 0);
    pub const PINK: Color = Color::rgb(255, 175, 175);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Look a color up by case-insensitive name.
    pub fn named(name: &str) -> Option<Color> {
        PALETTE.get(name.to_ascii_lowercase().as_str()).copied()
    }

    /// Scale every channel down by `percent`, rounding toward zero.
    pub fn darken(self, percent: u8) -> Self {
        let keep = 100 - u32::from(percent.min(100));
        let scale = |c: u8| (u32::from(c) * keep / 100) as u8;
        Self::rgb(scale(self.red), scale(self.green), scale(self.blue))
    }

    /// A uniformly random color.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::rgb(rng.gen(), rng.gen(), rng.gen())
    }
}

impl FromStr for Color {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hex = s.strip_prefix('#').filter(|h| h.len() == 6 && h.is_ascii());
        if let Some(hex) = hex {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            if let (Ok(r), Ok(g), Ok(b)) = (channel(0), channel(2), channel(4)) {
                return Ok(Color::rgb(r, g, b));
            }
        }
        Color::named(s).ok_or_else(|| UnknownColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = UnknownColor;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.red, self.green, self.blue)
    }
}

lazy_static! {
    /// Named colors, built once on first use and never mutated.
    pub static ref PALETTE: BTreeMap<&'static str, Color> = {
        let mut palette = BTreeMap::new();
        palette.insert("black", Color::BLACK);
        palette.insert("blue", Color::BLUE);
        palette.insert("cyan", Color::CYAN);
        palette.insert("gray", Color::GRAY);
        palette.insert("green", Color::GREEN);
        palette.insert("magenta", Color::MAGENTA);
        palette.insert("orange", Color::ORANGE);
        palette.insert("pink", Color::PINK);
        palette.insert("red", Color::RED);
        palette.insert("white", Color::WHITE);
        palette.insert("yellow", Color::YELLOW);
        palette
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn darken_floors_each_channel() {
        let c = Color::rgb(255, 100, 1).darken(5);
        assert_eq!(c, Color::rgb(242, 95, 0));
    }

    #[test]
    fn repeated_darkening_reaches_black() {
        let mut c = Color::WHITE;
        for _ in 0..200 {
            c = c.darken(5);
        }
        assert_eq!(c, Color::BLACK);
    }

    #[test]
    fn palette_lookup_ignores_case() {
        assert_eq!(Color::named("Pink"), Some(Color::PINK));
        assert_eq!(Color::named("BLACK"), Some(Color::BLACK));
        assert_eq!(Color::named("chartreuse"), None);
    }

    #[test]
    fn parses_names_and_hex_triples() {
        assert_eq!("Yellow".parse::<Color>(), Ok(Color::YELLOW));
        assert_eq!("#ffafaf".parse::<Color>(), Ok(Color::PINK));
        assert_eq!(" #00FF00 ".parse::<Color>(), Ok(Color::GREEN));
        assert_eq!(
            "#12345".parse::<Color>(),
            Err(UnknownColor("#12345".to_string()))
        );
        assert!("#gg0000".parse::<Color>().is_err());
        assert!("chartreuse".parse::<Color>().is_err());
    }

    #[test]
    fn random_is_reproducible_with_a_seed() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(Color::random(&mut a), Color::random(&mut b));
    }
}
