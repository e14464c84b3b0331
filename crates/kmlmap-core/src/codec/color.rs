use crate::codec::{CodecError, Scalar, ScalarTag};
use std::{fmt, str::FromStr};

///
/// Color32
///
/// Packed 32-bit color in KML channel order: alpha, blue, green, red
/// (`aabbggrr` when written as hex).
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Color32(u32);

#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
impl Color32 {
    pub const BLACK: Self = Self::new(0xff, 0, 0, 0);
    pub const TRANSPARENT: Self = Self(0);
    pub const WHITE: Self = Self(0xffff_ffff);

    #[must_use]
    pub const fn new(alpha: u8, blue: u8, green: u8, red: u8) -> Self {
        Self(
            ((alpha as u32) << 24) | ((blue as u32) << 16) | ((green as u32) << 8) | (red as u32),
        )
    }

    #[must_use]
    pub const fn from_abgr(abgr: u32) -> Self {
        Self(abgr)
    }

    #[must_use]
    pub const fn abgr(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[must_use]
    pub const fn blue(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[must_use]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[must_use]
    pub const fn red(self) -> u8 {
        self.0 as u8
    }
}

impl fmt::Display for Color32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl FromStr for Color32 {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if hex.len() != 8 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CodecError::malformed(
                Self::TAG,
                s,
                "expected 8 hexadecimal digits (aabbggrr)",
            ));
        }

        u32::from_str_radix(hex, 16)
            .map(Self)
            .map_err(|err| CodecError::malformed(Self::TAG, s, err))
    }
}

impl Scalar for Color32 {
    const TAG: ScalarTag = ScalarTag::new("color");

    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(text: &str) -> Result<Self, CodecError> {
        text.parse()
    }
}
