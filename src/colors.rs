//! Stock color tables, the hue wheel and the multi-color presets.
//!
//! Values are PWM duty cycles out of 255 calibrated against the stock blade.
//! The red channel of stock colors is already reduced to match the series
//! diode the stock hardware uses on that channel.

use crate::types::{COLORS_PER_TABLE, Palette};
use palette::Srgb;

/// All segments dark.
pub const BLACK: Srgb<u8> = Srgb::new(0, 0, 0);

/// Full white, used by the color picker's white sentinel.
pub const WHITE: Srgb<u8> = Srgb::new(255, 255, 255);

/// Colors the stock blade is able to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StockColor {
    White,
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    DarkPurple,
    FlashWhite,
    FlashYellow,
    FlashOrange,
}

impl StockColor {
    /// The calibrated RGB value for this color.
    pub const fn rgb(self) -> Srgb<u8> {
        match self {
            StockColor::White => Srgb::new(88, 112, 112),
            StockColor::Red => Srgb::new(255, 0, 0),
            StockColor::Orange => Srgb::new(200, 102, 0),
            StockColor::Yellow => Srgb::new(120, 152, 0),
            StockColor::Green => Srgb::new(0, 255, 0),
            StockColor::Cyan => Srgb::new(0, 152, 152),
            StockColor::Blue => Srgb::new(0, 0, 255),
            StockColor::Purple => Srgb::new(120, 0, 152),
            StockColor::DarkPurple => Srgb::new(16, 0, 32),
            StockColor::FlashWhite => Srgb::new(104, 128, 128),
            StockColor::FlashYellow => Srgb::new(208, 255, 0),
            StockColor::FlashOrange => Srgb::new(208, 64, 0),
        }
    }
}

use StockColor::*;

const SAVI: [StockColor; COLORS_PER_TABLE as usize] = [
    White, Red, Orange, Yellow, Green, Cyan, Blue, Purple, DarkPurple, Red, Orange, Yellow,
    Green, Cyan, Blue, Purple,
];

const SAVI_CLASH: [StockColor; COLORS_PER_TABLE as usize] = [
    FlashYellow, // white
    FlashOrange, // red
    FlashWhite,  // orange
    FlashWhite,  // yellow
    FlashYellow, // green
    FlashWhite,  // cyan
    FlashWhite,  // blue
    FlashWhite,  // purple
    FlashOrange, // dark purple
    FlashYellow, // red
    FlashWhite,  // orange
    FlashWhite,  // yellow
    FlashYellow, // green
    FlashWhite,  // cyan
    FlashWhite,  // blue
    FlashWhite,  // purple
];

const LEGACY: [StockColor; COLORS_PER_TABLE as usize] = [
    Yellow, // temple guard
    Red,    // kylo ren
    Blue,   // rey
    Purple, // mace windu
    Red,    // ventress
    White,  // ahsoka
    Green,  // luke
    Red,    // vader
    Red,    // maul
    Blue,   // obi-wan
    White, White, White, White, White, White,
];

const LEGACY_CLASH: [StockColor; COLORS_PER_TABLE as usize] = [
    FlashWhite, FlashYellow, FlashWhite, FlashWhite, FlashWhite, FlashYellow, FlashYellow,
    FlashYellow, FlashYellow, FlashWhite, FlashYellow, FlashYellow, FlashYellow, FlashYellow,
    FlashYellow, FlashYellow,
];

/// One of the four fixed 16-entry lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorTable {
    Savi,
    SaviClash,
    Legacy,
    LegacyClash,
}

impl ColorTable {
    /// The table's entries.
    pub const fn entries(self) -> &'static [StockColor; COLORS_PER_TABLE as usize] {
        match self {
            ColorTable::Savi => &SAVI,
            ColorTable::SaviClash => &SAVI_CLASH,
            ColorTable::Legacy => &LEGACY,
            ColorTable::LegacyClash => &LEGACY_CLASH,
        }
    }

    /// Looks up an entry; the index wraps at the table size.
    pub const fn lookup(self, index: u8) -> StockColor {
        self.entries()[(index % COLORS_PER_TABLE) as usize]
    }
}

impl Palette {
    /// The table holding this palette's normal colors.
    pub const fn table(self) -> ColorTable {
        match self {
            Palette::Savi => ColorTable::Savi,
            Palette::Legacy => ColorTable::Legacy,
        }
    }

    /// The table holding this palette's clash flash colors.
    pub const fn clash_table(self) -> ColorTable {
        match self {
            Palette::Savi => ColorTable::SaviClash,
            Palette::Legacy => ColorTable::LegacyClash,
        }
    }
}

/// Maps one byte onto the red → green → blue color wheel.
///
/// Incrementing `hue` walks the wheel smoothly: 0 is pure red, 85 pure green
/// and 170 pure blue, with complementary ramps in between.
pub const fn color_by_hue(hue: u8) -> Srgb<u8> {
    if hue < 85 {
        let up = hue * 3;
        Srgb::new(255 - up, up, 0)
    } else if hue < 170 {
        let up = (hue - 85) * 3;
        Srgb::new(0, 255 - up, up)
    } else {
        let up = (hue - 170) * 3;
        Srgb::new(up, 0, 255 - up)
    }
}

/// Fixed per-segment color presets for multi-color mode, segment 0 first.
pub static MULTI_COLOR_PRESETS: [[Srgb<u8>; 4]; 9] = [
    // rocket popsicle
    [
        Srgb::new(0, 255, 0),
        Srgb::new(0, 0, 255),
        Srgb::new(255, 255, 255),
        Srgb::new(255, 0, 0),
    ],
    // red to orange
    [
        Srgb::new(255, 0, 0),
        Srgb::new(224, 16, 0),
        Srgb::new(224, 32, 0),
        Srgb::new(192, 64, 0),
    ],
    // orange to green
    [
        Srgb::new(192, 144, 0),
        Srgb::new(128, 176, 0),
        Srgb::new(64, 224, 0),
        Srgb::new(0, 255, 0),
    ],
    // light to dark purple
    [
        Srgb::new(112, 0, 224),
        Srgb::new(72, 0, 144),
        Srgb::new(48, 0, 96),
        Srgb::new(32, 0, 64),
    ],
    // light to dark orange
    [
        Srgb::new(224, 112, 0),
        Srgb::new(144, 72, 0),
        Srgb::new(96, 48, 0),
        Srgb::new(64, 32, 0),
    ],
    // green to white
    [
        Srgb::new(0, 255, 0),
        Srgb::new(32, 224, 32),
        Srgb::new(64, 192, 64),
        Srgb::new(96, 128, 96),
    ],
    // red to white
    [
        Srgb::new(255, 0, 0),
        Srgb::new(224, 32, 32),
        Srgb::new(192, 64, 64),
        Srgb::new(128, 96, 96),
    ],
    // blue to white
    [
        Srgb::new(0, 0, 255),
        Srgb::new(32, 32, 224),
        Srgb::new(64, 64, 192),
        Srgb::new(96, 96, 128),
    ],
    // orange to purple
    [
        Srgb::new(192, 64, 0),
        Srgb::new(128, 48, 32),
        Srgb::new(96, 16, 64),
        Srgb::new(48, 0, 96),
    ],
];

/// The preset selected by a submode value, wrapping at the preset count.
pub fn multi_color_preset(submode: u8) -> &'static [Srgb<u8>; 4] {
    &MULTI_COLOR_PRESETS[submode as usize % MULTI_COLOR_PRESETS.len()]
}
