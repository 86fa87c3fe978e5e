/*
 *  color.rs
 *
 *  micviz - directional mic debug view
 *  (c) 2020-26 Stuart Hunter
 *
 *  Palette shared by the clock face, overlay and chart
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use embedded_graphics::pixelcolor::Rgb888;

/// Universal color value, converted per target at draw time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
    Red,
    Green,
    Blue,
    /// Light gray used for chart grid lines
    Grid,
    /// Arbitrary 24-bit color
    Rgb(u8, u8, u8),
}

impl Color {
    /// Power series line
    pub const POWER: Color = Color::Rgb(0xed, 0xc2, 0x40);
    /// Noise floor series line
    pub const NOISE_FLOOR: Color = Color::Rgb(0xaf, 0xd8, 0xf8);

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Color::Black => (0x00, 0x00, 0x00),
            Color::White => (0xff, 0xff, 0xff),
            Color::Red => (0xff, 0x00, 0x00),
            Color::Green => (0x00, 0xff, 0x00),
            Color::Blue => (0x00, 0x00, 0xff),
            Color::Grid => (0xdd, 0xdd, 0xdd),
            Color::Rgb(r, g, b) => (*r, *g, *b),
        }
    }

    pub fn to_rgb888(&self) -> Rgb888 {
        let (r, g, b) = self.rgb();
        Rgb888::new(r, g, b)
    }

    /// CSS hex notation, e.g. `#edc240`
    pub fn css_hex(&self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl From<Color> for Rgb888 {
    fn from(c: Color) -> Self {
        c.to_rgb888()
    }
}
