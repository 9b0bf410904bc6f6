//! Chart Theme
//! Static styling handed to the renderer: canvas size, background and palette.

use plotters::style::RGBColor;

/// Seaborn "darkgrid" style plot area.
pub const DARKGRID_BACKGROUND: RGBColor = RGBColor(234, 234, 242);
pub const GRID_WHITE: RGBColor = RGBColor(255, 255, 255);

pub const PALETTE: [RGBColor; 3] = [
    RGBColor(229, 9, 20),  // #E50914
    RGBColor(178, 7, 16),  // #B20710
    RGBColor(131, 16, 16), // #831010
];

#[derive(Debug, Clone)]
pub struct ChartTheme {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub grid: RGBColor,
    pub palette: Vec<RGBColor>,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            background: DARKGRID_BACKGROUND,
            grid: GRID_WHITE,
            palette: PALETTE.to_vec(),
        }
    }
}

impl ChartTheme {
    /// Palette color, cycling when `idx` runs past the end.
    pub fn color(&self, idx: usize) -> RGBColor {
        if self.palette.is_empty() {
            return PALETTE[idx % PALETTE.len()];
        }
        self.palette[idx % self.palette.len()]
    }

    pub fn primary(&self) -> RGBColor {
        self.color(0)
    }
}

/// Parse `#RRGGBB` (leading `#` optional).
pub fn parse_hex_color(raw: &str) -> Option<RGBColor> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}
