//! Colour by grade level.

use console::{style, StyledObject};

/// Broad grade band of a level label such as `"A-"` or `"B+"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Tone {
    pub fn of(level: &str) -> Self {
        match level.chars().next() {
            Some('A') => Tone::Excellent,
            Some('B') => Tone::Good,
            Some('C') => Tone::Fair,
            _ => Tone::Poor,
        }
    }

    pub fn table_color(self) -> comfy_table::Color {
        match self {
            Tone::Excellent => comfy_table::Color::Green,
            Tone::Good => comfy_table::Color::Cyan,
            Tone::Fair => comfy_table::Color::Yellow,
            Tone::Poor => comfy_table::Color::Red,
        }
    }
}

/// `text` coloured by the tone of `level`.
pub fn by_level<D>(text: D, level: &str) -> StyledObject<D> {
    let styled = style(text);
    match Tone::of(level) {
        Tone::Excellent => styled.green(),
        Tone::Good => styled.cyan(),
        Tone::Fair => styled.yellow(),
        Tone::Poor => styled.red(),
    }
}
