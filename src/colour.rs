use pdf_writer::Content;
use serde::{Deserialize, Serialize};

/// The colour text is painted in
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    /// DeviceRGB, components in 0.0..=1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK, components in 0.0..=1.0
    CMYK { c: f32, m: f32, y: f32, k: f32 },
    /// DeviceGray, 0.0 is black
    Grey { g: f32 },
}

impl Default for Colour {
    fn default() -> Self {
        colours::BLACK
    }
}

impl Colour {
    pub fn rgb(r: f32, g: f32, b: f32) -> Colour {
        Colour::RGB { r, g, b }
    }

    pub fn cmyk(c: f32, m: f32, y: f32, k: f32) -> Colour {
        Colour::CMYK { c, m, y, k }
    }

    pub fn grey(g: f32) -> Colour {
        Colour::Grey { g }
    }

    /// Make this the fill colour of `content`. Text is painted with the fill
    /// colour, so a line only emits this when its colour changes.
    pub fn fill(&self, content: &mut Content) {
        match *self {
            Colour::RGB { r, g, b } => content.set_fill_rgb(r, g, b),
            Colour::CMYK { c, m, y, k } => content.set_fill_cmyk(c, m, y, k),
            Colour::Grey { g } => content.set_fill_gray(g),
        };
    }
}

pub mod colours {
    use super::Colour;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const GREY: Colour = Colour::Grey { g: 0.5 };
    pub const RED: Colour = Colour::RGB { r: 1.0, g: 0.0, b: 0.0 };
}
