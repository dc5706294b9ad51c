use crate::{LayoutError, Pt};
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use std::collections::HashMap;
use std::fmt;

/// The measuring and encoding capability the layout engine needs from a font.
///
/// All methods are bound to a font size and, for kerning, to the character
/// that precedes the text (if any), so that fragments can be measured and
/// kerned independently and then joined.
pub trait Typeface {
    /// The name the font is registered under in the page's resource
    /// dictionary, i.e. `F0`
    fn resource_name(&self) -> &str;

    /// The advance width of `text` at `size`, *without* kerning
    fn measure(&self, text: &str, size: Pt) -> Pt;

    /// Kerning adjustments to apply when rendering `text` at `size`, as
    /// `(char offset, adjustment)` pairs ordered by offset. An adjustment at
    /// offset `i` is added to the advance before character `i`; offset 0 kerns
    /// against `prev`. Negative adjustments pull characters closer together.
    fn kern(&self, text: &str, prev: Option<char>, size: Pt) -> Vec<(usize, Pt)>;

    /// Encode `text` into the bytes of a PDF string for this font
    fn encode(&self, text: &str) -> Vec<u8>;
}

/// A parsed TrueType / OpenType font.
///
/// Text is encoded as big-endian 16-bit glyph ids (for use with an
/// `Identity-H` encoded Type0 font), with missing characters mapped to the
/// replacement glyph, then `?`, then glyph 0.
pub struct Font {
    pub face: OwnedFace,
    resource_name: String,
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("resource_name", &self.resource_name)
            .finish_non_exhaustive()
    }
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed. `resource_name` is what the page content refers to
    /// the font as.
    pub fn load<S: ToString>(bytes: Vec<u8>, resource_name: S) -> Result<Font, LayoutError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font {
            face,
            resource_name: resource_name.to_string(),
        })
    }

    fn scaling(&self, size: Pt) -> Pt {
        size / self.face.as_face_ref().units_per_em() as f32
    }

    fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face.as_face_ref().glyph_index(ch).map(|i| i.0)
    }

    fn glyph_or_replacement(&self, ch: char) -> u16 {
        self.glyph_id(ch)
            .or_else(|| self.glyph_id('\u{FFFD}'))
            .or_else(|| self.glyph_id('?'))
            .unwrap_or(0)
    }

    /// Horizontal kerning between two glyphs in font units, taken from the
    /// first horizontal, non-variable `kern` subtable that has an entry for the pair
    fn pair_kerning(&self, left: u16, right: u16) -> Option<i16> {
        let kern = self.face.as_face_ref().tables().kern.as_ref()?;
        kern.subtables
            .into_iter()
            .filter(|st| st.horizontal && !st.variable)
            .find_map(|st| st.glyphs_kerning(GlyphId(left), GlyphId(right)))
    }
}

impl Typeface for Font {
    fn resource_name(&self) -> &str {
        &self.resource_name
    }

    fn measure(&self, text: &str, size: Pt) -> Pt {
        let scaling = self.scaling(size);
        text.chars()
            .map(|ch| self.glyph_or_replacement(ch))
            .map(|gid| {
                scaling
                    * self
                        .face
                        .as_face_ref()
                        .glyph_hor_advance(GlyphId(gid))
                        .unwrap_or_default() as f32
            })
            .sum()
    }

    fn kern(&self, text: &str, prev: Option<char>, size: Pt) -> Vec<(usize, Pt)> {
        let scaling = self.scaling(size);
        let mut previous = prev.map(|ch| self.glyph_or_replacement(ch));
        let mut adjustments = Vec::new();
        for (i, ch) in text.chars().enumerate() {
            let gid = self.glyph_or_replacement(ch);
            if let Some(left) = previous {
                if let Some(k) = self.pair_kerning(left, gid).filter(|&k| k != 0) {
                    adjustments.push((i, scaling * k as f32));
                }
            }
            previous = Some(gid);
        }
        adjustments
    }

    fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .flat_map(|ch| self.glyph_or_replacement(ch).to_be_bytes())
            .collect()
    }
}

/// A font with synthetic metrics: every character advances by the same
/// fraction of the font size unless given its own advance with
/// [SyntheticFont::with_advance], and kerning only comes from pairs registered
/// with [SyntheticFont::with_kerning]. Useful when no font file is available,
/// and for predictable layouts.
///
/// Text is encoded as big-endian UTF-16.
#[derive(Debug, Clone)]
pub struct SyntheticFont {
    resource_name: String,
    advance: f32,
    advances: HashMap<char, f32>,
    kerning: HashMap<(char, char), f32>,
}

impl SyntheticFont {
    /// Create a synthetic font where each character advances by
    /// `advance × size`
    pub fn new<S: ToString>(resource_name: S, advance: f32) -> SyntheticFont {
        SyntheticFont {
            resource_name: resource_name.to_string(),
            advance,
            advances: HashMap::new(),
            kerning: HashMap::new(),
        }
    }

    /// Give `ch` its own advance, as a fraction of the font size
    pub fn with_advance(mut self, ch: char, advance: f32) -> SyntheticFont {
        self.advances.insert(ch, advance);
        self
    }

    /// Register a kerning pair, expressed as a fraction of the font size
    pub fn with_kerning(mut self, left: char, right: char, amount: f32) -> SyntheticFont {
        self.kerning.insert((left, right), amount);
        self
    }
}

impl Typeface for SyntheticFont {
    fn resource_name(&self) -> &str {
        &self.resource_name
    }

    fn measure(&self, text: &str, size: Pt) -> Pt {
        let em: f32 = text
            .chars()
            .map(|ch| self.advances.get(&ch).copied().unwrap_or(self.advance))
            .sum();
        size * em
    }

    fn kern(&self, text: &str, prev: Option<char>, size: Pt) -> Vec<(usize, Pt)> {
        if self.kerning.is_empty() {
            return Vec::new();
        }
        let mut previous = prev;
        let mut adjustments = Vec::new();
        for (i, ch) in text.chars().enumerate() {
            if let Some(amount) = previous.and_then(|left| self.kerning.get(&(left, ch))) {
                adjustments.push((i, size * *amount));
            }
            previous = Some(ch);
        }
        adjustments
    }

    fn encode(&self, text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_be_bytes).collect()
    }
}
