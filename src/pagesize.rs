//! Paper sizes for [Page](crate::Page) templates, as (width, height) in
//! portrait orientation.

use crate::units::*;

pub type PageSize = (Pt, Pt);

pub const LETTER: PageSize = (Pt(612.0), Pt(792.0));
pub const LEGAL: PageSize = (Pt(612.0), Pt(1008.0));
pub const TABLOID: PageSize = (Pt(792.0), Pt(1224.0));

const MM: f32 = 72.0 / 25.4;

pub const A3: PageSize = (Pt(297.0 * MM), Pt(420.0 * MM));
pub const A4: PageSize = (Pt(210.0 * MM), Pt(297.0 * MM));
pub const A5: PageSize = (Pt(148.0 * MM), Pt(210.0 * MM));

pub trait PageOrientation {
    fn portrait(self) -> Self;
    fn landscape(self) -> Self;
}

impl PageOrientation for PageSize {
    fn portrait(self) -> PageSize {
        (self.0.min(self.1), self.0.max(self.1))
    }

    fn landscape(self) -> PageSize {
        (self.0.max(self.1), self.0.min(self.1))
    }
}
