use pdf_flow::layout::{Align, Breaking, Paragraph, ParagraphOptions, Spacer};
use pdf_flow::pagesize;
use pdf_flow::{Document, Margins, Page, Pt, State, StyleChange, SyntheticFont};
use std::rc::Rc;

fn main() {
    env_logger::init();

    let body = State::new(Rc::new(SyntheticFont::new("F0", 0.5)), Pt(10.0));
    let mut doc = Document::new(body);

    doc.push(
        Paragraph::plain(lipsum::lipsum_title())
            .with_style(StyleChange::new().size(Pt(16.0)))
            .with_options(ParagraphOptions::default().with_breaking(Breaking::Greedy)),
    );
    for words in [40, 120, 300, 80, 500] {
        doc.push(Spacer::new(Pt(8.0)));
        doc.push(
            Paragraph::plain(lipsum::lipsum(words))
                .with_options(ParagraphOptions::default().with_align(Align::Justified)),
        );
    }

    // add a 0.5in gutter on the inside edge
    let margins = Margins::all(Pt(36.0));
    let pages = doc.pages(move |index| {
        Some(Page::with_columns(
            pagesize::A5,
            margins.with_gutter(Pt(36.0), index),
            2,
            Pt(12.0),
        ))
    });

    for page in pages {
        match page {
            Ok(page) => println!("page {}: {} bytes of content", page.index + 1, page.content.len()),
            Err(e) => {
                eprintln!("layout failed: {e}");
                std::process::exit(1);
            }
        }
    }
}
