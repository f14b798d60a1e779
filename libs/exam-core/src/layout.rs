//! Reader for the layout-extraction tool's positioned-text XML dump.
//!
//! `pdftohtml -xml` emits `<page height=".." width="..">` elements whose
//! `<text top=".." left="..">` children carry the character runs in
//! reading order, possibly wrapped in inline markup (`<b>`, `<i>`).
//! Positions are normalized here to fractions of the page size so the
//! state machine can reason about layout without knowing page
//! dimensions.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{PipelineError, Result};

/// One text run with its position as fractions of the page size.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub top: f64,
    pub left: f64,
}

/// An ordered sequence of text runs on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub runs: Vec<TextRun>,
}

/// Parse the XML dump produced by the layout-extraction tool.
pub fn parse_layout(xml: &str) -> Result<Vec<Page>> {
    let mut reader = Reader::from_str(xml);
    let mut pages: Vec<Page> = Vec::new();
    // (height, width) of the page currently open
    let mut page_size: Option<(f64, f64)> = None;
    // (top, left, accumulated text) of the run currently open
    let mut run: Option<(f64, f64, String)> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| PipelineError::Layout(err.to_string()))?;
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"page" => {
                    let height = require_attr(&e, "height")?;
                    let width = require_attr(&e, "width")?;
                    if height <= 0.0 || width <= 0.0 {
                        return Err(PipelineError::Layout(format!(
                            "page {} has a degenerate size {}x{}",
                            pages.len() + 1,
                            width,
                            height
                        )));
                    }
                    page_size = Some((height, width));
                    pages.push(Page::default());
                }
                b"text" => {
                    let top = require_attr(&e, "top")?;
                    let left = require_attr(&e, "left")?;
                    run = Some((top, left, String::new()));
                }
                // inline markup inside a run contributes only its text
                _ => {}
            },
            Event::Text(e) => {
                if let Some((_, _, text)) = run.as_mut() {
                    let chunk = e
                        .unescape()
                        .map_err(|err| PipelineError::Layout(err.to_string()))?;
                    text.push_str(&chunk);
                }
            }
            Event::End(e) if e.name().as_ref() == b"text" => {
                if let Some((top, left, text)) = run.take() {
                    let (height, width) = page_size.ok_or_else(|| {
                        PipelineError::Layout("text run outside of any page".to_string())
                    })?;
                    let page = pages.last_mut().ok_or_else(|| {
                        PipelineError::Layout("text run outside of any page".to_string())
                    })?;
                    page.runs.push(TextRun {
                        text,
                        top: top / height,
                        left: left / width,
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(pages)
}

fn require_attr(element: &BytesStart<'_>, name: &str) -> Result<f64> {
    let tag = String::from_utf8_lossy(element.name().as_ref()).into_owned();
    let attr = element
        .try_get_attribute(name)
        .map_err(|err| PipelineError::Layout(err.to_string()))?
        .ok_or_else(|| PipelineError::Layout(format!("<{tag}> is missing its {name} attribute")))?;
    let value = String::from_utf8_lossy(&attr.value).into_owned();
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| PipelineError::Layout(format!("<{tag}> has a bad {name} attribute {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<pdf2xml producer="poppler" version="22.02.0">
<page number="1" position="absolute" top="0" left="0" height="1000" width="800">
<text top="100" left="40" width="30" height="20" font="0">105</text>
<text top="100" left="120" width="20" height="20" font="0">O</text>
<text top="100" left="200" width="400" height="20" font="1"><b>騎機車</b>要戴安全帽</text>
</page>
<page number="2" position="absolute" top="0" left="0" height="500" width="400">
<text top="250" left="100" width="40" height="20" font="0">A &amp; B</text>
</page>
</pdf2xml>
"#;

    #[test]
    fn parses_pages_and_normalizes_positions() {
        let pages = parse_layout(SAMPLE).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].runs.len(), 3);
        assert_eq!(pages[0].runs[0].text, "105");
        assert_eq!(pages[0].runs[0].top, 0.1);
        assert_eq!(pages[0].runs[0].left, 0.05);
        assert_eq!(pages[1].runs[0].top, 0.5);
        assert_eq!(pages[1].runs[0].left, 0.25);
    }

    #[test]
    fn nested_markup_contributes_only_text() {
        let pages = parse_layout(SAMPLE).unwrap();
        assert_eq!(pages[0].runs[2].text, "騎機車要戴安全帽");
    }

    #[test]
    fn entities_are_unescaped() {
        let pages = parse_layout(SAMPLE).unwrap();
        assert_eq!(pages[1].runs[0].text, "A & B");
    }

    #[test]
    fn missing_position_attribute_is_fatal() {
        let xml = r#"<page height="10" width="10"><text top="1">x</text></page>"#;
        let err = parse_layout(xml).unwrap_err();
        assert!(matches!(err, PipelineError::Layout(msg) if msg.contains("left")));
    }

    #[test]
    fn degenerate_page_size_is_fatal() {
        let xml = r#"<page height="0" width="10"></page>"#;
        assert!(parse_layout(xml).is_err());
    }

    #[test]
    fn text_outside_a_page_is_fatal() {
        let xml = r#"<pdf2xml><text top="1" left="1">x</text></pdf2xml>"#;
        assert!(parse_layout(xml).is_err());
    }
}
