use chrono::{NaiveDate, NaiveTime};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::db::CompanyRecord;
use crate::error::TrackerError;
use crate::types::slot::{format_date, format_time};

pub const TITLE: &str = "Company Recruitment Information";
pub const MISSING: &str = "N/A";

// US Letter, Courier 12pt.
const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 72;
const FONT_SIZE: i64 = 12;
const LEADING: i64 = 15;
const CHAR_WIDTH: f64 = 0.6 * FONT_SIZE as f64;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportLine {
    pub text: String,
    pub centered: bool,
}

impl ExportLine {
    fn left(text: String) -> Self {
        Self {
            text,
            centered: false,
        }
    }

    fn blank() -> Self {
        Self::left(String::new())
    }
}

/// Title followed by one block per record, in the order given.
pub fn export_lines(records: &[CompanyRecord]) -> Vec<ExportLine> {
    let mut lines = vec![ExportLine {
        text: TITLE.to_string(),
        centered: true,
    }];
    for r in records {
        lines.push(ExportLine::blank());
        lines.push(ExportLine::left(format!(
            "Company: {}",
            or_missing(Some(r.company_name.as_str()))
        )));
        lines.push(ExportLine::left(format!(
            "Pre Placement Talk: {}",
            when(r.pre_talk_date, r.pre_talk_time)
        )));
        lines.push(ExportLine::left(format!(
            "Assessment: {}",
            when(r.assessment_date, r.assessment_time)
        )));
        lines.push(ExportLine::left(format!(
            "Assessment Website: {}",
            or_missing(r.assessment_website.as_deref())
        )));
        lines.push(ExportLine::left(format!(
            "Interview: {}",
            when(r.interview_date, r.interview_time)
        )));
        lines.push(ExportLine::left(format!(
            "Status: {}",
            or_missing(Some(r.status.as_str()))
        )));
    }
    lines
}

fn or_missing(value: Option<&str>) -> &str {
    value.filter(|s| !s.is_empty()).unwrap_or(MISSING)
}

fn when(date: Option<NaiveDate>, time: Option<NaiveTime>) -> String {
    let date = date.map(format_date);
    let time = time.map(format_time);
    format!(
        "{} at {}",
        or_missing(date.as_deref()),
        or_missing(time.as_deref())
    )
}

/// Render the records as a paginated PDF document.
pub fn render_pdf(records: &[CompanyRecord]) -> Result<Vec<u8>, TrackerError> {
    let lines = export_lines(records);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for chunk in lines.chunks(LINES_PER_PAGE) {
        let page_id = add_page(&mut doc, pages_id, chunk)?;
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf)?;
    Ok(buf)
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    lines: &[ExportLine],
) -> Result<ObjectId, TrackerError> {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
    ];
    for (i, line) in lines.iter().enumerate() {
        if line.text.is_empty() {
            continue;
        }
        let text = to_latin_text(&line.text);
        let x = if line.centered {
            let width = text.len() as f64 * CHAR_WIDTH;
            (((PAGE_WIDTH as f64 - width) / 2.0) as i64).max(MARGIN)
        } else {
            MARGIN
        };
        let y = PAGE_HEIGHT - MARGIN - FONT_SIZE - i as i64 * LEADING;
        operations.push(Operation::new(
            "Tm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                1.into(),
                x.into(),
                y.into(),
            ],
        ));
        operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    }))
}

/// The standard Type1 fonts only cover single-byte text.
fn to_latin_text(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Slot;

    fn record(id: i64, name: &str, assessment: Option<&str>, website: Option<&str>) -> CompanyRecord {
        let (assessment_date, assessment_time) =
            Slot::split(Slot::parse_input(assessment, "assessment").unwrap());
        CompanyRecord {
            id,
            user_id: 1,
            company_name: name.to_string(),
            pre_talk_date: None,
            pre_talk_time: None,
            assessment_date,
            assessment_time,
            assessment_website: website.map(str::to_string),
            interview_date: None,
            interview_time: None,
            status: "Applied".to_string(),
        }
    }

    fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
        let doc = Document::load_mem(bytes).expect("valid pdf");
        doc.get_pages()
            .into_values()
            .map(|page_id| {
                let raw = doc.get_page_content(page_id).expect("page content");
                Content::decode(&raw)
                    .expect("decodable content")
                    .operations
                    .into_iter()
                    .filter(|op| op.operator == "Tj")
                    .filter_map(|op| match op.operands.first() {
                        Some(Object::String(bytes, _)) => {
                            Some(String::from_utf8_lossy(bytes).into_owned())
                        }
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn missing_fields_render_placeholder() {
        let lines = export_lines(&[record(1, "Acme", None, None)]);
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            [
                TITLE,
                "",
                "Company: Acme",
                "Pre Placement Talk: N/A at N/A",
                "Assessment: N/A at N/A",
                "Assessment Website: N/A",
                "Interview: N/A at N/A",
                "Status: Applied",
            ]
        );
        assert!(lines[0].centered);
    }

    #[test]
    fn pdf_blocks_follow_record_order() {
        let records = [
            record(2, "First", Some("2024-01-01T09:00"), Some("https://a.example")),
            record(1, "Second", Some("2024-01-02T13:30"), None),
        ];
        let bytes = render_pdf(&records).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let pages = page_texts(&bytes);
        assert_eq!(pages.len(), 1);
        let text = &pages[0];
        assert_eq!(text[0], TITLE);
        let first = text.iter().position(|t| t == "Assessment: 2024-01-01 at 09:00");
        let second = text.iter().position(|t| t == "Assessment: 2024-01-02 at 13:30");
        assert!(first.unwrap() < second.unwrap());
        assert!(text.contains(&"Assessment Website: https://a.example".to_string()));
        assert!(text.contains(&"Assessment Website: N/A".to_string()));
    }

    #[test]
    fn long_exports_span_pages() {
        let records: Vec<_> = (0..20).map(|i| record(i, "Acme", None, None)).collect();
        let bytes = render_pdf(&records).unwrap();
        let pages = page_texts(&bytes);
        assert!(pages.len() > 1);
        let total: usize = pages.iter().map(Vec::len).sum();
        assert_eq!(total, 1 + 20 * 6);
    }

    #[test]
    fn empty_export_has_title_page() {
        let pages = page_texts(&render_pdf(&[]).unwrap());
        assert_eq!(pages, vec![vec![TITLE.to_string()]]);
    }

    #[test]
    fn non_ascii_is_replaced() {
        assert_eq!(to_latin_text("Café"), "Caf?");
    }
}
