use std::{cell::RefCell, path::Path};

use anyhow::{Result, anyhow};
use googletest::prelude::*;
use test_casing::test_casing;

use super::*;
use crate::table::{Cell, Header, Row};

const TWO_ENTRY_TEMPLATE: &str = r#"[
  {"page": 2, "extraction_method": "lattice", "x1": 52.0, "x2": 541.0, "y1": 88.0, "y2": 155.0,
   "width": 489.0, "height": 67.0},
  {"page": 3, "extraction_method": "guess", "x1": 10.5, "x2": 100.0, "y1": 20.0, "y2": 60.25,
   "width": 89.5, "height": 40.25, "selection_id": "ignored"}
]"#;

const TABULA_OUTPUT: &str = r#"[
  {"extraction_method": "stream", "page_number": 2, "top": 88.0, "left": 52.0,
   "width": 489.0, "height": 67.0, "right": 541.0, "bottom": 155.0,
   "data": [
     [{"top": 0, "left": 0, "width": 0, "height": 0, "text": "Quarter"},
      {"top": 0, "left": 0, "width": 0, "height": 0, "text": "Revenue"}],
     [{"top": 0, "left": 0, "width": 0, "height": 0, "text": "Q1"},
      {"top": 0, "left": 0, "width": 0, "height": 0, "text": "100"}],
     [{"top": 0, "left": 0, "width": 0, "height": 0, "text": "Q2"},
      {"top": 0, "left": 0, "width": 0, "height": 0, "text": ""}]
   ]}
]"#;

struct FakeExtractor {
    requests: RefCell<Vec<TabulaExtractionRequest>>,
    fail_on_page: Option<i32>,
}

impl FakeExtractor {
    fn new() -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            fail_on_page: None,
        }
    }
}

impl TabulaExtractor for FakeExtractor {
    fn extract_tables(&self, request: TabulaExtractionRequest) -> Result<JsonTableSet> {
        let page = request.page;
        self.requests.borrow_mut().push(request);
        if self.fail_on_page == Some(page) {
            return Err(anyhow!("Tabula failed on page {page}"));
        }
        Ok(serde_json::from_str(TABULA_OUTPUT)?)
    }
}

fn write_template(dir: &Path, contents: &str) -> Result<std::path::PathBuf> {
    let path = dir.join("1.tabula-template.json");
    std::fs::write(&path, contents)?;
    Ok(path)
}

#[gtest]
fn test_reads_every_template_entry_in_order() -> Result<()> {
    let tempdir = tempfile::tempdir()?;
    let template_path = write_template(tempdir.path(), TWO_ENTRY_TEMPLATE)?;
    let reader = TemplateTableReader::new(FakeExtractor::new(), ExtractionMode::Template);

    let tables = reader.read_tables(Path::new("in.pdf"), &template_path)?;

    expect_that!(tables.len(), eq(2));
    expect_that!(
        *reader.extractor.requests.borrow(),
        elements_are![
            eq(&TabulaExtractionRequest {
                pdf_path: "in.pdf".into(),
                page: 2,
                area: TemplateArea {
                    left: 52.0,
                    top: 88.0,
                    right: 541.0,
                    bottom: 155.0,
                },
                method: TemplateExtractionMethod::Lattice,
            }),
            eq(&TabulaExtractionRequest {
                pdf_path: "in.pdf".into(),
                page: 3,
                area: TemplateArea {
                    left: 10.5,
                    top: 20.0,
                    right: 100.0,
                    bottom: 60.25,
                },
                method: TemplateExtractionMethod::Guess,
            }),
        ]
    );
    Ok(())
}

const MODE_CASES: [(ExtractionMode, TemplateExtractionMethod); 3] = [
    (ExtractionMode::Stream, TemplateExtractionMethod::Stream),
    (ExtractionMode::Lattice, TemplateExtractionMethod::Lattice),
    (ExtractionMode::Guess, TemplateExtractionMethod::Guess),
];

#[test_casing(3, MODE_CASES)]
fn test_mode_overrides_template_method(
    mode: ExtractionMode,
    expected: TemplateExtractionMethod,
) -> Result<()> {
    let tempdir = tempfile::tempdir()?;
    let template_path = write_template(tempdir.path(), TWO_ENTRY_TEMPLATE)?;
    let reader = TemplateTableReader::new(FakeExtractor::new(), mode);

    reader.read_tables(Path::new("in.pdf"), &template_path)?;

    let methods: Vec<TemplateExtractionMethod> = reader
        .extractor
        .requests
        .borrow()
        .iter()
        .map(|request| request.method)
        .collect();
    assert_that!(methods, elements_are![eq(&expected), eq(&expected)]);
    Ok(())
}

#[gtest]
fn test_converts_tabula_output_to_tables() -> Result<()> {
    let tempdir = tempfile::tempdir()?;
    let template_path = write_template(
        tempdir.path(),
        r#"[{"page": 1, "extraction_method": "stream", "x1": 0, "x2": 1, "y1": 0, "y2": 1,
             "width": 1, "height": 1}]"#,
    )?;
    let reader = TemplateTableReader::new(FakeExtractor::new(), ExtractionMode::default());

    let tables = reader.read_tables(Path::new("in.pdf"), &template_path)?;

    expect_that!(
        tables,
        elements_are![eq(&Table::new(
            vec![Header::from("Quarter"), Header::from("Revenue")],
            vec![
                Row(vec![Cell::from("Q1"), Cell::Number(100.0)]),
                Row(vec![Cell::from("Q2"), Cell::Missing]),
            ],
        ))]
    );
    Ok(())
}

#[gtest]
fn test_extractor_failure_is_reported() -> Result<()> {
    let tempdir = tempfile::tempdir()?;
    let template_path = write_template(tempdir.path(), TWO_ENTRY_TEMPLATE)?;
    let mut extractor = FakeExtractor::new();
    extractor.fail_on_page = Some(3);
    let reader = TemplateTableReader::new(extractor, ExtractionMode::Template);

    let result = reader.read_tables(Path::new("in.pdf"), &template_path);

    expect_that!(
        result,
        err(displays_as(contains_substring("extracting region 1 on page 3")))
    );
    Ok(())
}

#[gtest]
fn test_malformed_template_is_reported() -> Result<()> {
    let tempdir = tempfile::tempdir()?;
    let template_path = write_template(tempdir.path(), r#"{"not": "a template"}"#)?;
    let reader = TemplateTableReader::new(FakeExtractor::new(), ExtractionMode::Stream);

    let result = reader.read_tables(Path::new("in.pdf"), &template_path);

    expect_that!(
        result,
        err(displays_as(contains_substring("parsing Tabula template")))
    );
    expect_that!(*reader.extractor.requests.borrow(), is_empty());
    Ok(())
}

#[gtest]
fn test_extraction_mode_parses_lowercase_names() {
    expect_that!(
        "template".parse::<ExtractionMode>().ok(),
        some(eq(ExtractionMode::Template))
    );
    expect_that!(ExtractionMode::Lattice.to_string(), eq("lattice"));
    expect_true!("sideways".parse::<ExtractionMode>().is_err());
}
