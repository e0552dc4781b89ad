use anyhow::Context;

use crate::tabula_wrapper::{self, TemplateExtractionMethod};

/// Single threaded implementation of [tabula_wrapper::TabulaExtractor].
///
/// Must be created and run on the thread that attached the [tabula::TabulaEnv].
pub struct SingleThreadedTabulaExtractor<'env> {
    tabula_env: tabula::TabulaEnv<'env>,
}

impl<'env> SingleThreadedTabulaExtractor<'env> {
    /// Creates a [SingleThreadedTabulaExtractor] with the given [tabula::TabulaEnv].
    pub fn new(tabula_env: tabula::TabulaEnv<'env>) -> Self {
        Self { tabula_env }
    }
}

fn to_tabula_extraction_method(method: TemplateExtractionMethod) -> tabula::ExtractionMethod {
    match method {
        TemplateExtractionMethod::Stream => tabula::ExtractionMethod::Basic,
        TemplateExtractionMethod::Guess => tabula::ExtractionMethod::Decide,
        TemplateExtractionMethod::Lattice => tabula::ExtractionMethod::Spreadsheet,
    }
}

impl<'env> tabula_wrapper::TabulaExtractor for SingleThreadedTabulaExtractor<'env> {
    fn extract_tables(
        &self,
        request: tabula_wrapper::TabulaExtractionRequest,
    ) -> anyhow::Result<tabula_wrapper::JsonTableSet> {
        let page_areas = [(
            tabula::ABSOLUTE_AREA_CALCULATION_MODE,
            tabula::Rectangle::from_coords(
                request.area.left,
                request.area.top,
                request.area.right,
                request.area.bottom,
            ),
        )];

        let tabula = self
            .tabula_env
            .configure_tabula(
                Some(&page_areas),
                Some(&[request.page]),
                tabula::OutputFormat::Json,
                false,
                to_tabula_extraction_method(request.method),
                false,
                None,
            )
            .context("configuring Tabula to extract table")?;

        let extracted_file = tempfile::NamedTempFile::new()
            .context("creating temporary file for extracting PDF table data")?;
        tabula
            .parse_document_into(&request.pdf_path, extracted_file.path())
            .context("extracting PDF table data")?;

        serde_json::from_reader(extracted_file).context("parsing extracted PDF table data")
    }
}
