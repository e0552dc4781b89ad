use std::path::PathBuf;

use anyhow::Result;
use googletest::prelude::*;
use pipeline::batch::DEFAULT_MAX_INDEX;

use super::*;

fn write_file(dir: &Path, filename: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(filename);
    std::fs::write(&path, contents)?;
    Ok(path)
}

#[gtest]
fn test_load_reads_every_key() -> Result<()> {
    let tempdir = tempfile::tempdir()?;
    let path = write_file(
        tempdir.path(),
        "config.yaml",
        "template_dir: templates/old_format\n\
         template_extension: json\n\
         max_index: 12\n\
         output: report.xlsx\n\
         mode: lattice\n\
         tabula_libpath: /opt/tabula.jar\n",
    )?;

    let config = FileConfig::load(&path)?;

    expect_that!(
        config,
        eq(&FileConfig {
            template_dir: Some("templates/old_format".into()),
            template_extension: Some("json".to_string()),
            max_index: Some(12),
            output: Some("report.xlsx".into()),
            mode: Some(ExtractionMode::Lattice),
            tabula_libpath: Some("/opt/tabula.jar".to_string()),
        })
    );
    Ok(())
}

#[gtest]
fn test_load_rejects_unknown_keys() -> Result<()> {
    let tempdir = tempfile::tempdir()?;
    let path = write_file(tempdir.path(), "config.yaml", "max_indx: 3\n")?;

    expect_that!(
        FileConfig::load(&path),
        err(displays_as(contains_substring("parsing configuration file")))
    );
    Ok(())
}

#[gtest]
fn test_command_line_overrides_file() {
    let from_file = FileConfig {
        max_index: Some(12),
        mode: Some(ExtractionMode::Lattice),
        tabula_libpath: Some("/opt/tabula.jar".to_string()),
        ..FileConfig::default()
    };
    let from_args = FileConfig {
        max_index: Some(3),
        output: Some("other.xlsx".into()),
        ..FileConfig::default()
    };

    expect_that!(
        from_file.overridden_by(from_args),
        eq(&FileConfig {
            max_index: Some(3),
            output: Some("other.xlsx".into()),
            mode: Some(ExtractionMode::Lattice),
            tabula_libpath: Some("/opt/tabula.jar".to_string()),
            ..FileConfig::default()
        })
    );
}

#[gtest]
fn test_resolve_applies_defaults() -> Result<()> {
    let tempdir = tempfile::tempdir()?;
    let pdf_path = write_file(tempdir.path(), "statement.pdf", "")?;
    let config = FileConfig {
        tabula_libpath: Some("tabula.jar".to_string()),
        ..FileConfig::default()
    };

    let settings = config.resolve(pdf_path.clone())?;

    expect_that!(settings.batch.max_index, eq(DEFAULT_MAX_INDEX));
    expect_that!(settings.batch.extraction_mode, eq(ExtractionMode::Stream));
    expect_that!(
        settings,
        eq(&ExtractSettings {
            batch: BatchConfig::new(pdf_path, DEFAULT_TEMPLATE_DIR),
            output: DEFAULT_OUTPUT.into(),
            tabula_libpath: "tabula.jar".to_string(),
        })
    );
    Ok(())
}

#[gtest]
fn test_resolve_fails_for_missing_pdf() -> Result<()> {
    let tempdir = tempfile::tempdir()?;
    let config = FileConfig {
        tabula_libpath: Some("tabula.jar".to_string()),
        ..FileConfig::default()
    };

    let result = config.resolve(tempdir.path().join("missing.pdf"));

    expect_that!(
        result,
        err(displays_as(contains_substring("PDF file not found")))
    );
    Ok(())
}

#[gtest]
fn test_resolve_rejects_zero_max_index() -> Result<()> {
    let tempdir = tempfile::tempdir()?;
    let pdf_path = write_file(tempdir.path(), "statement.pdf", "")?;
    let config = FileConfig {
        max_index: Some(0),
        tabula_libpath: Some("tabula.jar".to_string()),
        ..FileConfig::default()
    };

    let result = config.resolve(pdf_path);

    expect_true!(matches!(result, Err(ConfigError::InvalidMaxIndex(0))));
    Ok(())
}

#[gtest]
fn test_resolve_requires_tabula_libpath() -> Result<()> {
    let tempdir = tempfile::tempdir()?;
    let pdf_path = write_file(tempdir.path(), "statement.pdf", "")?;

    let result = FileConfig::default().resolve(pdf_path);

    expect_true!(matches!(result, Err(ConfigError::MissingTabulaLibpath)));
    Ok(())
}
