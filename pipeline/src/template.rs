//! Locates the Tabula template files for each table index within a template directory.


use std::path::{Path, PathBuf};

/// File extension of Tabula templates as saved by the Tabula web application.
pub const DEFAULT_TEMPLATE_EXTENSION: &str = "tabula-template.json";

/// Where the data template for a table index was found.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DataTemplateSource {
    /// A dedicated `{index}_table_data` template.
    Split,
    /// The combined `{index}` template, used when no dedicated data template exists.
    Combined,
}

/// Template file for the data of a table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DataTemplate {
    pub path: PathBuf,
    pub source: DataTemplateSource,
}

/// The template files resolved for a single table index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableTemplates {
    pub index: u32,
    /// Template for extracting the table's name, if any.
    pub name: Option<PathBuf>,
    /// Template for extracting the table's data. The index is skipped if this is `None`.
    pub data: Option<DataTemplate>,
}

/// Directory of Tabula templates named by table index.
///
/// For index `i`, the recognised files are:
/// * `{i}_table_name.{ext}` - template for the table's name,
/// * `{i}_table_data.{ext}` - template for the table's data,
/// * `{i}.{ext}` - template for the table's data when `{i}_table_data.{ext}` does not exist.
#[derive(Clone, Debug)]
pub struct TemplateDir {
    dir: PathBuf,
    extension: String,
}

impl TemplateDir {
    pub fn new<P, S>(dir: P, extension: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path to the name template for `index`, if it exists.
    pub fn name_template(&self, index: u32) -> Option<PathBuf> {
        let path = self.template_path(&format!("{index}_table_name"));
        if path.is_file() {
            Some(path)
        } else {
            log::debug!("Table name template not found: {path:?}");
            None
        }
    }

    /// Returns the data template for `index`, falling back to the combined template.
    pub fn data_template(&self, index: u32) -> Option<DataTemplate> {
        let split_path = self.template_path(&format!("{index}_table_data"));
        if split_path.is_file() {
            return Some(DataTemplate {
                path: split_path,
                source: DataTemplateSource::Split,
            });
        }
        log::debug!("Table data template not found: {split_path:?}");

        let combined_path = self.template_path(&index.to_string());
        if combined_path.is_file() {
            log::debug!("Using fallback template: {combined_path:?}");
            return Some(DataTemplate {
                path: combined_path,
                source: DataTemplateSource::Combined,
            });
        }

        None
    }

    /// Resolves the name and data templates for `index` independently of each other.
    pub fn resolve(&self, index: u32) -> TableTemplates {
        TableTemplates {
            index,
            name: self.name_template(index),
            data: self.data_template(index),
        }
    }

    fn template_path(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}.{}", self.extension))
    }
}
