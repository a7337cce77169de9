//! Report artifacts: workbook, sectioned delimited text and a printable
//! letterhead document.
//!
//! Every exporter renders the same [`ReportView`] through the same
//! [`tables`] so the totals shown on screen are the totals in every file.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Donation, Due, Expenditure, ExportError, Period, Summary, period::month_name};

mod delimited;
mod document;
pub(crate) mod tables;
mod workbook;

const FILE_PREFIX: &str = "laporan-keuangan";

/// Borrowed snapshot of what is shown on screen.
#[derive(Clone, Copy, Debug)]
pub struct ReportView<'a> {
    pub period: &'a Period,
    pub summary: &'a Summary,
    pub donations: &'a [Donation],
    pub dues: &'a [Due],
    pub expenditures: &'a [Expenditure],
}

impl<'a> ReportView<'a> {
    #[must_use]
    pub fn new(
        period: &'a Period,
        summary: &'a Summary,
        donations: &'a [Donation],
        dues: &'a [Due],
        expenditures: &'a [Expenditure],
    ) -> Self {
        Self {
            period,
            summary,
            donations,
            dues,
            expenditures,
        }
    }
}

/// Institution header printed on the document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Letterhead {
    pub name: String,
    pub address: String,
    pub treasurer: String,
}

impl Default for Letterhead {
    fn default() -> Self {
        Self {
            name: "Pondok Pesantren".to_string(),
            address: String::new(),
            treasurer: "Bendahara".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    /// Date printed on the document and embedded in file names.
    pub export_date: NaiveDate,
    pub letterhead: Letterhead,
    /// Field delimiter of the delimited-text artifact.
    pub delimiter: u8,
}

impl ExportOptions {
    #[must_use]
    pub fn new(export_date: NaiveDate, letterhead: Letterhead) -> Self {
        Self {
            export_date,
            letterhead,
            delimiter: b',',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Workbook,
    DelimitedText,
    Document,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Workbook, Self::DelimitedText, Self::Document];

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Workbook => "xlsx",
            Self::DelimitedText => "csv",
            Self::Document => "html",
        }
    }

    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Workbook => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::DelimitedText => "text/csv; charset=utf-8",
            Self::Document => "text/html; charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Workbook => "workbook",
            Self::DelimitedText => "csv",
            Self::Document => "document",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "workbook" | "xlsx" => Ok(Self::Workbook),
            "csv" | "delimited" => Ok(Self::DelimitedText),
            "document" | "html" => Ok(Self::Document),
            other => Err(format!("unknown export format \"{other}\"")),
        }
    }
}

/// A rendered export, ready to be saved or sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub format: ExportFormat,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Writes the artifact into `dir`, creating the directory if needed.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        tracing::info!(
            "wrote {} ({} bytes) to {}",
            self.format,
            self.bytes.len(),
            path.display()
        );
        Ok(path)
    }
}

/// `laporan-keuangan_<period>_<YYYY-MM-DD>.<ext>`.
#[must_use]
pub fn file_name(period: &Period, format: ExportFormat, export_date: NaiveDate) -> String {
    format!(
        "{FILE_PREFIX}_{}_{}.{}",
        period.file_token(),
        export_date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Renders `view` in `format`.
pub fn export(
    view: &ReportView<'_>,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<Artifact, ExportError> {
    let bytes = match format {
        ExportFormat::Workbook => workbook::render(view)?,
        ExportFormat::DelimitedText => delimited::render(view, options.delimiter)?,
        ExportFormat::Document => document::render(view, options)?.into_bytes(),
    };
    Ok(Artifact {
        format,
        file_name: file_name(view.period, format, options.export_date),
        bytes,
    })
}

pub fn export_workbook(
    view: &ReportView<'_>,
    options: &ExportOptions,
) -> Result<Artifact, ExportError> {
    export(view, ExportFormat::Workbook, options)
}

pub fn export_delimited_text(
    view: &ReportView<'_>,
    options: &ExportOptions,
) -> Result<Artifact, ExportError> {
    export(view, ExportFormat::DelimitedText, options)
}

pub fn export_document(
    view: &ReportView<'_>,
    options: &ExportOptions,
) -> Result<Artifact, ExportError> {
    export(view, ExportFormat::Document, options)
}

/// `19 Oktober 2026`.
pub(crate) fn long_date(date: NaiveDate) -> String {
    match month_name(date.month()) {
        Some(month) => format!("{} {month} {}", date.day(), date.year()),
        None => date.format("%Y-%m-%d").to_string(),
    }
}
