//! Export of the full reading list to spreadsheet, document and CSV files.
//!
//! Exports work on the list already in memory; nothing is fetched.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use chrono_tz::Tz;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rust_xlsxwriter::Workbook;

use crate::data::format::{format_row, HEADERS};
use crate::data::Reading;
use crate::error::ExportError;

/// Base name of every export file.
const FILE_STEM: &str = "history_data";

/// Sheet name of the spreadsheet export.
const SHEET_NAME: &str = "History Data";

/// Raw field keys used as spreadsheet header, matching the API's JSON.
const RAW_KEYS: [&str; 5] = ["timestamp", "soil_moisture", "pH", "humidity", "temperature"];

/// Title printed above the document table.
const DOCUMENT_TITLE: &str = "Sensor History";

// A4 portrait, in millimetres.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 14.0;
const ROW_HEIGHT: f32 = 7.0;
const FONT_SIZE: f32 = 9.0;
const COLUMN_X: [f32; 5] = [14.0, 66.0, 102.0, 126.0, 160.0];

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Spreadsheet with raw values.
    Xlsx,
    /// Printable table with units and localized timestamps.
    Pdf,
    /// Comma-separated values, formatted like the document.
    Csv,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Xlsx, ExportFormat::Pdf, ExportFormat::Csv];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Csv => "csv",
        }
    }

    /// Deterministic file name, e.g. `history_data.xlsx`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", FILE_STEM, self.extension())
    }
}

/// Write `readings` in `format` into `dir`, returning the written path.
pub fn export(
    readings: &[Reading],
    format: ExportFormat,
    dir: &Path,
    tz: Tz,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format.file_name());
    match format {
        ExportFormat::Xlsx => write_xlsx(readings, &path)?,
        ExportFormat::Pdf => write_pdf(readings, &path, tz)?,
        ExportFormat::Csv => write_csv(readings, &path, tz)?,
    }
    tracing::info!(path = %path.display(), rows = readings.len(), "Exported readings");
    Ok(path)
}

/// One sheet, raw keys as header, one row per reading.
pub fn write_xlsx(readings: &[Reading], path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, key) in RAW_KEYS.iter().enumerate() {
        sheet.write_string(0, col as u16, *key)?;
    }

    for (i, reading) in readings.iter().enumerate() {
        let row = i as u32 + 1;
        if let Some(ts) = reading.timestamp {
            sheet.write_string(row, 0, ts.to_rfc3339_opts(SecondsFormat::Millis, true))?;
        }
        let values = [
            reading.soil_moisture,
            reading.ph,
            reading.humidity,
            reading.temperature,
        ];
        for (offset, value) in values.iter().enumerate() {
            if let Some(v) = value {
                sheet.write_number(row, offset as u16 + 1, *v)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Formatted rows with the fixed header, flowing over as many pages as needed.
pub fn write_pdf(readings: &[Reading], path: &Path, tz: Tz) -> Result<(), ExportError> {
    let (doc, page, layer) =
        PdfDocument::new(DOCUMENT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut layer = doc.get_page(page).get_layer(layer);
    layer.use_text(DOCUMENT_TITLE, 14.0, Mm(MARGIN), Mm(PAGE_HEIGHT - MARGIN), &bold);
    let mut y = PAGE_HEIGHT - MARGIN - 2.0 * ROW_HEIGHT;
    write_pdf_row(&layer, &HEADERS.map(String::from), y, &bold);

    for reading in readings {
        y -= ROW_HEIGHT;
        if y < MARGIN {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = PAGE_HEIGHT - MARGIN;
            write_pdf_row(&layer, &HEADERS.map(String::from), y, &bold);
            y -= ROW_HEIGHT;
        }
        write_pdf_row(&layer, &format_row(reading, tz), y, &regular);
    }

    let bytes = doc.save_to_bytes()?;
    fs::write(path, bytes)?;
    Ok(())
}

fn write_pdf_row(layer: &PdfLayerReference, cells: &[String; 5], y: f32, font: &IndirectFontRef) {
    for (cell, x) in cells.iter().zip(COLUMN_X) {
        layer.use_text(cell.as_str(), FONT_SIZE, Mm(x), Mm(y), font);
    }
}

/// Formatted rows with the fixed header.
pub fn write_csv(readings: &[Reading], path: &Path, tz: Tz) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADERS)?;
    for reading in readings {
        writer.write_record(format_row(reading, tz))?;
    }
    writer.flush()?;
    Ok(())
}
