use crate::record::AnnotatedRecord;
use anyhow::{Context, Result, anyhow};
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const HEADERS: [&str; 5] = ["URL", "Sheet", "Row", "Column", "Status Code"];

#[derive(Debug, Clone, Serialize)]
pub struct JsonReport<'a> {
    pub input: String,
    pub generated: String,
    pub checked: usize,
    pub broken_count: usize,
    pub broken: &'a [AnnotatedRecord],
}

/// Keeps broken records in discovery order.
pub fn broken(records: &[AnnotatedRecord]) -> Vec<AnnotatedRecord> {
    records.iter().filter(|r| r.is_broken()).cloned().collect()
}

/// `links.xlsx` -> `links_broken_urls.xlsx`, `links.xls` likewise. Names
/// without either extension get the suffix appended to the whole name.
pub fn output_path(input: &Path, suffix: &str) -> Result<PathBuf> {
    let name = input
        .file_name()
        .ok_or_else(|| anyhow!("input has no file name: {}", input.display()))?;
    let is_sheet = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xls"));
    let mut out = match input.file_stem() {
        Some(stem) if is_sheet => stem.to_os_string(),
        _ => name.to_os_string(),
    };
    out.push(suffix);
    Ok(input.with_file_name(out))
}

/// JSON sidecar next to the report. Appends `.json` when swapping the
/// extension would land on the report itself.
pub fn json_path(report: &Path) -> PathBuf {
    let swapped = report.with_extension("json");
    if swapped.as_path() != report {
        return swapped;
    }
    let mut name = report.as_os_str().to_os_string();
    name.push(".json");
    PathBuf::from(name)
}

/// True when both paths name the same existing file, however they are spelled.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

pub fn write_xlsx(path: &Path, sheet_name: &str, broken: &[AnnotatedRecord]) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .with_context(|| format!("invalid sheet name: {sheet_name}"))?;

    for (col, title) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }

    for (i, rec) in broken.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet.write_string(row, 0, &rec.record.url)?;
        worksheet.write_string(row, 1, &rec.record.sheet)?;
        worksheet.write_number(row, 2, rec.record.row)?;
        worksheet.write_string(row, 3, &rec.record.column)?;
        match rec.status.code() {
            Some(code) => worksheet.write_number(row, 4, code)?,
            None => worksheet.write_string(row, 4, rec.status.to_string())?,
        };
    }
    worksheet.autofit();

    workbook
        .save(path)
        .with_context(|| format!("saving workbook: {}", path.display()))?;
    Ok(())
}

pub fn write_json(path: &Path, report: &JsonReport<'_>) -> Result<()> {
    let raw = serde_json::to_string_pretty(report)?;
    std::fs::write(path, raw).with_context(|| format!("writing {}", path.display()))
}
