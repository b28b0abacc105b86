use crate::{config::Scan, record::UrlRecord};
use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, open_workbook_auto};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

pub struct UrlMatcher {
    re: Regex,
}

impl UrlMatcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern).with_context(|| format!("compiling url_pattern: {pattern}"))?;
        Ok(Self { re })
    }

    /// Returns the trimmed cell text when it looks like a URL. The pattern is
    /// only a prefix test, so trailing text is kept as part of the URL.
    pub fn find<'a>(&self, cell: &'a str) -> Option<&'a str> {
        let trimmed = cell.trim();
        if self.re.is_match(trimmed) {
            Some(trimmed)
        } else {
            None
        }
    }
}

/// Collects every URL-shaped data cell across all sheets, in sheet, row,
/// column order. Repeated URLs are kept since each has its own location.
pub fn scan_workbook(cfg: &Scan, path: &Path) -> Result<Vec<UrlRecord>> {
    let matcher = UrlMatcher::new(&cfg.url_pattern)?;
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("opening workbook: {}", path.display()))?;

    let mut found = Vec::new();
    for sheet in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet)
            .with_context(|| format!("reading sheet: {sheet}"))?;
        let before = found.len();
        found.extend(scan_sheet(&sheet, &range, &matcher));
        debug!(
            "sheet {sheet:?} size={:?} urls={}",
            range.get_size(),
            found.len() - before
        );
    }
    Ok(found)
}

pub fn scan_sheet(sheet: &str, range: &Range<Data>, matcher: &UrlMatcher) -> Vec<UrlRecord> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let labels = column_labels(header);

    let mut found = Vec::new();
    for (data_idx, cells) in rows.enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if matches!(cell, Data::Empty) {
                continue;
            }
            let text = cell.to_string();
            if let Some(url) = matcher.find(&text) {
                found.push(UrlRecord {
                    url: url.to_string(),
                    sheet: sheet.to_string(),
                    row: data_idx as u32 + 2,
                    column: labels
                        .get(col)
                        .cloned()
                        .unwrap_or_else(|| unnamed(col)),
                });
            }
        }
    }
    found
}

/// Header labels for each column. Blank headers become `Unnamed: {index}` and
/// repeats get a `.{n}` suffix so every label is distinct.
pub fn column_labels(header: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(col, cell)| {
            let base = match cell {
                Data::Empty => unnamed(col),
                other => {
                    let s = other.to_string();
                    if s.trim().is_empty() { unnamed(col) } else { s }
                }
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let label = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            label
        })
        .collect()
}

fn unnamed(col: usize) -> String {
    format!("Unnamed: {col}")
}
