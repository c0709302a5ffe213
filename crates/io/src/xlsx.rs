// Excel import/export (xlsx, xls, xlsb, ods in; xlsx out)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use rust_xlsxwriter::{Color, Format, Workbook as XlsxWorkbook, Worksheet};

use lexigrid_recon::model::{Cell, CellVerdict, ReconResult, Table, Verdict};

use crate::report::{self, REPORT_HEADERS};

/// Sheet name of the verdict report.
pub const REPORT_SHEET: &str = "Comparison";

const REPORT_WIDTHS: [f64; 7] = [25.0, 20.0, 30.0, 30.0, 15.0, 10.0, 25.0];

const HEADER_GREY: u32 = 0xD3D3D3;
const MATCH_GREEN: u32 = 0x00FF00;
const REVIEW_ORANGE: u32 = 0xFFA500;
const DIFF_RED: u32 = 0xFF0000;
const MISSING_YELLOW: u32 = 0xFFFF00;

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Import one worksheet as a table. `sheet` defaults to the first sheet.
///
/// Row 1 of the table is row 1 of the sheet even when the used range starts lower.
pub fn import(path: &Path, sheet: Option<&str>) -> Result<Table, String> {
    let mut workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|e| format!("Failed to open Excel file: {}", e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|n| n.as_str() == name)
            .cloned()
            .ok_or_else(|| {
                format!(
                    "sheet '{name}' not found (available: {})",
                    sheet_names.join(", ")
                )
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| "Excel file contains no sheets".to_string())?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

    let (data_start_row, data_start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); data_start_row as usize];

    for row in range.rows() {
        let mut cells: Vec<Cell> = vec![Cell::Absent; data_start_col as usize];
        cells.extend(row.iter().map(cell_from_data));
        // Trailing empties carry no information
        while cells.last().is_some_and(Cell::is_absent) {
            cells.pop();
        }
        rows.push(cells);
    }

    log::debug!(
        "{}: sheet '{sheet_name}', {} rows",
        path.display(),
        rows.len()
    );
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Table::new(name, rows))
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Absent,
        Data::String(s) => Cell::from_text(s.as_str()),
        Data::Float(n) => {
            // Integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                Cell::from_text(format!("{}", *n as i64))
            } else {
                Cell::from_text(format!("{}", n))
            }
        }
        Data::Int(n) => Cell::from_text(n.to_string()),
        Data::Bool(b) => Cell::from_text(if *b { "TRUE" } else { "FALSE" }),
        Data::Error(e) => Cell::from_text(format!("#{:?}", e)),
        Data::DateTime(dt) => Cell::from_text(format!("{}", dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from_text(s.as_str()),
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Write a table to a single sheet; row 1 is bold.
pub fn export_table(table: &Table, path: &Path, sheet_name: &str) -> Result<(), String> {
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(sheet_name)
        .map_err(|e| format!("Failed to create sheet '{}': {}", sheet_name, e))?;

    let bold = Format::new().set_bold();
    for (row_idx, row) in table.rows().iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            if cell.is_absent() {
                continue;
            }
            let (r, c) = (row_idx as u32, col_idx as u16);
            let written = if row_idx == 0 {
                worksheet.write_string_with_format(r, c, cell.text(), &bold)
            } else {
                worksheet.write_string(r, c, cell.text())
            };
            written.map_err(|e| format!("Failed to write cell: {}", e))?;
        }
    }
    for col in 0..table.column_count() {
        worksheet
            .set_column_width(col as u16, if col == 0 { 30 } else { 25 })
            .map_err(|e| e.to_string())?;
    }

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))
}

/// Write the verdict report: one row per verdict, records separated by a blank
/// row, followed by a summary block and a colour legend.
pub fn export_report(result: &ReconResult, path: &Path) -> Result<(), String> {
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(REPORT_SHEET)
        .map_err(|e| format!("Failed to create sheet '{}': {}", REPORT_SHEET, e))?;

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_GREY));
    for (col, (title, width)) in REPORT_HEADERS.iter().zip(REPORT_WIDTHS).enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *title, &header_format)
            .map_err(|e| e.to_string())?;
        worksheet
            .set_column_width(col as u16, width)
            .map_err(|e| e.to_string())?;
    }
    worksheet.set_freeze_panes(1, 0).map_err(|e| e.to_string())?;

    let mut row: u32 = 1;
    let mut group: Option<(usize, usize)> = None;
    for v in &result.verdicts {
        let this_group = (v.source_row, v.candidate_rank);
        let first_in_group = group != Some(this_group);
        if first_in_group && group.is_some() {
            row += 1;
        }
        group = Some(this_group);

        write_verdict_row(worksheet, row, v, first_in_group)?;
        row += 1;
    }

    write_summary(worksheet, row + 2, result)?;

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))
}

fn fill_color(verdict: Verdict) -> u32 {
    match verdict {
        Verdict::ExactMatch | Verdict::HighConfidence => MATCH_GREEN,
        Verdict::NeedsReview => REVIEW_ORANGE,
        Verdict::Mismatch => DIFF_RED,
        Verdict::MissingRow | Verdict::MissingColumn => MISSING_YELLOW,
    }
}

fn write_verdict_row(
    worksheet: &mut Worksheet,
    row: u32,
    v: &CellVerdict,
    write_key: bool,
) -> Result<(), String> {
    let err = |e: rust_xlsxwriter::XlsxError| format!("Failed to write row {}: {}", row + 1, e);
    let fill = Format::new().set_background_color(Color::RGB(fill_color(v.verdict)));

    if write_key {
        worksheet
            .write_string_with_format(row, 0, &v.source_key, &Format::new().set_bold())
            .map_err(err)?;
    }
    worksheet.write_string(row, 1, v.language.label()).map_err(err)?;
    worksheet
        .write_string_with_format(row, 2, &v.source_text, &fill)
        .map_err(err)?;
    worksheet
        .write_string_with_format(row, 3, report::comparison_text(v), &fill)
        .map_err(err)?;
    worksheet
        .write_string(row, 4, report::result_label(v.verdict))
        .map_err(err)?;
    if let Some(score) = v.score {
        let three_places = Format::new().set_num_format("0.000");
        worksheet
            .write_number_with_format(row, 5, score, &three_places)
            .map_err(err)?;
    }
    if let Some(key) = &v.target_key {
        worksheet.write_string(row, 6, key).map_err(err)?;
    }
    Ok(())
}

fn write_summary(worksheet: &mut Worksheet, start: u32, result: &ReconResult) -> Result<(), String> {
    let err = |e: rust_xlsxwriter::XlsxError| format!("Failed to write summary: {}", e);
    let title = Format::new().set_bold().set_font_size(12);
    let s = &result.summary;

    worksheet
        .write_string_with_format(start, 0, "Summary", &title)
        .map_err(err)?;
    let line_color = if s.has_differences { DIFF_RED } else { 0x006400 };
    worksheet
        .write_string_with_format(
            start + 1,
            0,
            report::summary_line(result),
            &Format::new().set_bold().set_font_color(Color::RGB(line_color)),
        )
        .map_err(err)?;

    let mut row = start + 2;
    for verdict in Verdict::ALL {
        worksheet
            .write_string(row, 0, report::result_label(verdict))
            .map_err(err)?;
        worksheet
            .write_number(row, 1, s.count(verdict) as f64)
            .map_err(err)?;
        row += 1;
    }

    row += 1;
    worksheet
        .write_string_with_format(row, 0, "Legend:", &Format::new().set_bold())
        .map_err(err)?;
    let legend = [
        (MATCH_GREEN, "exact or high-confidence match"),
        (REVIEW_ORANGE, "similar, needs review"),
        (DIFF_RED, "different"),
        (MISSING_YELLOW, "missing row or language column"),
    ];
    for (color, text) in legend {
        row += 1;
        worksheet
            .write_string_with_format(
                row,
                0,
                text,
                &Format::new().set_background_color(Color::RGB(color)),
            )
            .map_err(err)?;
    }
    Ok(())
}
