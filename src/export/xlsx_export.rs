use anyhow::Result;
use rust_xlsxwriter::{Format, FormatAlign, Workbook};

use crate::export::csv_export::ensure_parent_dir;
use crate::matching::report::{MatchReport, MergedTable};

fn header_format() -> Format {
    Format::new().set_bold().set_align(FormatAlign::Center)
}

/// Write the merged table plus a summary sheet to an XLSX workbook.
pub fn export_merged_xlsx(merged: &MergedTable, report: &MatchReport, path: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut wb = Workbook::new();

    let ws = wb.add_worksheet().set_name("Merged")?;
    let hfmt = header_format();
    for (c, h) in merged.columns.iter().enumerate() {
        ws.write_string_with_format(0, c as u16, h, &hfmt)?;
    }
    for (r, row) in merged.rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            ws.write_string((r + 1) as u32, c as u16, cell)?;
        }
    }

    let sum = wb.add_worksheet().set_name("Summary")?;
    sum.write_string_with_format(0, 0, "Metric", &hfmt)?;
    sum.write_string_with_format(0, 1, "Value", &hfmt)?;
    let rows: [(&str, String); 4] = [
        ("Match Score", format!("{}%", report.score)),
        ("Duplicate Rows", report.duplicates.to_string()),
        ("Unmatched Rows", report.unmatched.to_string()),
        ("Rows Need Review", report.review.to_string()),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        sum.write_string((i + 1) as u32, 0, *label)?;
        sum.write_string((i + 1) as u32, 1, value)?;
    }

    wb.save(path)?;
    Ok(())
}
