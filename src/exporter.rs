use std::fmt;

use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::classifier::{flip_for, tally, FlipTally};
use crate::error::Result;
use crate::models::{AccountRecord, FlippedAccount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[cfg(feature = "xlsx")]
    Xlsx,
    Csv,
}

#[cfg(feature = "xlsx")]
pub const DEFAULT_FORMAT: ExportFormat = ExportFormat::Xlsx;
#[cfg(not(feature = "xlsx"))]
pub const DEFAULT_FORMAT: ExportFormat = ExportFormat::Csv;

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            #[cfg(feature = "xlsx")]
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl Default for ExportFormat {
    fn default() -> Self {
        DEFAULT_FORMAT
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub count: usize,
    pub tally: FlipTally,
}

impl Summary {
    pub fn breakdown(&self) -> String {
        format!(
            "{} asset accounts flipped | {} liability accounts flipped",
            self.tally.asset, self.tally.liability
        )
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.count == 1 { "account" } else { "accounts" };
        write!(f, "{} flipped {noun} found", self.count)
    }
}

pub fn summary(flipped: &[FlippedAccount]) -> Summary {
    Summary {
        count: flipped.len(),
        tally: tally(flipped),
    }
}

// ---------------------------------------------------------------------------
// Sheet model shared by the CSV and XLSX writers
// ---------------------------------------------------------------------------

enum Cell {
    Text(String),
    Amount(Decimal),
}

impl Cell {
    fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Amount(d) => d.to_string(),
        }
    }
}

struct Sheet {
    name: &'static str,
    headers: &'static [&'static str],
    widths: &'static [f64],
    rows: Vec<Vec<Cell>>,
}

const FLIPPED_HEADERS: &[&str] = &[
    "Code",
    "Name",
    "Debit Total",
    "Credit Total",
    "Expected Nature",
    "Actual Nature",
    "Reason",
];
const FLIPPED_WIDTHS: &[f64] = &[16.0, 40.0, 16.0, 16.0, 16.0, 16.0, 34.0];

const ALL_HEADERS: &[&str] = &[
    "Code",
    "Name",
    "Class",
    "Debit Total",
    "Credit Total",
    "Balance",
    "Nature",
    "Reported Balance",
    "Flipped",
    "Reason",
];
const ALL_WIDTHS: &[f64] = &[16.0, 40.0, 12.0, 16.0, 16.0, 16.0, 12.0, 18.0, 9.0, 34.0];

fn flipped_sheet(flipped: &[FlippedAccount]) -> Sheet {
    let rows = flipped
        .iter()
        .map(|f| {
            vec![
                Cell::Text(f.record.code.clone()),
                Cell::Text(f.record.name.clone()),
                Cell::Amount(f.record.debit_total),
                Cell::Amount(f.record.credit_total),
                Cell::Text(f.expected_nature.label().to_string()),
                Cell::Text(f.actual_nature.label().to_string()),
                Cell::Text(f.reason().to_string()),
            ]
        })
        .collect();
    Sheet {
        name: "Flipped Accounts",
        headers: FLIPPED_HEADERS,
        widths: FLIPPED_WIDTHS,
        rows,
    }
}

fn all_accounts_sheet(records: &[AccountRecord]) -> Sheet {
    let rows = records
        .iter()
        .map(|r| {
            let flip = flip_for(r);
            vec![
                Cell::Text(r.code.clone()),
                Cell::Text(r.name.clone()),
                Cell::Text(r.class().map(|c| c.label()).unwrap_or_default()),
                Cell::Amount(r.debit_total),
                Cell::Amount(r.credit_total),
                Cell::Amount(r.balance()),
                Cell::Text(r.balance_sign().map(|n| n.label()).unwrap_or("").to_string()),
                Cell::Text(
                    r.reported_balance
                        .as_ref()
                        .map(|b| format!("{} {}", b.amount, b.nature.indicator()))
                        .unwrap_or_default(),
                ),
                Cell::Text(if flip.is_some() { "yes" } else { "no" }.to_string()),
                Cell::Text(flip.map(|f| f.reason()).unwrap_or("").to_string()),
            ]
        })
        .collect();
    Sheet {
        name: "All Accounts",
        headers: ALL_HEADERS,
        widths: ALL_WIDTHS,
        rows,
    }
}

fn render_csv(sheet: &Sheet) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut wtr = csv::WriterBuilder::new().from_writer(&mut buf);
        wtr.write_record(sheet.headers)?;
        for row in &sheet.rows {
            wtr.write_record(row.iter().map(Cell::to_text))?;
        }
        wtr.flush()?;
    }
    Ok(buf)
}

#[cfg(feature = "xlsx")]
fn render_xlsx(sheet: &Sheet) -> Result<Vec<u8>> {
    use rust_decimal::prelude::ToPrimitive;
    use rust_xlsxwriter::{Format, Workbook};

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let amount = Format::new().set_num_format("#,##0.00");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet.name)?;
    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    for (i, row) in sheet.rows.iter().enumerate() {
        let r = i as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let c = col as u16;
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(r, c, s)?;
                }
                // XLSX numbers are f64: digits beyond ~15 significant are lost in the sheet.
                Cell::Amount(d) => {
                    worksheet.write_number_with_format(r, c, d.to_f64().unwrap_or_default(), &amount)?;
                }
            }
        }
    }
    for (col, width) in sheet.widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    Ok(workbook.save_to_buffer()?)
}

fn render(sheet: &Sheet, format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        #[cfg(feature = "xlsx")]
        ExportFormat::Xlsx => render_xlsx(sheet),
        ExportFormat::Csv => render_csv(sheet),
    }
}

/// Spreadsheet of the flagged accounts: a header row, then one row per account.
pub fn export(flipped: &[FlippedAccount], format: ExportFormat) -> Result<Vec<u8>> {
    render(&flipped_sheet(flipped), format)
}

/// Spreadsheet of every parsed account, with a yes/no flipped column.
pub fn export_all(records: &[AccountRecord], format: ExportFormat) -> Result<Vec<u8>> {
    render(&all_accounts_sheet(records), format)
}
