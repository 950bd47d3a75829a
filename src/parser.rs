use std::sync::OnceLock;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::bytes::Regex as BytesRegex;
use regex::Regex;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{ParseError, Result};
use crate::models::{AccountClass, AccountRecord, Nature, ReportedBalance};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn tr_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("tr").expect("invalid tr selector"))
}

fn ws_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("invalid whitespace regex"))
}

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+(\.\d+)?$").expect("invalid amount regex"))
}

fn dot_thousands_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[1-9]\d{0,2}(\.\d{3})+$").expect("invalid thousands regex"))
}

fn trim_text(s: &str) -> String {
    ws_re().replace_all(s.trim(), " ").trim().to_string()
}

fn meta_charset_re() -> &'static BytesRegex {
    static RE: OnceLock<BytesRegex> = OnceLock::new();
    RE.get_or_init(|| {
        BytesRegex::new(r#"(?i-u)<meta[^>]*charset\s*=\s*["']?([a-z0-9_.:\-]+)"#)
            .expect("invalid meta charset regex")
    })
}

/// Decode using the `<meta charset>` declaration when it names a non-UTF-8
/// encoding, otherwise UTF-8 (BOM dropped), falling back to Windows-1252 for
/// the legacy exports of desktop accounting packages.
fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let head = &bytes[..bytes.len().min(4096)];
    let declared = meta_charset_re()
        .captures(head)
        .and_then(|caps| Encoding::for_label(&caps[1]))
        .map(Encoding::output_encoding);
    if let Some(encoding) = declared.filter(|e| *e != UTF_8) {
        debug!(encoding = encoding.name(), "decoding report with declared charset");
        return encoding.decode_without_bom_handling(bytes).0.into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            debug!("report is not valid UTF-8, decoding as windows-1252");
            WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned()
        }
    }
}

/// Parse a localized amount into an exact decimal.
///
/// Accepts `1.234,56`, `1234,56`, `1.000`, `1234.56`, `1,234.56`, an optional
/// `R$`/`$` prefix, and treats an empty cell or a lone `-` as zero. Negative
/// figures (leading `-` or parentheses) are returned as their magnitude since
/// debit and credit totals are never negative.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let s: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let s = s.as_str();
    let s = s
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
        .unwrap_or(s);
    let s = s.strip_prefix('-').unwrap_or(s);
    let s = s.strip_prefix("R$").or_else(|| s.strip_prefix('$')).unwrap_or(s);
    let s = s.strip_prefix('-').unwrap_or(s);
    if s.is_empty() || s == "-" {
        return Some(Decimal::ZERO);
    }

    let normalized = match (s.rfind(','), s.rfind('.')) {
        (Some(c), Some(d)) if c > d => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (Some(_), None) => s.replace(',', "."),
        (None, Some(_)) if dot_thousands_re().is_match(s) => s.replace('.', ""),
        _ => s.to_string(),
    };
    if !digits_re().is_match(&normalized) {
        return None;
    }
    Decimal::from_str_exact(&normalized).ok()
}

/// Parse a balance cell such as `1.234,56 D` or `500,00C`.
pub fn parse_reported_balance(raw: &str) -> Option<ReportedBalance> {
    let s = raw.trim();
    let last = s.chars().last()?;
    let nature = Nature::from_indicator(last)?;
    let amount = parse_amount(&s[..s.len() - last.len_utf8()])?;
    Some(ReportedBalance { amount, nature })
}

// ---------------------------------------------------------------------------
// Table locator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum Column {
    Code,
    Classification,
    Name,
    Debit,
    Credit,
    Balance,
}

fn label_patterns() -> &'static [(Column, Regex)] {
    static PATTERNS: OnceLock<Vec<(Column, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (Column::Classification, r"(?i)^classifica[cç][aã]o\b"),
            (Column::Code, r"(?i)^(c[oó]d(igo)?\b|conta$|account( code)?$|code$)"),
            (Column::Name, r"(?i)^(descri[cç][aã]o\b|nome\b|hist[oó]rico\b|account name$|name$|description$)"),
            (Column::Debit, r"(?i)^(d[eé]bitos?|debits?)\b"),
            (Column::Credit, r"(?i)^(cr[eé]ditos?|credits?)\b"),
            (Column::Balance, r"(?i)^(saldo (atual|final)|balance$)"),
        ]
        .into_iter()
        .map(|(col, pat)| (col, Regex::new(pat).expect("invalid header label regex")))
        .collect()
    })
}

fn classify_label(label: &str) -> Option<Column> {
    label_patterns()
        .iter()
        .find(|(_, re)| re.is_match(label))
        .map(|(col, _)| *col)
}

/// Grid columns covered by one header cell (half-open).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Where each field lives in the grid of the located account table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub header_row: usize,
    pub code: Span,
    pub name: Span,
    pub debit: Span,
    pub credit: Span,
    pub balance: Option<Span>,
}

impl TableLayout {
    fn min_width(&self) -> usize {
        [self.code, self.debit, self.credit]
            .iter()
            .map(|s| s.start + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Rows of the document as text grids; `colspan` cells are widened with
/// empty slots so header and data columns line up.
pub fn extract_rows(doc: &Html) -> Vec<Vec<String>> {
    doc.select(tr_selector())
        .map(|tr| {
            let mut row = Vec::new();
            for cell in tr.children().filter_map(ElementRef::wrap) {
                let name = cell.value().name();
                if !name.eq_ignore_ascii_case("td") && !name.eq_ignore_ascii_case("th") {
                    continue;
                }
                let span = cell
                    .value()
                    .attr("colspan")
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(1)
                    .clamp(1, 64);
                row.push(trim_text(&cell.text().collect::<Vec<_>>().join(" ")));
                row.extend(std::iter::repeat(String::new()).take(span - 1));
            }
            row
        })
        .collect()
}

fn layout_from_header(idx: usize, row: &[String]) -> Option<TableLayout> {
    let mut starts: Vec<(Column, usize)> = Vec::new();
    for (i, label) in row.iter().enumerate() {
        if label.is_empty() {
            continue;
        }
        if let Some(col) = classify_label(label) {
            if !starts.iter().any(|(c, _)| *c == col) {
                starts.push((col, i));
            }
        }
    }

    // A header cell owns every grid slot up to the next labelled cell.
    let span_of = |start: usize| {
        let end = row
            .iter()
            .enumerate()
            .skip(start + 1)
            .find(|(_, l)| !l.is_empty())
            .map(|(i, _)| i)
            .unwrap_or(row.len());
        Span { start, end }
    };
    let find = |col: Column| starts.iter().find(|(c, _)| *c == col).map(|(_, i)| span_of(*i));

    let code = find(Column::Classification).or_else(|| find(Column::Code))?;
    Some(TableLayout {
        header_row: idx,
        code,
        name: find(Column::Name)?,
        debit: find(Column::Debit)?,
        credit: find(Column::Credit)?,
        balance: find(Column::Balance),
    })
}

/// Find the header row of the account table.
pub fn locate_table(rows: &[Vec<String>]) -> Option<TableLayout> {
    rows.iter()
        .enumerate()
        .find_map(|(idx, row)| layout_from_header(idx, row))
}

// ---------------------------------------------------------------------------
// Row normalizer
// ---------------------------------------------------------------------------

fn cell_in<'a>(row: &'a [String], span: Span) -> &'a str {
    row.get(span.start..span.end.min(row.len()))
        .unwrap_or_default()
        .iter()
        .find(|c| !c.is_empty())
        .map(String::as_str)
        .unwrap_or("")
}

/// Turn one data row into a record, or `None` for blank, section, subtotal
/// and otherwise malformed rows.
pub fn normalize_row(row: &[String], layout: &TableLayout) -> Option<AccountRecord> {
    if row.len() < layout.min_width() {
        return None;
    }
    let code = cell_in(row, layout.code).to_string();
    AccountClass::from_code(&code)?;

    let debit_raw = cell_in(row, layout.debit);
    let credit_raw = cell_in(row, layout.credit);
    if debit_raw.is_empty() && credit_raw.is_empty() {
        return None;
    }
    let debit_total = parse_amount(debit_raw)?;
    let credit_total = parse_amount(credit_raw)?;

    Some(AccountRecord {
        code,
        name: cell_in(row, layout.name).to_string(),
        debit_total,
        credit_total,
        reported_balance: layout
            .balance
            .and_then(|span| parse_reported_balance(cell_in(row, span))),
    })
}

// ---------------------------------------------------------------------------
// parse_report
// ---------------------------------------------------------------------------

/// Parse an HTML balance report into its account rows, in document order.
pub fn parse_report(bytes: &[u8]) -> Result<Vec<AccountRecord>> {
    let html = decode(bytes);
    let doc = Html::parse_document(&html);
    let rows = extract_rows(&doc);

    let layout = locate_table(&rows).ok_or(ParseError::NoAccountTable)?;
    debug!(header_row = layout.header_row, ?layout, "located account table");

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in &rows[layout.header_row + 1..] {
        match normalize_row(row, &layout) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    debug!(records = records.len(), skipped, "parsed balance report");

    if records.is_empty() {
        return Err(ParseError::NoRecords.into());
    }
    Ok(records)
}
