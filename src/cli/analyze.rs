use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::analysis::analyze;
use crate::error::Result;
use crate::exporter::{export_all, ExportFormat};
use crate::fmt::money;
use crate::models::FlippedAccount;
use crate::settings::Settings;

fn file_name(name: &str, format: ExportFormat) -> String {
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    format!("{name}-{date}.{}", format.extension())
}

fn write_export(bytes: &[u8], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn flipped_table(flipped: &[FlippedAccount]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Code", "Name", "Debit", "Credit", "Expected", "Actual"]);
    for f in flipped {
        table.add_row(vec![
            Cell::new(&f.record.code),
            Cell::new(&f.record.name),
            Cell::new(money(f.record.debit_total)),
            Cell::new(money(f.record.credit_total)),
            Cell::new(f.expected_nature.label()),
            Cell::new(f.actual_nature.label().red()),
        ]);
    }
    table
}

pub fn run(
    file: &str,
    output: Option<String>,
    format: Option<ExportFormat>,
    all: bool,
    quiet: bool,
) -> Result<()> {
    let settings = Settings::load()?;
    let format = format.unwrap_or(settings.default_format);
    let bytes = std::fs::read(file)?;
    let analysis = analyze(&bytes, format)?;

    println!("{} accounts read from {file}", analysis.records.len());
    if analysis.summary.count > 0 {
        println!("{}", analysis.summary.to_string().red().bold());
    } else {
        println!("{}", analysis.summary.to_string().green().bold());
    }
    println!("{}", analysis.summary.breakdown());

    if !quiet && !analysis.flipped.is_empty() {
        println!("\nFlipped Accounts\n{}", flipped_table(&analysis.flipped));
    }

    let path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.export_dir.join(file_name("contas-viradas", format)));
    write_export(&analysis.export, &path)?;

    if all {
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let bytes = export_all(&analysis.records, format)?;
        write_export(&bytes, &dir.join(file_name("todas-contas", format)))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_has_extension() {
        let name = file_name("contas-viradas", ExportFormat::Csv);
        assert!(name.starts_with("contas-viradas-"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn test_run_writes_output_and_all_accounts() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("balancete.html");
        std::fs::write(
            &input,
            "<table><tr><th>Código</th><th>Descrição</th><th>Débito</th><th>Crédito</th></tr>\
             <tr><td>1.1.1.2</td><td>Banco</td><td>0,00</td><td>500,00</td></tr></table>",
        )
        .unwrap();
        let out = dir.path().join("out").join("viradas.csv");
        run(
            input.to_str().unwrap(),
            Some(out.to_string_lossy().to_string()),
            Some(ExportFormat::Csv),
            true,
            true,
        )
        .unwrap();
        let content = std::fs::read_to_string(&out).unwrap();
        assert!(content.contains("1.1.1.2,Banco"));
        let all_file = std::fs::read_dir(dir.path().join("out"))
            .unwrap()
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_string_lossy().starts_with("todas-contas-"));
        assert!(all_file);
    }
}
