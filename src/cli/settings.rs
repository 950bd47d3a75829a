use crate::error::Result;
use crate::exporter::ExportFormat;
use crate::settings::{expand_tilde, Settings};

pub fn show() -> Result<()> {
    let settings = Settings::load()?;
    println!("Settings:   {}", Settings::path().display());
    println!("Export dir: {}", settings.export_dir.display());
    println!("Format:     {}", settings.default_format.extension());
    Ok(())
}

pub fn set(export_dir: Option<String>, format: Option<ExportFormat>) -> Result<()> {
    let mut settings = Settings::load()?;
    if let Some(dir) = export_dir {
        settings.export_dir = expand_tilde(&dir);
    }
    if let Some(format) = format {
        settings.default_format = format;
    }
    let path = settings.save()?;
    println!("Settings saved to {}", path.display());
    Ok(())
}
