//! Default configuration output

use anyhow::Result;
use eqwow_model::ConversionConfig;

use crate::cli::DocumentFormat;
use crate::utils::to_document;

pub fn execute(format: DocumentFormat) -> Result<()> {
    let text = to_document(&ConversionConfig::default(), format)?;
    println!("{}", text.trim_end());
    Ok(())
}
