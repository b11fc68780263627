//! Small file and console helpers.

use crate::error::Result;
use log::{debug, info};
use std::path::Path;

/// Read a whole file.
pub fn read(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    debug!("Read {} bytes from {}", data.len(), path.display());
    Ok(data)
}

/// Write `data` to `path`, replacing any existing file.
pub fn write(path: impl AsRef<Path>, data: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    let data = data.as_ref();
    std::fs::write(path, data)?;
    debug!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

/// Print a line to stdout, echoing it to the log.
pub fn print(text: &str) {
    info!("{text}");
    println!("{text}");
}
