use anyhow::{Context, Result};
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::Path;

/// Route the `log` facade to a file; the terminal is owned by the UI.
pub fn init_logging(path: &Path, verbose: bool) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    WriteLogger::init(level_for(verbose), Config::default(), file)
        .context("Failed to initialize logger")?;
    Ok(())
}

fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(false), LevelFilter::Info);
        assert_eq!(level_for(true), LevelFilter::Debug);
    }

    #[test]
    fn test_unwritable_log_path_is_reported() {
        let dir = TempDir::new().unwrap();
        // a directory cannot be opened as a log file
        let err = init_logging(dir.path(), false).unwrap_err();
        assert!(err.to_string().contains("Failed to create log file"));
    }
}
