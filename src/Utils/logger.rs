use crate::Utils::config::{ConfigError, LiMathConfig};
use chrono::Local;
use csv::Writer;
use log::info;
use nalgebra::DMatrix;
use simplelog::*;
use std::fs::File;
use std::io;
use std::path::Path;

/// Starts terminal logging, plus a `log_<date>_<time>.txt` file when the config asks for it.
///
/// A second call is harmless: the global logger stays the first one and the error from
/// `CombinedLogger::init` is ignored.
pub fn init_logger(config: &LiMathConfig) -> Result<(), ConfigError> {
    let level = config.level_filter()?;
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if config.log_to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        let file = File::create(&name).map_err(|e| ConfigError::Io {
            path: name.clone(),
            reason: e.to_string(),
        })?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    if CombinedLogger::init(loggers).is_ok() {
        info!("logger started at level {}", level);
    }
    Ok(())
}

/// Writes a table of samples to CSV: a header row, then one record per matrix row.
pub fn save_matrix_to_csv<P: AsRef<Path>>(
    matrix: &DMatrix<f64>,
    headers: &[&str],
    path: P,
) -> io::Result<()> {
    if headers.len() != matrix.ncols() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} headers for {} columns", headers.len(), matrix.ncols()),
        ));
    }
    let mut writer = Writer::from_path(path)?;
    writer.write_record(headers)?;
    for row in matrix.row_iter() {
        writer.write_record(row.iter().map(|val| val.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice() {
        let config = LiMathConfig::default();
        assert!(init_logger(&config).is_ok());
        assert!(init_logger(&config).is_ok());
    }

    #[test]
    fn test_save_matrix_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let matrix = DMatrix::from_row_slice(2, 3, &[0.0, 2.0, 1.0, 0.5, 1.75, 1.25]);
        save_matrix_to_csv(&matrix, &["t", "x", "y"], &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["t,x,y", "0,2,1", "0.5,1.75,1.25"]);

        let err = save_matrix_to_csv(&matrix, &["t"], &path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
