use crate::config::ExportConfig;
use crate::domains::element::ElementExportRow;
use crate::domains::export::types::{ExportFormat, ExportMetadata};
use crate::domains::export::writers::{CsvWriter, JsonWriter, XlsxWriter};
use crate::errors::{ExportError, ExportResult};
use chrono::Utc;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::mpsc;
use std::time::Instant;

/// One-way, best-effort progress notifications (percent, 0..=100)
pub trait ProgressObserver {
    fn report(&self, percent: u8);
}

impl<F: Fn(u8)> ProgressObserver for F {
    fn report(&self, percent: u8) {
        self(percent)
    }
}

impl ProgressObserver for mpsc::Sender<u8> {
    fn report(&self, percent: u8) {
        // receiver gone means nobody is watching any more
        let _ = self.send(percent);
    }
}

/// Row-count based progress for the writers that walk rows one by one
pub struct ProgressTracker<'a> {
    observer: Option<&'a dyn ProgressObserver>,
    total: usize,
    current: usize,
    interval: usize,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(observer: Option<&'a dyn ProgressObserver>, total: usize, interval: usize) -> Self {
        Self {
            observer,
            total,
            current: 0,
            interval: interval.max(1),
        }
    }

    /// Count one row; reports every `interval` rows
    pub fn advance(&mut self) {
        self.current += 1;
        if self.total > 0 && self.current % self.interval == 0 {
            if let Some(observer) = self.observer {
                let percent = (self.current * 100 / self.total).min(100);
                observer.report(percent as u8);
            }
        }
    }
}

/// Encoder for one output format.
///
/// Writers build the whole document in memory; the destination is only
/// touched once the bytes are complete.
pub trait ExportWriter {
    fn format(&self) -> ExportFormat;

    /// Serialize `rows` to the complete file contents
    fn encode(
        &self,
        rows: &[ElementExportRow],
        progress: Option<&dyn ProgressObserver>,
    ) -> ExportResult<Vec<u8>>;

    /// Encode and persist to `destination`, then report 100%
    fn write(
        &self,
        rows: &[ElementExportRow],
        destination: &Path,
        progress: Option<&dyn ProgressObserver>,
    ) -> ExportResult<ExportMetadata> {
        let start_time = Instant::now();

        for row in rows {
            row.validate()?;
        }

        let bytes = self.encode(rows, progress)?;
        write_atomically(destination, &bytes)?;

        if let Some(observer) = progress {
            observer.report(100);
        }

        log::debug!(
            "{} writer persisted {} rows ({} bytes) to {}",
            self.format(),
            rows.len(),
            bytes.len(),
            destination.display()
        );

        Ok(ExportMetadata {
            format: self.format(),
            destination: destination.to_path_buf(),
            rows_written: rows.len(),
            bytes_written: bytes.len(),
            duration_ms: start_time.elapsed().as_millis() as u64,
            exported_at: Utc::now(),
        })
    }
}

/// Replace `destination` with `bytes` in one step.
///
/// The data goes to a temporary file next to the destination, which is then
/// renamed over it; a failure leaves no partial destination behind. The
/// result keeps the permissions of the file it replaces, or gets the usual
/// new-file mode (0o666 less the umask).
pub fn write_atomically(destination: &Path, bytes: &[u8]) -> ExportResult<()> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    if let Some(permissions) = destination_permissions(destination) {
        builder.permissions(permissions);
    }

    let mut file = builder
        .tempfile_in(dir)
        .map_err(|e| ExportError::invalid_destination(destination, e))?;
    file.write_all(bytes)
        .map_err(|e| ExportError::invalid_destination(destination, e))?;
    file.flush()
        .map_err(|e| ExportError::invalid_destination(destination, e))?;
    file.persist(destination)
        .map_err(|e| ExportError::invalid_destination(destination, e.error))?;

    Ok(())
}

fn destination_permissions(destination: &Path) -> Option<fs::Permissions> {
    fs::metadata(destination)
        .ok()
        .filter(|metadata| metadata.is_file())
        .map(|metadata| metadata.permissions())
        .or_else(new_file_permissions)
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    // umask still applies when the temp file is opened
    Some(fs::Permissions::from_mode(0o666))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

/// Writer factory for creating format-specific writers
pub struct WriterFactory;

impl WriterFactory {
    pub fn create_writer(format: ExportFormat, config: &ExportConfig) -> Box<dyn ExportWriter> {
        match format {
            ExportFormat::Csv => Box::new(CsvWriter::new(config.clone())),
            ExportFormat::Json => Box::new(JsonWriter::new()),
            ExportFormat::Excel => Box::new(XlsxWriter::new(config.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[test]
    fn test_tracker_reports_every_interval() {
        let seen = RefCell::new(Vec::new());
        let observer = |p: u8| seen.borrow_mut().push(p);
        let mut tracker = ProgressTracker::new(Some(&observer), 250, 100);

        for _ in 0..250 {
            tracker.advance();
        }

        assert_eq!(*seen.borrow(), vec![40, 80]);
    }

    #[test]
    fn test_tracker_without_observer() {
        let mut tracker = ProgressTracker::new(None, 10, 1);
        for _ in 0..10 {
            tracker.advance();
        }
    }

    #[test]
    fn test_channel_observer() {
        let (tx, rx) = mpsc::channel::<u8>();
        tx.report(55);
        drop(rx);
        tx.report(60);
    }

    #[test]
    fn test_write_atomically_replaces_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "old contents").unwrap();

        write_atomically(&path, b"new").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomically_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = write_atomically(&path, b"data").unwrap_err();

        assert!(matches!(err, ExportError::InvalidDestination { .. }));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomically_uses_regular_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let reference = dir.path().join("reference.csv");
        std::fs::write(&reference, "x").unwrap();
        let path = dir.path().join("out.csv");

        write_atomically(&path, b"data").unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(path.as_path()), mode(reference.as_path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomically_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        write_atomically(&path, b"new").unwrap();

        assert_eq!(std::fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o640);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_factory_dispatch() {
        let config = ExportConfig::default();
        for format in [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Excel] {
            assert_eq!(WriterFactory::create_writer(format, &config).format(), format);
        }
    }
}
