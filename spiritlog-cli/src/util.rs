use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::PathBuf;

/// Where a report ends up.
pub enum ReportSink {
    Stdout(BufWriter<Stdout>),
    File {
        path: PathBuf,
        writer: BufWriter<File>,
    },
}

impl ReportSink {
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout(BufWriter::new(io::stdout())));
        };
        let file =
            File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Self::File {
            path,
            writer: BufWriter::new(file),
        })
    }

    fn inner(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(writer) => writer,
            Self::File { writer, .. } => writer,
        }
    }

    /// Flush buffered output.
    pub fn finish(mut self) -> Result<()> {
        self.inner().flush().context("failed to flush report")?;
        if let Self::File { path, .. } = &self {
            log::info!("report written to {}", path.display());
        }
        Ok(())
    }
}

impl Write for ReportSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner().flush()
    }
}

/// Participant ids from a comma-separated flag; blanks are dropped.
pub fn participant_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_list_trims_and_drops_blanks() {
        assert_eq!(participant_list(" A, ,E,  K "), vec!["A", "E", "K"]);
        assert!(participant_list(" , ").is_empty());
    }

    #[test]
    fn file_sink_writes_on_finish() {
        let path = std::env::temp_dir().join(format!("spiritlog-sink-{}", std::process::id()));
        let mut sink = ReportSink::open(Some(path.clone())).unwrap();
        writeln!(sink, "spirit,plays").unwrap();
        sink.finish().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "spirit,plays\n");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn unwritable_path_is_reported() {
        let err = ReportSink::open(Some(PathBuf::from("/nonexistent/dir/report.txt")))
            .err()
            .unwrap();
        assert!(err.to_string().contains("/nonexistent/dir/report.txt"));
    }
}
