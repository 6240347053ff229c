use encoding_rs::UTF_8;
use memchr::memchr_iter;
use memmap2::Mmap;
use rayon::prelude::*;
use std::fs;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::time::{Duration, sleep};

use super::error::{ReadStage, ReaderError};
use super::log_line::ParsedLine;
use super::parser::LogParser;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(300);

pub struct Reader {
    path: PathBuf,
    poll_interval: Duration,
}

impl Reader {
    pub fn from(file_path: PathBuf) -> Self {
        Reader {
            path: file_path,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Classify a whole file. Lines are classified in parallel and returned
    /// in file order, unrecognized ones included (their timestamps still
    /// advance the debounce clock), along with the byte length consumed.
    /// An unterminated last line is left for the tail: the returned offset
    /// stops just past the last newline.
    pub fn read_log_file(&self) -> Result<(Vec<ParsedLine>, u64), ReaderError> {
        let file = fs::File::open(&self.path)
            .map_err(|source| ReaderError::new(ReadStage::Open, &self.path, source))?;
        let mmap = unsafe { Mmap::map(&file) }
            .map_err(|source| ReaderError::new(ReadStage::Map, &self.path, source))?;
        let bytes = mmap.as_ref();

        // Find all complete line boundaries
        let mut line_ranges: Vec<(usize, usize)> = Vec::new();
        let mut start = 0;
        for end in memchr_iter(b'\n', bytes) {
            if end > start {
                line_ranges.push((start, end));
            }
            start = end + 1;
        }
        let end_pos = start as u64;

        let parser = LogParser::new();
        let lines: Vec<ParsedLine> = line_ranges
            .par_iter()
            .map(|&(start, end)| {
                let (line, _, _) = UTF_8.decode(&bytes[start..end]);
                parser.parse_line(line.trim_end_matches('\r'))
            })
            .collect();

        tracing::debug!(
            path = %self.path.display(),
            lines = line_ranges.len(),
            pending_bytes = bytes.len() - start,
            recognized = lines.iter().filter(|p| p.line.is_recognized()).count(),
            "Read log file"
        );

        Ok((lines, end_pos))
    }

    /// Follow the file from `start_pos`, handing every complete line to
    /// `on_line`. A file shorter than the cursor was truncated or rotated and
    /// is read again from its start. Runs until the task is aborted.
    pub async fn tail_log_file<F>(&self, start_pos: u64, mut on_line: F) -> Result<(), ReaderError>
    where
        F: FnMut(&str),
    {
        let mut reader = self.open_at(start_pos).await?;
        let mut pos = start_pos;
        let mut buf = Vec::new();

        loop {
            let read = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|source| ReaderError::new(ReadStage::Read, &self.path, source))?;

            if read == 0 {
                if self.file_len().await.is_some_and(|len| len < pos) {
                    tracing::info!(path = %self.path.display(), "Log file truncated, restarting from the beginning");
                    reader = self.open_at(0).await?;
                    pos = 0;
                    buf.clear();
                    continue;
                }
                sleep(self.poll_interval).await;
                continue;
            }

            pos += read as u64;

            // Only process complete lines; a partial line waits for the next read
            if buf.ends_with(b"\n") {
                let (line, _, _) = UTF_8.decode(&buf);
                on_line(line.trim_end_matches(['\r', '\n']));
                buf.clear();
            }
        }
    }

    async fn open_at(&self, pos: u64) -> Result<BufReader<File>, ReaderError> {
        let file = File::open(&self.path)
            .await
            .map_err(|source| ReaderError::new(ReadStage::Open, &self.path, source))?;
        let mut reader = BufReader::new(file);
        reader
            .seek(SeekFrom::Start(pos))
            .await
            .map_err(|source| ReaderError::new(ReadStage::Seek, &self.path, source))?;
        Ok(reader)
    }

    async fn file_len(&self) -> Option<u64> {
        tokio::fs::metadata(&self.path).await.ok().map(|m| m.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat_log::LogLine;
    use std::io::Write;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    fn fixture() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample_fight.log")
    }

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("wakmeter-{}-{name}.log", std::process::id()))
    }

    async fn next_line(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
        timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_read_log_file_keeps_order_and_reports_length() {
        let reader = Reader::from(fixture());
        let (lines, end_pos) = reader.read_log_file().unwrap();

        assert_eq!(lines.len(), 22);
        assert_eq!(end_pos, fs::metadata(fixture()).unwrap().len());
        assert_eq!(lines[0].line, LogLine::Unrecognized);
        assert!(lines.iter().any(|p| p.line == LogLine::CombatStart));
        assert!(lines.iter().all(|p| p.timestamp.is_some()));
    }

    #[test]
    fn test_missing_file_reports_open_stage() {
        let reader = Reader::from(scratch_file("does-not-exist"));
        let err = reader.read_log_file().unwrap_err();

        assert_eq!(err.stage, ReadStage::Open);
        assert!(err.to_string().contains("failed to open combat log"));
    }

    #[tokio::test]
    async fn test_unterminated_last_line_is_handed_to_the_tail() {
        const CAST: &str = "INFO 00:49:20,000 [AWT-EventQueue-0] (aOC:174) - \
                            [Information (combat)] Portailier lance le sort Pulsation";
        let path = scratch_file("handoff");
        let (head, rest) = CAST.split_at(CAST.len() - 6);
        fs::write(&path, format!("first\n{head}")).unwrap();

        let reader = Reader::from(path.clone()).with_poll_interval(Duration::from_millis(10));
        let (lines, end_pos) = reader.read_log_file().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(end_pos, "first\n".len() as u64);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            reader
                .tail_log_file(end_pos, move |line| {
                    let _ = tx.send(line.to_string());
                })
                .await
        });

        let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(format!("{rest}\n").as_bytes()).unwrap();

        let line = next_line(&mut rx).await;
        assert_eq!(line, CAST);
        let parsed = LogParser::new().parse_line(&line);
        assert!(matches!(
            parsed.line,
            LogLine::Cast { spell, .. } if crate::context::resolve(spell) == "Pulsation"
        ));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());

        task.abort();
        let _ = fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_tail_waits_for_complete_lines_and_follows_truncation() {
        let path = scratch_file("tail");
        fs::write(&path, "first\npar").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let reader = Reader::from(path.clone()).with_poll_interval(Duration::from_millis(10));
        let task = tokio::spawn(async move {
            reader
                .tail_log_file(0, move |line| {
                    let _ = tx.send(line.to_string());
                })
                .await
        });

        assert_eq!(next_line(&mut rx).await, "first");

        let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"tial\r\n").unwrap();
        assert_eq!(next_line(&mut rx).await, "partial");

        fs::write(&path, "b\n").unwrap();
        assert_eq!(next_line(&mut rx).await, "b");

        task.abort();
        let _ = fs::remove_file(&path);
    }
}
