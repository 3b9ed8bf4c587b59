use crate::domain::model::Record;
use crate::utils::error::Result;
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use std::io::{Cursor, Read};
use std::path::Path;

pub const FIELD_DELIMITER: u8 = b'\t';

const BOM: char = '\u{feff}';

/// Decode export bytes that may not be valid UTF-8.
///
/// Invalid sequences become U+FFFD, a leading byte-order mark is dropped and every
/// line ending style is folded to `\n`. This is the only place raw bytes enter the
/// pipeline.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let text = text.strip_prefix(BOM).unwrap_or(&*text);
    normalize_line_endings(text)
}

pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

pub fn read_lossy(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode_lossy(&bytes))
}

/// Lazily turns delimited text into [`Record`]s.
///
/// The first non-blank line is the header. Short lines pad the missing trailing
/// columns with empty strings, extra values past the header are dropped, and every
/// name and value is trimmed. Blank and whitespace-only lines are skipped.
pub struct RecordStream<R: Read> {
    rows: StringRecordsIntoIter<R>,
    header: Option<Vec<String>>,
}

impl RecordStream<Cursor<Vec<u8>>> {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(Cursor::new(text.into().into_bytes()))
    }
}

impl<R: Read> RecordStream<R> {
    pub fn new(reader: R) -> Self {
        let rows = ReaderBuilder::new()
            .delimiter(FIELD_DELIMITER)
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .from_reader(reader)
            .into_records();

        Self { rows, header: None }
    }

    /// Header names, available once the first record has been pulled.
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }
}

impl<R: Read> Iterator for RecordStream<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = match self.rows.next()? {
                Ok(row) => row,
                Err(e) => return Some(Err(e.into())),
            };

            if row.iter().all(str::is_empty) {
                continue;
            }

            match &self.header {
                None => self.header = Some(row.iter().map(str::to_string).collect()),
                Some(header) => return Some(Ok(zip_row(header, &row))),
            }
        }
    }
}

fn zip_row(header: &[String], row: &StringRecord) -> Record {
    header
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), row.get(i).unwrap_or("").to_string()))
        .collect()
}

/// 一次讀取全部記錄
pub fn parse_records(text: &str) -> Result<Vec<Record>> {
    RecordStream::from_text(text).collect()
}
