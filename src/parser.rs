//! Tabular parser: turns CSV text into header-keyed [`RawRow`]s.
//!
//! Rows are produced lazily in input order. The first non-blank line is the
//! header line; blank lines never produce a row. Values are left as strings.

use crate::error::{IngestError, Result};
use crate::types::RawRow;
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, warn};

pub struct RowReader<R: Read> {
    records: StringRecordsIntoIter<R>,
    headers: Option<Vec<String>>,
    next_index: usize,
    malformed: usize,
    done: bool,
}

impl<R: Read> RowReader<R> {
    pub fn new(reader: R) -> Self {
        let records = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // Ragged rows are handled positionally
            .from_reader(reader)
            .into_records();

        Self {
            records,
            headers: None,
            next_index: 1,
            malformed: 0,
            done: false,
        }
    }

    /// Trimmed header names, available once the first row has been pulled
    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    /// Records the CSV reader could not decode and dropped
    pub fn malformed(&self) -> usize {
        self.malformed
    }

    fn build_row(&mut self, headers: &[String], record: &StringRecord) -> RawRow {
        let fields: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();

        let row = RawRow::new(self.next_index, fields);
        self.next_index += 1;
        row
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) if e.is_io_error() => {
                    self.done = true;
                    return Some(Err(IngestError::Csv(e)));
                }
                Err(e) => {
                    // Undecodable record (bad UTF-8 and the like); drop it and keep going
                    self.malformed += 1;
                    warn!("Dropping malformed CSV record: {}", e);
                    continue;
                }
            };

            if is_blank(&record) {
                continue;
            }

            match self.headers.take() {
                None => {
                    let headers = trimmed_headers(&record);
                    debug!("Parsed headers: {:?}", headers);
                    self.headers = Some(headers);
                }
                Some(headers) => {
                    let row = self.build_row(&headers, &record);
                    self.headers = Some(headers);
                    return Some(Ok(row));
                }
            }
        }
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty()) && record.len() <= 1
}

fn trimmed_headers(record: &StringRecord) -> Vec<String> {
    record
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let header = if i == 0 {
                header.trim_start_matches('\u{feff}')
            } else {
                header
            };
            header.trim().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(text: &str) -> Vec<RawRow> {
        RowReader::new(text.as_bytes())
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_headers_are_trimmed() {
        let parsed = rows(" name , quantity \nMilk,2\n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].get("name"), Some("Milk"));
        assert_eq!(parsed[0].get("quantity"), Some("2"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let text = "\n   \nname,quantity\n\nMilk,2\n   \nEggs,12\n\n";
        let parsed = rows(text);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].index, 1);
        assert_eq!(parsed[1].index, 2);
        assert_eq!(parsed[1].get("name"), Some("Eggs"));
    }

    #[test]
    fn test_short_rows_leave_keys_absent() {
        let parsed = rows("name,quantity,placement\nMilk\n");
        assert_eq!(parsed[0].get("name"), Some("Milk"));
        assert_eq!(parsed[0].get("quantity"), None);
        assert_eq!(parsed[0].get("placement"), None);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let parsed = rows("name\nMilk,extra,more\n");
        assert_eq!(parsed[0].fields.len(), 1);
    }

    #[test]
    fn test_quoted_fields_keep_commas() {
        let parsed = rows("name,keywords\nBread,\"wheat, sliced\"\n");
        assert_eq!(parsed[0].get("keywords"), Some("wheat, sliced"));
    }

    #[test]
    fn test_values_are_not_trimmed() {
        let parsed = rows("name,quantity\n  Milk ,  3.5\n");
        assert_eq!(parsed[0].get("name"), Some("  Milk "));
        assert_eq!(parsed[0].get("quantity"), Some("  3.5"));
    }

    #[test]
    fn test_row_of_empty_fields_is_still_a_row() {
        let parsed = rows("name,quantity\n,\n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].get("name"), Some(""));
    }

    #[test]
    fn test_byte_order_mark_is_dropped_from_headers() {
        let parsed = rows("\u{feff}name,quantity\nMilk,1\n");
        assert_eq!(parsed[0].get("name"), Some("Milk"));
    }

    #[test]
    fn test_unterminated_quote_does_not_fail() {
        let parsed = rows("name,placement\nMilk,\"Fridge\nEggs,Pantry\n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].get("name"), Some("Milk"));
    }

    #[test]
    fn test_headers_only_yields_nothing() {
        let mut reader = RowReader::new("name,quantity\n".as_bytes());
        assert!(reader.next().is_none());
        assert_eq!(
            reader.headers(),
            Some(&["name".to_string(), "quantity".to_string()][..])
        );
    }

    /// Yields `data` and then fails every read
    struct FailingReader {
        data: std::io::Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "stream dropped",
                )),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn test_read_failure_is_fatal_csv_error() {
        let mut reader = RowReader::new(FailingReader {
            data: std::io::Cursor::new(b"name\nMilk\n".to_vec()),
        });

        let first = reader.next().unwrap().unwrap();
        assert_eq!(first.get("name"), Some("Milk"));
        match reader.next() {
            Some(Err(IngestError::Csv(e))) => assert!(e.is_io_error()),
            other => panic!("expected CSV I/O error, got {:?}", other),
        }
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_invalid_utf8_record_is_dropped() {
        let mut bytes = b"name\nMilk\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"Eggs\n");

        let mut reader = RowReader::new(&bytes[..]);
        let parsed: Vec<RawRow> = reader.by_ref().collect::<Result<_>>().unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].get("name"), Some("Eggs"));
        assert_eq!(reader.malformed(), 1);
    }
}
