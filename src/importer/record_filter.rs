// ==========================================
// Translator Docs - record reading and blank-row filtering
// ==========================================
// Reads the body (everything after the header) lazily.
// Blank rows are dropped silently and consume no row number;
// surviving rows are numbered from 2 (the header is row 1).
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::schema_validator::{DELIMITER, EXPECTED_HEADERS};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};

/// Row number of the first data row
pub const FIRST_DATA_ROW: usize = 2;

// ==========================================
// DocumentRow - one surviving, trimmed data row
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRow {
    pub row_number: usize,
    pub subject: String,
    pub content: String,
    pub location: String,
    pub author: String,
    pub translator_email: String,
}

impl DocumentRow {
    /// Build a row from a record with at least five fields
    pub fn from_record(row_number: usize, record: &StringRecord) -> ImportResult<Self> {
        if record.len() < EXPECTED_HEADERS.len() {
            return Err(ImportError::ReadFailure(format!(
                "row {} has {} fields, expected {}",
                row_number,
                record.len(),
                EXPECTED_HEADERS.len()
            )));
        }

        let field = |idx: usize| record.get(idx).unwrap_or_default().trim().to_string();
        Ok(Self {
            row_number,
            subject: field(0),
            content: field(1),
            location: field(2),
            author: field(3),
            translator_email: field(4),
        })
    }

    /// Whether all required fields are present
    pub fn has_required_fields(&self) -> bool {
        !self.subject.is_empty()
            && !self.content.is_empty()
            && !self.author.is_empty()
            && !self.translator_email.is_empty()
    }
}

/// A record is blank when every field is empty after trimming
pub fn is_blank_record(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

// ==========================================
// RecordFilter - iterator over surviving rows
// ==========================================
pub struct RecordFilter<'a> {
    records: StringRecordsIntoIter<&'a [u8]>,
    next_row_number: usize,
}

impl<'a> RecordFilter<'a> {
    pub fn new(body: &'a [u8]) -> Self {
        let reader = ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(body);

        Self {
            records: reader.into_records(),
            next_row_number: FIRST_DATA_ROW,
        }
    }
}

impl Iterator for RecordFilter<'_> {
    type Item = ImportResult<DocumentRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(ImportError::from(e))),
            };

            if is_blank_record(&record) {
                continue;
            }

            let row_number = self.next_row_number;
            self.next_row_number += 1;
            return Some(DocumentRow::from_record(row_number, &record));
        }
    }
}
