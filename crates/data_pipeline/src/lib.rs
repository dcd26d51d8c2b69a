//! Report ingestion: picks a grammar from the report filename, scans the first sheet of
//! the workbook and appends every record to the injected sink.

pub mod grammar;

pub use grammar::{account_from_filename, ReportGrammar};

use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use models::{parse_report_date, ReportFamily};
use remainders::RemainderGrammar;
use report_common::{RowGrammar, Scan};
use serde::Serialize;
use thiserror::Error;
use turnovers::{Period, TurnoverGrammar};
use utils::{fields_of, RecordSink, SinkError};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Cannot open workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Workbook has no worksheets")]
    EmptyWorkbook,

    #[error("Cannot read report file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Ingested {
        grammar: ReportGrammar,
        records: usize,
    },
    /// The filename named no known account; nothing was read.
    Skipped,
}

impl IngestOutcome {
    pub fn records(&self) -> usize {
        match self {
            Self::Ingested { records, .. } => *records,
            Self::Skipped => 0,
        }
    }
}

/// One ingestion run writing into `sink`.
pub struct IngestPipeline<'s> {
    sink: &'s dyn RecordSink,
}

impl<'s> IngestPipeline<'s> {
    pub fn new(sink: &'s dyn RecordSink) -> Self {
        Self { sink }
    }

    /// Reads the report at `path`; its path is also the filename used for metadata.
    pub fn ingest_file<P: AsRef<Path>>(
        &self,
        path: P,
        family: ReportFamily,
    ) -> Result<IngestOutcome, IngestError> {
        let path = path.as_ref();
        let filename = path.to_string_lossy();
        let Some(grammar) = resolve_or_skip(family, &filename) else {
            return Ok(IngestOutcome::Skipped);
        };
        let bytes = fs::read(path)?;
        self.ingest_workbook(Cursor::new(bytes), &filename, grammar)
    }

    pub fn ingest_bytes(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        family: ReportFamily,
    ) -> Result<IngestOutcome, IngestError> {
        self.ingest_reader(Cursor::new(bytes), filename, family)
    }

    /// Ingests a workbook from any seekable source. `filename` is the name the report
    /// was uploaded under; it selects the grammar and carries the report period.
    pub fn ingest_reader<RS>(
        &self,
        reader: RS,
        filename: &str,
        family: ReportFamily,
    ) -> Result<IngestOutcome, IngestError>
    where
        RS: Read + Seek + Clone,
    {
        let Some(grammar) = resolve_or_skip(family, filename) else {
            return Ok(IngestOutcome::Skipped);
        };
        self.ingest_workbook(reader, filename, grammar)
    }

    /// Ingests an already loaded sheet.
    pub fn ingest_sheet(
        &self,
        range: &Range<Data>,
        filename: &str,
        family: ReportFamily,
    ) -> Result<IngestOutcome, IngestError> {
        let Some(grammar) = resolve_or_skip(family, filename) else {
            return Ok(IngestOutcome::Skipped);
        };
        self.ingest_range(range, filename, grammar)
    }

    fn ingest_workbook<RS>(
        &self,
        reader: RS,
        filename: &str,
        grammar: ReportGrammar,
    ) -> Result<IngestOutcome, IngestError>
    where
        RS: Read + Seek + Clone,
    {
        let mut workbook = open_workbook_auto_from_rs(reader)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(IngestError::EmptyWorkbook)??;
        self.ingest_range(&range, filename, grammar)
    }

    fn ingest_range(
        &self,
        range: &Range<Data>,
        filename: &str,
        grammar: ReportGrammar,
    ) -> Result<IngestOutcome, IngestError> {
        tracing::info!("Ingesting {:?} as {}", filename, grammar);

        let records = match grammar.family() {
            ReportFamily::Remainder => {
                let report_date = report_common::extract_report_date(filename);
                if parse_report_date(&report_date).is_none() {
                    tracing::warn!(
                        "Report date {:?} taken from {:?} is not a calendar date",
                        report_date,
                        filename
                    );
                }
                let rows = RemainderGrammar::for_account(grammar.account(), report_date);
                self.drain(Scan::new(range, rows), ReportFamily::Remainder)?
            }
            ReportFamily::Turnover => {
                let rows = TurnoverGrammar::for_account(
                    grammar.account(),
                    Period::from_filename(filename),
                );
                self.drain(Scan::new(range, rows), ReportFamily::Turnover)?
            }
        };

        tracing::info!("Appended {} records from {:?}", records, filename);
        Ok(IngestOutcome::Ingested { grammar, records })
    }

    fn drain<G>(&self, scan: Scan<'_, G>, family: ReportFamily) -> Result<usize, SinkError>
    where
        G: RowGrammar,
        G::Record: Serialize,
    {
        let mut appended = 0;
        for record in scan {
            self.sink.append(family, fields_of(&record)?)?;
            appended += 1;
        }
        Ok(appended)
    }
}

fn resolve_or_skip(family: ReportFamily, filename: &str) -> Option<ReportGrammar> {
    let grammar = ReportGrammar::resolve(family, filename);
    if grammar.is_none() {
        tracing::warn!("No account token in {:?}, skipping {} report", filename, family);
    }
    grammar
}
