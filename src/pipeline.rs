use crate::{
    error::{Error, RecordError},
    percentile::Percentile,
    processor::{Outcome, StreamProcessor},
    record::Contribution,
};
use csv::{ErrorKind, ReaderBuilder, StringRecord};
use std::io::{Read, Write};
use tracing::debug;

/// Counters for one run of [`run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub records: usize,
    pub rejected: usize,
    pub new_donors: usize,
    pub prior_year: usize,
    pub emitted: usize,
}

/// Streams `itcont.txt` records from `input` and writes one summary line to
/// `output` for each contribution from a repeat donor.
///
/// Malformed records are logged and skipped. I/O failures end the run.
pub fn run<R: Read, W: Write>(
    percentile: Percentile,
    input: R,
    mut output: W,
) -> Result<RunStats, Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(input);
    let mut processor = StreamProcessor::new(percentile);
    let mut stats = RunStats::default();
    let mut record = StringRecord::new();

    loop {
        let parsed = match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => Contribution::from_record(&record),
            Err(err) if matches!(err.kind(), ErrorKind::Utf8 { .. }) => {
                Err(RecordError::InvalidEncoding)
            }
            Err(err) => return Err(err.into()),
        };
        stats.records += 1;

        let contribution = match parsed {
            Ok(contribution) => contribution,
            Err(err) => {
                debug!(line = reader.position().line(), %err, "skipping malformed record");
                stats.rejected += 1;
                continue;
            }
        };

        match processor.process(contribution) {
            Outcome::NewDonor => stats.new_donors += 1,
            Outcome::PriorYear { .. } => stats.prior_year += 1,
            Outcome::Emitted(summary) => {
                writeln!(output, "{summary}")?;
                stats.emitted += 1;
            }
        }
    }

    output.flush()?;
    debug!(
        donors = processor.donors().len(),
        keys = processor.index().len(),
        "stream exhausted"
    );
    Ok(stats)
}
