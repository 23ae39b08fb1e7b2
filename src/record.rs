//! Validation of pipe-delimited FEC individual contribution records
//! (`itcont.txt`).

use crate::error::RecordError;
use chrono::{Datelike, NaiveDate};
use csv::StringRecord;
use rust_decimal::Decimal;
use std::str::FromStr;

const CMTE_ID: usize = 0;
const NAME: usize = 7;
const ZIP_CODE: usize = 10;
const TRANSACTION_DT: usize = 13;
const TRANSACTION_AMT: usize = 14;
const OTHER_ID: usize = 15;

const MIN_FIELDS: usize = OTHER_ID + 1;
const ZIP_LEN: usize = 5;

/// Largest accepted amount. Keeps running totals far from `Decimal::MAX`.
const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// An individual contribution accepted by the validator.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub recipient_id: String,
    pub donor_name: String,
    /// First five digits of the donor's zip code.
    pub zip_code: String,
    pub year: i32,
    pub amount: Decimal,
}

impl Contribution {
    pub fn from_record(record: &StringRecord) -> Result<Self, RecordError> {
        if record.len() < MIN_FIELDS {
            return Err(RecordError::TooFewFields {
                expected: MIN_FIELDS,
                found: record.len(),
            });
        }
        let field = |i: usize| record.get(i).unwrap_or_default();

        if !field(OTHER_ID).is_empty() {
            return Err(RecordError::NotIndividual);
        }
        let recipient_id = field(CMTE_ID);
        if recipient_id.is_empty() {
            return Err(RecordError::MissingRecipient);
        }
        let donor_name = field(NAME);
        if donor_name.is_empty() {
            return Err(RecordError::MissingName);
        }

        Ok(Self {
            recipient_id: recipient_id.to_owned(),
            donor_name: donor_name.to_owned(),
            zip_code: parse_zip_code(field(ZIP_CODE))?.to_owned(),
            year: parse_year(field(TRANSACTION_DT))?,
            amount: parse_amount(field(TRANSACTION_AMT))?,
        })
    }
}

impl FromStr for Contribution {
    type Err = RecordError;

    /// Parses a single line without its terminator.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        Self::from_record(&line.split('|').collect::<StringRecord>())
    }
}

fn parse_zip_code(raw: &str) -> Result<&str, RecordError> {
    if raw.len() < ZIP_LEN || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RecordError::InvalidZipCode(raw.to_owned()));
    }
    Ok(&raw[..ZIP_LEN])
}

/// Year of an `MMDDYYYY` date.
fn parse_year(raw: &str) -> Result<i32, RecordError> {
    let invalid = || RecordError::InvalidDate(raw.to_owned());
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, "%m%d%Y")
        .map(|date| date.year())
        .map_err(|_| invalid())
}

fn parse_amount(raw: &str) -> Result<Decimal, RecordError> {
    match Decimal::from_str(raw.trim()) {
        Ok(amount) if amount >= Decimal::ZERO && amount <= MAX_AMOUNT => Ok(amount),
        _ => Err(RecordError::InvalidAmount(raw.to_owned())),
    }
}
