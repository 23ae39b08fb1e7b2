use crate::{
    donor::{Classification, DonorHistory, DonorKey},
    index::{AggregationIndex, AggregationKey},
    percentile::{Percentile, Snapshot},
    record::Contribution,
};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use tracing::trace;

/// Output line for one qualifying contribution.
///
/// Displays as `CMTE_ID|ZIP_CODE|YEAR|PERCENTILE|TOTAL|COUNT`, with the
/// percentile and total rounded to whole dollars (half away from zero).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub key: AggregationKey,
    pub snapshot: Snapshot,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}|{}",
            self.key.recipient_id,
            self.key.zip_code,
            self.key.year,
            whole_dollars(self.snapshot.percentile_value),
            whole_dollars(self.snapshot.total_amount),
            self.snapshot.transaction_count,
        )
    }
}

fn whole_dollars(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// What happened to a single contribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// First record from this donor; registered only.
    NewDonor,
    /// Repeat donor, but dated before the donor's first-seen year.
    PriorYear { first_seen_year: i32 },
    Emitted(Summary),
}

impl Outcome {
    pub fn summary(&self) -> Option<&Summary> {
        match self {
            Outcome::Emitted(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn into_summary(self) -> Option<Summary> {
        match self {
            Outcome::Emitted(summary) => Some(summary),
            _ => None,
        }
    }
}

/// Single-pass repeat-donor aggregation over validated contributions.
///
/// Owns all run state. Records must be fed in arrival order: both donor
/// classification and the running percentiles depend on it.
#[derive(Debug, Clone)]
pub struct StreamProcessor {
    donors: DonorHistory,
    index: AggregationIndex,
}

impl StreamProcessor {
    pub fn new(percentile: Percentile) -> Self {
        Self {
            donors: DonorHistory::new(),
            index: AggregationIndex::new(percentile),
        }
    }

    pub fn process(&mut self, record: Contribution) -> Outcome {
        let Contribution {
            recipient_id,
            donor_name,
            zip_code,
            year,
            amount,
        } = record;

        let donor = DonorKey::new(donor_name, zip_code.clone());
        let first_seen_year = match self.donors.classify(donor, year) {
            Classification::New => {
                trace!(%zip_code, year, "new donor");
                return Outcome::NewDonor;
            }
            Classification::Repeat { first_seen_year } => first_seen_year,
        };
        if year < first_seen_year {
            trace!(%zip_code, year, first_seen_year, "repeat donor record predates first contribution");
            return Outcome::PriorYear { first_seen_year };
        }

        let key = AggregationKey::new(recipient_id, zip_code, year);
        let snapshot = self.index.get_or_create(key.clone()).insert(amount);
        trace!(
            recipient_id = %key.recipient_id,
            zip_code = %key.zip_code,
            year,
            count = snapshot.transaction_count,
            "repeat donor contribution aggregated"
        );
        Outcome::Emitted(Summary { key, snapshot })
    }

    #[inline]
    pub fn donors(&self) -> &DonorHistory {
        &self.donors
    }

    #[inline]
    pub fn index(&self) -> &AggregationIndex {
        &self.index
    }
}
