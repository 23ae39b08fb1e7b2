use crate::error::Error;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use std::{cmp::Reverse, collections::BinaryHeap, fmt, str::FromStr};

/// Target percentile `p` of a run, with `0 < p <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Percentile(Decimal);

impl Percentile {
    pub fn new(p: Decimal) -> Result<Self, Error> {
        if p > Decimal::ZERO && p <= Decimal::ONE_HUNDRED {
            Ok(Self(p))
        } else {
            Err(Error::InvalidPercentile {
                value: p.to_string(),
            })
        }
    }

    #[inline]
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Ordinal position `ceil(p / 100 * n)` of the
    /// [nearest-rank](https://en.wikipedia.org/wiki/Percentile#The_nearest-rank_method)
    /// percentile in an ascending sample of size `n`, clamped to `1..=n` for
    /// any non-empty sample.
    pub fn rank(&self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let rank = (self.0 * Decimal::from(n) / Decimal::ONE_HUNDRED).ceil();
        rank.to_usize().unwrap_or(n).clamp(1, n)
    }
}

impl FromStr for Percentile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let p = Decimal::from_str(trimmed).map_err(|_| Error::InvalidPercentile {
            value: trimmed.to_owned(),
        })?;
        Self::new(p)
    }
}

impl fmt::Display for Percentile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Running statistics reported after each insertion, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub total_amount: Decimal,
    pub transaction_count: usize,
    pub percentile_value: Decimal,
}

/// Exact online nearest-rank percentile with running total and count.
///
/// Inserted amounts are split in two heaps: `low` holds the smallest
/// `rank(count)` values and `high` holds the rest, so the largest value of
/// `low` is always the percentile. Each insertion costs `O(log n)`.
#[derive(Debug, Clone)]
pub struct PercentileAggregator {
    percentile: Percentile,
    low: BinaryHeap<Decimal>,
    high: BinaryHeap<Reverse<Decimal>>,
    count: usize,
    total: Decimal,
}

impl PercentileAggregator {
    pub fn new(percentile: Percentile) -> Self {
        Self {
            percentile,
            low: BinaryHeap::new(),
            high: BinaryHeap::new(),
            count: 0,
            total: Decimal::ZERO,
        }
    }

    /// Number of inserted amounts.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Exact sum of inserted amounts.
    #[inline]
    pub fn total(&self) -> Decimal {
        self.total
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Current nearest-rank percentile, or `None` before the first insertion.
    #[inline]
    pub fn percentile_value(&self) -> Option<Decimal> {
        self.low.peek().copied()
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.percentile_value().map(|percentile_value| Snapshot {
            total_amount: self.total,
            transaction_count: self.count,
            percentile_value,
        })
    }

    /// Adds `amount` and returns the updated statistics.
    pub fn insert(&mut self, amount: Decimal) -> Snapshot {
        self.count += 1;
        self.total += amount;
        let target_rank = self.percentile.rank(self.count);

        match self.low.peek() {
            Some(&max) if amount > max => self.high.push(Reverse(amount)),
            _ => self.low.push(amount),
        }

        while self.low.len() > target_rank {
            let Some(max) = self.low.pop() else { break };
            self.high.push(Reverse(max));
        }
        while self.low.len() < target_rank {
            let Some(Reverse(min)) = self.high.pop() else {
                break;
            };
            self.low.push(min);
        }

        Snapshot {
            total_amount: self.total,
            transaction_count: self.count,
            // `low` holds at least one value once `count >= 1`.
            percentile_value: self.percentile_value().unwrap_or(amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn percentile(s: &str) -> Percentile {
        Percentile::new(dec(s)).unwrap()
    }

    #[test]
    fn test_percentile_bounds() {
        assert!(Percentile::new(dec("0")).is_err());
        assert!(Percentile::new(dec("-5")).is_err());
        assert!(Percentile::new(dec("100.5")).is_err());
        assert!(Percentile::new(dec("100")).is_ok());
        assert!(Percentile::new(dec("0.01")).is_ok());
    }

    #[test]
    fn test_percentile_from_str() {
        assert_eq!("30\n".parse::<Percentile>().unwrap().value(), dec("30"));
        assert_eq!(" 12.5 ".parse::<Percentile>().unwrap().value(), dec("12.5"));
        assert!("thirty".parse::<Percentile>().is_err());
        assert!("NaN".parse::<Percentile>().is_err());
        assert!("".parse::<Percentile>().is_err());
        assert!("0".parse::<Percentile>().is_err());
    }

    #[test]
    fn test_rank() {
        let p = percentile("30");
        assert_eq!(p.rank(0), 0);
        assert_eq!(p.rank(1), 1);
        assert_eq!(p.rank(2), 1);
        assert_eq!(p.rank(3), 1);
        assert_eq!(p.rank(4), 2);
        assert_eq!(p.rank(10), 3);
        assert_eq!(p.rank(11), 4);

        assert_eq!(percentile("100").rank(7), 7);

        let tiny = percentile("0.01");
        assert_eq!(tiny.rank(1), 1);
        assert_eq!(tiny.rank(10_000), 1);
        assert_eq!(tiny.rank(10_001), 2);
    }

    #[test]
    fn test_rank_is_exact_just_above_a_whole_product() {
        // 3 * p / 100 is a hair above 1
        let p = percentile("33.333333333333336");
        assert_eq!(p.rank(3), 2);
        assert_eq!(percentile("33.3333").rank(3), 1);
        assert_eq!(percentile("66.67").rank(3), 3);
    }

    #[test]
    fn test_empty_aggregator() {
        let agg = PercentileAggregator::new(percentile("30"));
        assert!(agg.is_empty());
        assert_eq!(agg.percentile_value(), None);
        assert_eq!(agg.snapshot(), None);
    }

    #[test]
    fn test_insert_sequence() {
        let mut agg = PercentileAggregator::new(percentile("30"));

        let s = agg.insert(dec("100"));
        assert_eq!(s.transaction_count, 1);
        assert_eq!(s.total_amount, dec("100"));
        assert_eq!(s.percentile_value, dec("100"));

        let s = agg.insert(dec("50"));
        assert_eq!(s.transaction_count, 2);
        assert_eq!(s.total_amount, dec("150"));
        assert_eq!(s.percentile_value, dec("50"));

        agg.insert(dec("75"));
        let s = agg.insert(dec("200"));
        // sorted [50, 75, 100, 200], rank ceil(1.2) = 2
        assert_eq!(s.percentile_value, dec("75"));
        assert_eq!(s.total_amount, dec("425"));
        assert_eq!(agg.snapshot(), Some(s));
    }

    #[test]
    fn test_ties() {
        let mut agg = PercentileAggregator::new(percentile("50"));
        for _ in 0..5 {
            assert_eq!(agg.insert(dec("10")).percentile_value, dec("10"));
        }
        for _ in 0..4 {
            assert_eq!(agg.insert(dec("1")).percentile_value, dec("10"));
        }
        // [1 x5, 10 x5], rank 5
        assert_eq!(agg.insert(dec("1")).percentile_value, dec("1"));
    }

    #[test]
    fn test_cent_amounts_sum_exactly() {
        let mut agg = PercentileAggregator::new(percentile("30"));
        let amounts = [
            "72.28", "802.44", "652.86", "987", "608.53", "951.28", "31.71", "645.4",
        ];
        let mut last = None;
        for amount in amounts {
            last = Some(agg.insert(dec(amount)));
        }
        let s = last.unwrap();
        assert_eq!(s.total_amount, dec("4751.50"));
        assert_eq!(s.transaction_count, 8);
        // sorted [31.71, 72.28, 608.53, ...], rank ceil(2.4) = 3
        assert_eq!(s.percentile_value, dec("608.53"));
    }
}
