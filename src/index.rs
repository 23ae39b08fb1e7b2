use crate::percentile::{Percentile, PercentileAggregator};
use indexmap::IndexMap;

/// Bucket of running statistics: recipient, donor zip code and year.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregationKey {
    pub recipient_id: String,
    pub zip_code: String,
    pub year: i32,
}

impl AggregationKey {
    pub fn new(recipient_id: impl Into<String>, zip_code: impl Into<String>, year: i32) -> Self {
        Self {
            recipient_id: recipient_id.into(),
            zip_code: zip_code.into(),
            year,
        }
    }
}

/// Aggregators by key, created on first use and kept in insertion order.
#[derive(Debug, Clone)]
pub struct AggregationIndex {
    percentile: Percentile,
    aggregators: IndexMap<AggregationKey, PercentileAggregator>,
}

impl AggregationIndex {
    pub fn new(percentile: Percentile) -> Self {
        Self {
            percentile,
            aggregators: IndexMap::new(),
        }
    }

    pub fn get_or_create(&mut self, key: AggregationKey) -> &mut PercentileAggregator {
        let percentile = self.percentile;
        self.aggregators
            .entry(key)
            .or_insert_with(|| PercentileAggregator::new(percentile))
    }

    #[inline]
    pub fn get(&self, key: &AggregationKey) -> Option<&PercentileAggregator> {
        self.aggregators.get(key)
    }

    /// Keys and aggregators, first-created first.
    pub fn iter(&self) -> impl Iterator<Item = (&AggregationKey, &PercentileAggregator)> {
        self.aggregators.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.aggregators.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.aggregators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_get_or_create_reuses_aggregator() {
        let mut index = AggregationIndex::new(Percentile::new(Decimal::from(30)).unwrap());
        let key = AggregationKey::new("C1", "11111", 2017);

        assert!(index.get_or_create(key.clone()).is_empty());
        index.get_or_create(key.clone()).insert(Decimal::from(100));
        index.get_or_create(key.clone()).insert(Decimal::from(50));

        assert_eq!(index.len(), 1);
        let agg = index.get(&key).unwrap();
        assert_eq!(agg.count(), 2);
        assert_eq!(agg.total(), Decimal::from(150));
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut index = AggregationIndex::new(Percentile::new(Decimal::from(50)).unwrap());
        let keys = [
            AggregationKey::new("C2", "22222", 2018),
            AggregationKey::new("C1", "11111", 2017),
            AggregationKey::new("C2", "22222", 2017),
        ];
        for key in &keys {
            index.get_or_create(key.clone()).insert(Decimal::from(1));
        }
        index.get_or_create(keys[1].clone()).insert(Decimal::from(2));

        let order: Vec<_> = index.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(order, keys);
        assert!(index.get(&AggregationKey::new("C3", "33333", 2017)).is_none());
    }
}
