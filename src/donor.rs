use indexmap::{map::Entry, IndexMap};

/// Identity of a donor for repeat detection: name and 5-digit zip code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DonorKey {
    pub name: String,
    pub zip_code: String,
}

impl DonorKey {
    pub fn new(name: impl Into<String>, zip_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            zip_code: zip_code.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// First record seen for this donor. It is registered, never aggregated.
    New,
    /// The donor was seen before, first in `first_seen_year`.
    Repeat { first_seen_year: i32 },
}

/// Earliest year in which each donor has contributed.
///
/// Entries are write-once: the year recorded by a donor's first record is
/// never changed for the rest of the run.
#[derive(Debug, Clone, Default)]
pub struct DonorHistory {
    first_seen: IndexMap<DonorKey, i32>,
}

impl DonorHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies a record from `key` dated `year`, registering the donor if
    /// it has not been seen before.
    pub fn classify(&mut self, key: DonorKey, year: i32) -> Classification {
        match self.first_seen.entry(key) {
            Entry::Occupied(entry) => Classification::Repeat {
                first_seen_year: *entry.get(),
            },
            Entry::Vacant(entry) => {
                entry.insert(year);
                Classification::New
            }
        }
    }

    #[inline]
    pub fn first_seen(&self, key: &DonorKey) -> Option<i32> {
        self.first_seen.get(key).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.first_seen.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }
}
