//! Repeat-donor analytics for FEC campaign contributions
//!
//! Streams individual contribution records and, for every contribution from
//! a donor who has given before, reports the running total, transaction count
//! and exact [nearest-rank
//! percentile](https://en.wikipedia.org/wiki/Percentile#The_nearest-rank_method)
//! of contributions to the same recipient from the same zip code in the same
//! year. Percentiles are maintained with a pair of heaps, so each record costs
//! `O(log n)` regardless of how many amounts a bucket has seen.
//!
//! ## Example
//!
//! ```rust
//! use donation_analytics::{Contribution, Outcome, Percentile, StreamProcessor};
//!
//! let mut processor = StreamProcessor::new("30".parse::<Percentile>().unwrap());
//! let line = |date: &str, amount: &str| -> Contribution {
//!     format!("C00384516|N|M2|P|1|15|IND|SABOURIN, JAMES|LOOKOUT MOUNTAIN|GA|028956146|W|O|{date}|{amount}||x|1|||1")
//!         .parse()
//!         .unwrap()
//! };
//!
//! assert_eq!(processor.process(line("01312017", "230")), Outcome::NewDonor);
//!
//! processor.process(line("01122018", "333"));
//! let summary = processor.process(line("01312018", "384")).into_summary().unwrap();
//! assert_eq!(summary.to_string(), "C00384516|02895|2018|333|717|2");
//! ```

mod donor;
mod error;
mod index;
mod percentile;
mod pipeline;
mod processor;
mod record;

pub use donor::*;
pub use error::*;
pub use index::*;
pub use percentile::*;
pub use pipeline::*;
pub use processor::*;
pub use record::*;
