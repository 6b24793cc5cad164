//! Player aggregation, prior fitting and ranking.
//!
//! Play records are reduced per player and joined with metadata, a Beta prior
//! is fit over the well-sampled players, and every player's success rate is
//! shrunk toward it before ranking. The filters in [`filter`] act on the
//! finished table.

pub mod aggregate;
pub mod filter;
pub mod prior;
pub mod ranking;
pub mod types;
pub mod utility;
