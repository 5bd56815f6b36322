//! `invtrack-batches` — the batch store.
//!
//! A [`Batch`] is one recorded delivery of one kind of item: quantity,
//! per-unit price, discount and GST breakdown, plus a denormalized snapshot
//! of the item and supplier as they were at purchase time. Batches are the
//! ground truth for stock math; nothing here stores a "remaining" quantity.

pub mod batch;
pub mod repo;
pub mod store;

pub use batch::{Batch, BatchPatch, NewBatch};
pub use repo::BatchRepository;
pub use store::{BatchStore, ItemSuggestion, SuggestionSource, SEARCH_RESULT_LIMIT};
