//! probe-table: a single-threaded open-addressing hash table that owns its
//! records and indexes them by a string key read through a user-supplied
//! extractor. Built for postal-code range data, usable for any record type.
//!
//! Internal Design:
//!
//! Summary
//! - One engine, `ProbeTable<R, F>`, with the collision strategy chosen at
//!   construction (`Strategy::DoubleHashing` or `Strategy::LinearProbing`)
//!   instead of one table per strategy.
//! - Layers:
//!   - `hashing`: `hash1` (seeded Murmur one-at-a-time) picks the home slot,
//!     `hash2` (Bernstein) picks the double-hashing step.
//!   - `strategy`: turns `(key, capacity)` into a `ProbeSeq` of at most
//!     `capacity` positions.
//!   - `probe_table`: the slot array (`Empty | Tombstone | Occupied(handle)`),
//!     a generational record arena, insert/lookup/delete and growth.
//!   - `postal`/`dataset`: postal-range records, the interval scan and CSV
//!     ingestion on top of the engine.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync` (the debug busy flag is a `Cell`).
//!   Concurrent use would need one exclusive lock around the whole table,
//!   since a resize moves every record to a new slot.
//! - Every operation visits at most `capacity` slots.
//! - Keys are not deduplicated. A second record with a live key is stored
//!   alongside the first; lookup and delete act on the first one met on the
//!   probe path.
//!
//! Slots and records
//! - Records live in a `slotmap::SlotMap`; an occupied slot stores only the
//!   record's key into that arena. Resizing rewrites the slot array but never
//!   moves a record, so `Handle`s stay valid until the record is deleted.
//! - Deleted slots become tombstones: lookups probe past them, inserts reuse
//!   them. `len()` never counts tombstones. Resizing drops them all.
//!
//! Growth
//! - Before an insert, the table doubles while `(len + 1) / capacity >=
//!   load_factor`, so `len < capacity * load_factor` holds after every insert.
//! - Growth re-places each live record through its probe path at the new
//!   capacity, in ascending old-slot order. The new array is built beside
//!   the old one and swapped in only when complete; an allocation failure
//!   leaves the table unchanged.
//! - If an insert's probe path holds no free slot (a double-hashing step that
//!   shares a factor with the capacity can cycle early), the table grows once
//!   unconditionally and retries once. A second failure returns
//!   `TableError::ProbeExhausted` together with the record.
//!
//! Reentrancy policy
//! - The key extractor is user code that runs while the slot array may be
//!   mid-rehash. Public entry points mark the table busy in debug builds, and
//!   calling into the table from inside the extractor panics with the names
//!   of both operations.
//! - Records removed by `delete`/`clear` are dropped after the table is no
//!   longer busy, so their `Drop` may use the table.
//!
//! Logging
//! - Uses the `log` facade: resizes at debug, forced resizes and exhausted
//!   probe paths at warn. No logger is installed by the crate.

pub mod config;
pub mod dataset;
pub mod error;
pub mod hashing;
pub mod postal;
pub mod probe_table;
mod probe_table_proptest;
mod reentrancy;
pub mod strategy;

// Public surface
pub use config::TableConfig;
pub use error::{DatasetError, InsertError, TableError};
pub use postal::{CodeRange, PostalRange, PostalTable};
pub use probe_table::{Handle, Iter, KeyFn, ProbeTable};
pub use strategy::{ProbeSeq, Strategy};
