//! Data layer: booking records, loading, filtering and export.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → BookingTable (once, at startup)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ BookingTable  │  Vec<Booking>, immutable, shared via Arc
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  hotel / year / month predicates → View (row indices)
//!   └──────────┘
//!        │
//!        ├──► report::*   aggregate payloads
//!        └──► export      filtered rows as CSV
//! ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
