//! Core of daylens: turns one snapshot of calendar events into a swimlane
//! timeline layout, an aggregate summary, and renderer-agnostic
//! [`RenderCommand`](daylens_protocol::RenderCommand) lists.
//!
//! ```text
//!   CalendarSource ──▶ Vec<Event> ──▶ group_by_category ──▶ assign_lanes ──▶ build_layout
//!   (JSON export,        (model)                             (per category)     (Layout)
//!    TTL cache)                                                                   │
//!                                   summarize ──▶ Summary                         ▼
//!                                                    └──────────▶ views::* ──▶ RenderCommand[]
//! ```

pub mod config;
pub mod error;
pub mod lanes;
pub mod layout;
pub mod model;
pub mod notes;
pub mod range;
pub mod source;
pub mod summary;
pub mod svg;
pub mod table;
pub mod views;

pub use error::Error;
