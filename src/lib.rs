//! Booking availability and lifecycle engine for a hotel reservation backend.
//!
//! The [`engine::Engine`] owns the real invariants: free-inventory checks over
//! half-open date ranges, deterministic stay pricing, booking state
//! transitions, and role/ownership gating with cursor-paginated listing.
//! Persistence and identity are external collaborators: records live behind
//! the [`store`] traits and callers arrive as pre-verified [`model::Caller`]
//! values. Transport (routing, status codes) is the embedder's concern.

pub mod config;
pub mod engine;
pub mod limits;
pub mod model;
pub mod observability;
pub mod store;
