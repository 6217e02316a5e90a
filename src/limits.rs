//! Hard caps guarding engine inputs.

/// Page size used when a listing request does not name one.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Largest page a single listing request may ask for.
pub const MAX_PAGE_SIZE: usize = 200;

/// Sanity bound on a single stay; longer ranges are rejected as input errors
/// rather than priced.
pub const MAX_STAY_NIGHTS: i64 = 366;
