//! Records exchanged with the brand management API.

pub mod brand;
pub mod company;
pub mod timestamp;

pub use brand::{Brand, CreateBrandRequest, UpdateBrandRequest};
pub use company::Company;
pub use timestamp::ServerTimestamp;

/// Server-assigned brand identifier.
pub type BrandId = i64;

/// Identifier of a company (chain).
pub type ChainId = i64;
