//! Safe SQL builder: identifiers from descriptors only, values as parameters.

mod builder;
pub mod criteria;
pub mod params;
pub use builder::*;
pub use criteria::*;
pub use params::*;
