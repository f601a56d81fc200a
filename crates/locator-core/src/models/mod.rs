pub mod location;
pub mod metadata;
pub mod transform;

pub use location::*;
pub use metadata::*;
pub use transform::*;
