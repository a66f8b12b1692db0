pub mod document;
pub mod ids;
pub mod location;
pub mod moniker;
pub mod range;

pub use document::*;
pub use ids::*;
pub use location::*;
pub use moniker::*;
pub use range::*;
