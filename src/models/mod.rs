pub mod crop;
pub mod decision;
pub mod field;
pub mod prediction;
pub mod recommendation;

pub use crop::*;
pub use decision::*;
pub use field::*;
pub use prediction::*;
pub use recommendation::*;
