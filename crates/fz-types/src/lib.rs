pub mod names;
pub mod value;
pub mod errors;

pub use names::*;
pub use value::*;
pub use errors::*;
