pub mod error;
pub mod id_generator;
pub mod result;

pub use error::*;
pub use id_generator::*;
pub use result::*;
