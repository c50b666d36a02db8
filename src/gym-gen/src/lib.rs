pub mod assembler;
pub mod dataset;
pub mod error;
pub mod names;
pub mod sampler;
pub mod writer;

pub use error::GymGenError;
pub use error::Result;
