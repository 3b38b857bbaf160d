pub mod codegen;
mod error;
pub mod regalloc;

pub use codegen::JasminGenerator;
pub use error::CodegenError;
pub use regalloc::{allocate, AllocReport};
