mod cfg;
mod class;
mod inst;
mod ty;

pub use class::*;
pub use inst::*;
pub use ty::Type;

pub type Label = util::Id;
