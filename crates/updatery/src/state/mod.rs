mod panel;
mod slot;

pub use panel::*;
pub use slot::*;
