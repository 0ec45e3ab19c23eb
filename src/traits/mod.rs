pub mod engine;
pub mod module;

pub use engine::{AccelEngine, Capabilities, NativeChannel};
pub use module::{AccelModule, ModuleFini};
