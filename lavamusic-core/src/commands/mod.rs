pub mod manifest;
pub mod registry;

pub use registry::CommandRegistry;
