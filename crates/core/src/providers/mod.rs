pub mod attributes;
pub mod provider;
pub mod registry;

pub use attributes::scan_markers;
pub use provider::*;
pub use registry::*;
