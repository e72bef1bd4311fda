pub mod builder;
pub mod channels;
pub mod settings;

pub use builder::build_mappings;
pub use settings::{StationSettings, TransportSettings};
