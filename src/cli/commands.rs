pub mod predict;
pub mod status;

pub use predict::predict;
pub use status::status;
