pub mod drift;
pub mod ground;
pub mod surface;

pub use drift::DriftStage;
pub use ground::GroundStage;
pub use surface::SurfaceStage;
