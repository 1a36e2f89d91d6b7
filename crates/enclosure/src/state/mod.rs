pub mod parameters;
pub mod scene;
pub mod settings;

pub use parameters::ParameterStore;
pub use scene::{ComponentGroup, ExtraVolume, NewGroup, Scene, WorldPose};
pub use settings::{EnclosureConfig, ExportNames};
