pub mod helpers;
pub mod logging;
pub mod navigation;
pub mod settings;
pub mod surface;
