/// Main configuration module.
///
/// Re-exports submodules for gameplay constants and runtime settings.
pub mod game;
pub mod settings;

pub use settings::GameSettings;
