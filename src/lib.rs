pub mod backend;
pub mod error;
pub mod gui;
pub mod keyrepeat;
pub mod layout;
pub mod logging;
pub mod notifier;
pub mod overlay;
pub mod service;
pub mod settings;
pub mod slider;
pub mod stream;
pub mod timer;
