pub mod audio;
pub mod localization;
pub mod preloader;
pub mod registry;
