//! UI layer: app shell, scene painting, theme, and the ambient
//! timeline document.

pub mod app;
pub mod scene;
pub mod theme;
pub mod timeline;

pub use app::{DashboardApp, StartupConfig};
