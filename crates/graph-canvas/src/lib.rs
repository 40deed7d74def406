pub mod app;
pub mod canvas;
pub mod config;
pub mod demo;
pub mod error;
pub mod items;
pub mod menu;
pub mod native;
pub mod scene;
pub mod signals;
pub mod view;

pub use app::GraphApp;
pub use config::ViewConfig;
pub use error::CanvasError;
pub use items::{ArcItem, ItemRef, NodeId, NodeItem, SceneItem};
pub use scene::{GraphScene, SceneNotification};
pub use signals::{Algorithm, ViewSignal};
pub use view::InteractiveView;

/// Builds the app with the view config found in the working directory.
pub fn create_app(_cc: &eframe::CreationContext<'_>) -> GraphApp {
    let config = ViewConfig::load_or_default(std::path::Path::new(config::CONFIG_FILE));
    GraphApp::new(&config)
}
