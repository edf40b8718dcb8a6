pub mod loader;
pub mod schema;
pub mod template;

pub use loader::{load_config, load_config_from_str, resolve_settings, ConfigFormat};
pub use schema::{
    Config, OcrConfig, ServerConfig, Settings, WatcherConfig, DEFAULT_OCR_ARGS, DEFAULT_OCR_EXEC,
};
pub use template::render_url_template;
