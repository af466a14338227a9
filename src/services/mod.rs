// tabkeeper services
// Services provide stateless or configuration-level functionality: the page
// metadata probe, settings persistence and logging setup.

pub mod logging;
pub mod metadata_probe;
pub mod settings_engine;
