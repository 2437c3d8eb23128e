mod loader;
mod profile;

pub use loader::{
    load_config, FileConfig, LoadedConfig, OutputConfig, SessionDefaults, CONFIG_FILE_NAME,
};
pub use profile::{apply_config, AppliedConfig};
