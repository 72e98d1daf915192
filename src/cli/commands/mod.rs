pub mod doctor;
pub mod serve;
pub mod sessions;
pub mod usage;

use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::paths::{resolve_agents_dir, AgentsDir};
use crate::usage::ScanOptions;

/// Resolve the agents directory (flag or env over config over detection)
/// and build scan options from it
pub fn scan_setup(global: &GlobalArgs, config: &Config) -> (AgentsDir, ScanOptions) {
    let explicit = global
        .agents_dir
        .as_deref()
        .or(config.agents_dir.as_deref());
    let agents_dir = resolve_agents_dir(explicit);
    let options = config.scan_options(agents_dir.path.clone());
    (agents_dir, options)
}
