use std::fmt;
use std::path::{Path, PathBuf};

/// Install bases checked when no agents directory is configured, in order
const COMMON_BASES: &[&str] = &[
    "~/.clawdbot",
    "~/.config/clawdbot",
    "/usr/local/etc/clawdbot",
    "/opt/clawdbot",
];

const AGENTS_SUBDIR: &str = "agents";

/// How the agents directory was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionSource {
    /// Set by flag, environment or config file
    Configured,
    /// Found under one of the common install locations
    DefaultPath,
    /// Nothing found; falling back to `~/.clawdbot/agents`
    NotFound,
}

impl fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DetectionSource::Configured => "Custom path",
            DetectionSource::DefaultPath => "Default path",
            DetectionSource::NotFound => "Not found",
        };
        f.write_str(label)
    }
}

/// Agents directory together with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentsDir {
    pub path: PathBuf,
    pub source: DetectionSource,
}

/// Resolve the agents directory.
///
/// An explicit path is taken as is, even if it does not exist yet; the scans
/// simply return nothing for it.
pub fn resolve_agents_dir(explicit: Option<&str>) -> AgentsDir {
    if let Some(custom) = explicit.filter(|p| !p.trim().is_empty()) {
        return AgentsDir {
            path: expand(custom),
            source: DetectionSource::Configured,
        };
    }

    detect_in(COMMON_BASES.iter().map(|base| expand(base)))
}

fn detect_in(bases: impl IntoIterator<Item = PathBuf>) -> AgentsDir {
    let mut fallback = None;

    for base in bases {
        let agents = base.join(AGENTS_SUBDIR);
        if agents.is_dir() {
            return AgentsDir {
                path: agents,
                source: DetectionSource::DefaultPath,
            };
        }
        fallback.get_or_insert(agents);
    }

    AgentsDir {
        path: fallback.unwrap_or_else(|| expand("~/.clawdbot").join(AGENTS_SUBDIR)),
        source: DetectionSource::NotFound,
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Short form of a path for display, with the home directory as `~`
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}
