use crate::domain::ports::ToolProbe;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const BROWSER_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
];

/// Looks for a headless-capable browser: an explicit path first, then the
/// usual executable names on `PATH`.
#[derive(Debug, Clone)]
pub struct BrowserProbe {
    explicit: Option<PathBuf>,
    search_path: Option<OsString>,
}

impl BrowserProbe {
    pub fn new(explicit: Option<PathBuf>, search_path: Option<OsString>) -> Self {
        Self {
            explicit,
            search_path,
        }
    }

    pub fn from_env(explicit: Option<PathBuf>) -> Self {
        Self::new(explicit, std::env::var_os("PATH"))
    }

    fn search(&self, name: &Path) -> Option<PathBuf> {
        let paths = self.search_path.as_ref()?;
        std::env::split_paths(paths)
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable(candidate))
    }
}

impl ToolProbe for BrowserProbe {
    fn locate(&self) -> Option<PathBuf> {
        match &self.explicit {
            // 明確指定但找不到時視為未安裝，不退回搜尋 PATH
            Some(path) if path.components().count() > 1 => {
                is_executable(path).then(|| path.clone())
            }
            Some(name) => self.search(name),
            None => BROWSER_CANDIDATES
                .iter()
                .find_map(|name| self.search(Path::new(name))),
        }
    }

    fn describe(&self) -> String {
        match &self.explicit {
            Some(path) => format!("browser at {}", path.display()),
            None => format!("any of {} on PATH", BROWSER_CANDIDATES.join(", ")),
        }
    }
}

fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}
