//! Shell host: the native wrapper that loads the bundled page into an embedded browser
//! surface. Back presses go to page history first, then to the platform.

pub const DEFAULT_ENTRY_PATH: &str = "index.html";

/// Capabilities granted to the embedded page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSettings {
    pub script_enabled: bool,
    pub dom_storage_enabled: bool,
    pub file_access_from_file_urls: bool,
    pub universal_access_from_file_urls: bool,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            script_enabled: true,
            dom_storage_enabled: true,
            file_access_from_file_urls: true,
            universal_access_from_file_urls: true,
        }
    }
}

/// Outcome of a back press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackAction {
    /// The page went back to `url`.
    PageHistory { url: String },
    /// Nothing to go back to; the platform handles it (usually closing the app).
    NativeDefault,
}

#[derive(Debug, Clone)]
pub struct ShellHost {
    settings: SurfaceSettings,
    history: Vec<String>,
}

impl ShellHost {
    /// Loads `entry_url` as the first page.
    pub fn launch(entry_url: impl Into<String>, settings: SurfaceSettings) -> Self {
        let entry = entry_url.into();
        tracing::info!(
            target: "mindcopy::shell",
            entry = %entry,
            script = settings.script_enabled,
            storage = settings.dom_storage_enabled,
            "shell surface loaded"
        );
        Self {
            settings,
            history: vec![entry],
        }
    }

    pub fn settings(&self) -> SurfaceSettings {
        self.settings
    }

    /// The page loaded at launch.
    pub fn entry_url(&self) -> &str {
        self.history.first().map(String::as_str).unwrap_or(DEFAULT_ENTRY_PATH)
    }

    pub fn current_url(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    /// In-page navigation pushes onto history.
    pub fn navigate(&mut self, url: impl Into<String>) {
        self.history.push(url.into());
    }

    pub fn can_go_back(&self) -> bool {
        self.history.len() > 1
    }

    pub fn on_back_pressed(&mut self) -> BackAction {
        if !self.can_go_back() {
            return BackAction::NativeDefault;
        }
        self.history.pop();
        match self.current_url() {
            Some(url) => BackAction::PageHistory {
                url: url.to_string(),
            },
            None => BackAction::NativeDefault,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_script_and_storage() {
        let s = SurfaceSettings::default();
        assert!(s.script_enabled && s.dom_storage_enabled);
    }

    #[test]
    fn back_walks_page_history_then_falls_through() {
        let mut shell = ShellHost::launch("file:///www/index.html", SurfaceSettings::default());
        assert!(!shell.can_go_back());
        shell.navigate("file:///www/index.html#logs");
        shell.navigate("file:///www/index.html#docs");

        assert_eq!(
            shell.on_back_pressed(),
            BackAction::PageHistory {
                url: "file:///www/index.html#logs".into()
            }
        );
        assert_eq!(
            shell.on_back_pressed(),
            BackAction::PageHistory {
                url: "file:///www/index.html".into()
            }
        );
        assert_eq!(shell.on_back_pressed(), BackAction::NativeDefault);
        assert_eq!(shell.current_url(), Some("file:///www/index.html"));
        assert_eq!(shell.entry_url(), "file:///www/index.html");
    }
}
