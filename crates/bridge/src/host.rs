use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
    time::Instant,
};

use anyhow::{Context as _, Result};
use plugin_core::{CommandSpec, Host, HookId, Signal, pattern_matches};
use tracing::{debug, warn};

#[derive(Debug)]
struct State {
    options: BTreeMap<String, String>,
    hooks: BTreeMap<HookId, Signal>,
    next_hook: u64,
    commands: Vec<CommandSpec>,
    config_patterns: Vec<String>,
    last_activity: Instant,
}

/// Console host: options persisted to a JSON file, output on stdout, idle
/// time measured from the last line the user typed.
#[derive(Debug)]
pub(crate) struct StdioHost {
    app_name: String,
    plugin: String,
    settings_path: PathBuf,
    state: Mutex<State>,
}

impl StdioHost {
    pub(crate) fn open(
        app_name: impl Into<String>,
        plugin: impl Into<String>,
        settings_path: &Path,
    ) -> Result<Self> {
        let options = load_options(settings_path)?;
        Ok(Self {
            app_name: app_name.into(),
            plugin: plugin.into(),
            settings_path: settings_path.to_path_buf(),
            state: Mutex::new(State {
                options,
                hooks: BTreeMap::new(),
                next_hook: 0,
                commands: Vec::new(),
                config_patterns: Vec::new(),
                last_activity: Instant::now(),
            }),
        })
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record user activity, resetting the idle clock.
    pub(crate) fn touch(&self) {
        self.state().last_activity = Instant::now();
    }

    pub(crate) fn is_hooked(&self, signal: Signal) -> bool {
        self.state().hooks.values().any(|s| *s == signal)
    }

    pub(crate) fn has_command(&self, name: &str) -> bool {
        self.state().commands.iter().any(|c| c.name == name)
    }

    pub(crate) fn command(&self, name: &str) -> Option<CommandSpec> {
        self.state().commands.iter().find(|c| c.name == name).cloned()
    }

    /// Fully qualified host name of a plugin option.
    pub(crate) fn full_option_name(&self, option: &str) -> String {
        format!("plugins.var.{}.{option}", self.plugin)
    }

    /// Whether a config hook covers `full_name`.
    pub(crate) fn watches(&self, full_name: &str) -> bool {
        self.state()
            .config_patterns
            .iter()
            .any(|p| pattern_matches(p, full_name))
    }

    fn persist(&self, options: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.settings_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(options)?;
        fs::write(&self.settings_path, data).with_context(|| {
            format!(
                "writing settings file at {}",
                self.settings_path.display()
            )
        })?;
        Ok(())
    }
}

fn load_options(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading settings file at {}", path.display()))?;
    if data.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(&data)
        .with_context(|| format!("parsing settings file at {}", path.display()))
}

impl Host for StdioHost {
    fn app_name(&self) -> &str {
        &self.app_name
    }

    fn option_is_set(&self, name: &str) -> bool {
        self.state().options.contains_key(name)
    }

    fn option_get(&self, name: &str) -> Option<String> {
        self.state().options.get(name).cloned()
    }

    fn option_set(&self, name: &str, value: &str) {
        let mut state = self.state();
        state.options.insert(name.to_owned(), value.to_owned());
        if let Err(e) = self.persist(&state.options) {
            warn!(error = %e, option = name, "Failed to save settings");
        }
    }

    fn idle_seconds(&self) -> u64 {
        self.state().last_activity.elapsed().as_secs()
    }

    fn hook_signal(&self, signal: Signal) -> HookId {
        let mut state = self.state();
        state.next_hook += 1;
        let id = HookId(state.next_hook);
        state.hooks.insert(id, signal);
        debug!(signal = %signal, hook = id.0, "Signal hooked");
        id
    }

    fn unhook(&self, hook: HookId) {
        if let Some(signal) = self.state().hooks.remove(&hook) {
            debug!(signal = %signal, hook = hook.0, "Signal unhooked");
        }
    }

    fn hook_command(&self, command: &CommandSpec) {
        let mut state = self.state();
        state.commands.retain(|c| c.name != command.name);
        state.commands.push(command.clone());
    }

    fn hook_config(&self, pattern: &str) {
        self.state().config_patterns.push(pattern.to_owned());
    }

    fn print(&self, line: &str) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn options_survive_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/settings.json");

        let host = StdioHost::open("chat", "weegram", &path).unwrap();
        host.option_set("chatid", "42");
        drop(host);

        let reopened = StdioHost::open("chat", "weegram", &path).unwrap();
        assert_eq!(reopened.option_get("chatid").as_deref(), Some("42"));
        assert!(!reopened.option_is_set("token"));
    }

    #[test]
    fn corrupt_settings_file_fails_to_open() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "[not, an, object").unwrap();

        assert!(StdioHost::open("chat", "weegram", &path).is_err());
    }

    #[test]
    fn hooks_are_tracked_per_signal() {
        let tmp = TempDir::new().unwrap();
        let host = StdioHost::open("chat", "weegram", &tmp.path().join("s.json")).unwrap();

        let pm = host.hook_signal(Signal::PrivateMessage);
        assert!(host.is_hooked(Signal::PrivateMessage));
        assert!(!host.is_hooked(Signal::Highlight));

        host.unhook(pm);
        assert!(!host.is_hooked(Signal::PrivateMessage));
    }

    #[test]
    fn config_patterns_match_full_option_names() {
        let tmp = TempDir::new().unwrap();
        let host = StdioHost::open("chat", "weegram", &tmp.path().join("s.json")).unwrap();
        let full = host.full_option_name("enabled");
        assert_eq!(full, "plugins.var.weegram.enabled");
        assert!(!host.watches(&full));

        host.hook_config("plugins.var.weegram.*");

        assert!(host.watches(&full));
    }

    #[test]
    fn fresh_host_is_not_idle() {
        let tmp = TempDir::new().unwrap();
        let host = StdioHost::open("chat", "weegram", &tmp.path().join("s.json")).unwrap();
        host.touch();
        assert!(host.idle_seconds() < 5);
    }
}
