//! In-memory [`Host`] used by tests across the workspace.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{CommandSpec, Host, HookId, Signal};

#[derive(Debug, Default)]
struct Inner {
    options: BTreeMap<String, String>,
    hooks: BTreeMap<HookId, Signal>,
    next_hook: u64,
    registrations: usize,
    printed: Vec<String>,
    commands: Vec<CommandSpec>,
    config_patterns: Vec<String>,
    idle_seconds: u64,
}

#[derive(Debug)]
pub struct MemoryHost {
    app_name: String,
    inner: Mutex<Inner>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new("testchat")
    }
}

impl MemoryHost {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            inner: Mutex::new(Inner::default()),
        }
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_idle_seconds(&self, secs: u64) {
        self.inner().idle_seconds = secs;
    }

    #[must_use]
    pub fn printed(&self) -> Vec<String> {
        self.inner().printed.clone()
    }

    pub fn clear_printed(&self) {
        self.inner().printed.clear();
    }

    /// Signals currently hooked, in registration order.
    #[must_use]
    pub fn active_hooks(&self) -> Vec<Signal> {
        self.inner().hooks.values().copied().collect()
    }

    /// Total number of `hook_signal` calls ever made.
    #[must_use]
    pub fn registrations(&self) -> usize {
        self.inner().registrations
    }

    #[must_use]
    pub fn commands(&self) -> Vec<CommandSpec> {
        self.inner().commands.clone()
    }

    #[must_use]
    pub fn config_patterns(&self) -> Vec<String> {
        self.inner().config_patterns.clone()
    }
}

impl Host for MemoryHost {
    fn app_name(&self) -> &str {
        &self.app_name
    }

    fn option_is_set(&self, name: &str) -> bool {
        self.inner().options.contains_key(name)
    }

    fn option_get(&self, name: &str) -> Option<String> {
        self.inner().options.get(name).cloned()
    }

    fn option_set(&self, name: &str, value: &str) {
        self.inner()
            .options
            .insert(name.to_owned(), value.to_owned());
    }

    fn idle_seconds(&self) -> u64 {
        self.inner().idle_seconds
    }

    fn hook_signal(&self, signal: Signal) -> HookId {
        let mut inner = self.inner();
        inner.next_hook += 1;
        inner.registrations += 1;
        let id = HookId(inner.next_hook);
        inner.hooks.insert(id, signal);
        id
    }

    fn unhook(&self, hook: HookId) {
        self.inner().hooks.remove(&hook);
    }

    fn hook_command(&self, command: &CommandSpec) {
        self.inner().commands.push(command.clone());
    }

    fn hook_config(&self, pattern: &str) {
        self.inner().config_patterns.push(pattern.to_owned());
    }

    fn print(&self, line: &str) {
        self.inner().printed.push(line.to_owned());
    }
}
