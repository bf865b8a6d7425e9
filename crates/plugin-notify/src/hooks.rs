use plugin_core::{Host, HookId, Signal};
use tracing::info;

/// Owns the signal subscriptions that exist while notifications are enabled.
#[derive(Debug, Default)]
pub struct HookManager {
    hooks: Vec<HookId>,
}

impl HookManager {
    pub const SIGNALS: [Signal; 2] = [Signal::PrivateMessage, Signal::Highlight];

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Converge the registration set to the `enabled` flag.
    pub fn sync(&mut self, host: &dyn Host, enabled: bool) {
        if enabled {
            self.activate(host);
        } else {
            self.deactivate(host);
        }
    }

    /// Register every signal hook; a no-op while already active.
    pub fn activate(&mut self, host: &dyn Host) {
        if !self.hooks.is_empty() {
            return;
        }
        self.hooks = Self::SIGNALS
            .into_iter()
            .map(|signal| host.hook_signal(signal))
            .collect();
        info!(hooks = self.hooks.len(), "Message hooks registered");
    }

    pub fn deactivate(&mut self, host: &dyn Host) {
        if self.hooks.is_empty() {
            return;
        }
        for hook in self.hooks.drain(..) {
            host.unhook(hook);
        }
        info!("Message hooks released");
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.hooks.is_empty()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.hooks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_core::memory::MemoryHost;

    #[test]
    fn activate_registers_both_signals_once() {
        let host = MemoryHost::default();
        let mut hooks = HookManager::new();

        hooks.sync(&host, true);
        hooks.sync(&host, true);

        assert_eq!(hooks.count(), 2);
        assert_eq!(host.registrations(), 2);
        assert_eq!(
            host.active_hooks(),
            vec![Signal::PrivateMessage, Signal::Highlight]
        );
    }

    #[test]
    fn deactivate_releases_everything() {
        let host = MemoryHost::default();
        let mut hooks = HookManager::new();
        hooks.activate(&host);

        hooks.sync(&host, false);

        assert!(!hooks.is_active());
        assert_eq!(hooks.count(), 0);
        assert!(host.active_hooks().is_empty());
    }

    #[test]
    fn reactivation_registers_fresh_hooks() {
        let host = MemoryHost::default();
        let mut hooks = HookManager::new();
        hooks.activate(&host);
        hooks.deactivate(&host);
        hooks.activate(&host);

        assert!(hooks.is_active());
        assert_eq!(host.active_hooks().len(), 2);
        assert_eq!(host.registrations(), 4);
    }
}
