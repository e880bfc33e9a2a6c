use std::collections::HashMap;

use super::mode::{ModeArena, ModeId};

/// Named mode state machine.
///
/// The registry maps names to [`ModeId`] handles and tracks which one is
/// active. It never owns a mode: hooks are reached through the [`ModeArena`]
/// passed to each call. At most one mode is active at a time; `active` is
/// either `None` (idle) or a registered name together with its handle.
#[derive(Debug, Default)]
pub struct ModeRegistry {
    modes: HashMap<String, ModeId>,
    active: Option<(String, ModeId)>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `mode` under `name`.
    ///
    /// Fails without mutating anything if `name` is empty or already taken.
    pub fn add(&mut self, name: &str, mode: ModeId) -> bool {
        if name.is_empty() {
            log::error!("mode not added: name can't be empty");
            return false;
        }
        if self.modes.contains_key(name) {
            log::error!("mode not added: '{name}' already exists");
            return false;
        }

        self.modes.insert(name.to_string(), mode);
        log::debug!("mode '{name}' added");
        true
    }

    /// Unregisters `name`, deactivating it first if it is the active mode.
    pub fn remove(&mut self, arena: &mut ModeArena, name: &str) -> bool {
        if !self.modes.contains_key(name) {
            return false;
        }

        if self.active_name() == Some(name) {
            self.select(arena, None);
        }

        self.modes.remove(name);
        log::debug!("mode '{name}' removed");
        true
    }

    /// Switches the active mode.
    ///
    /// `None` deactivates to idle. An unknown name fails with no state change.
    /// Otherwise the current mode (if any) gets `exit`, then the new one (if
    /// any) gets `enter`. Selecting the already active name cycles it.
    pub fn select(&mut self, arena: &mut ModeArena, name: Option<&str>) -> bool {
        let next = match name {
            Some(name) => match self.modes.get(name) {
                Some(&id) => Some((name.to_string(), id)),
                None => {
                    log::error!("mode '{name}' can't be selected: not registered");
                    return false;
                }
            },
            None => None,
        };

        if let Some((old_name, old_id)) = self.active.take() {
            match arena.get_mut(old_id) {
                Some(mode) => mode.exit(),
                None => log::warn!("mode '{old_name}' left the arena while active"),
            }
        }

        self.active = next;

        if let Some((new_name, new_id)) = &self.active {
            match arena.get_mut(*new_id) {
                Some(mode) => mode.enter(),
                None => log::warn!("mode '{new_name}' is registered but not in the arena"),
            }
            log::debug!("mode '{new_name}' selected");
        }

        true
    }

    /// Handle of the active mode, `None` while idle.
    pub fn active(&self) -> Option<ModeId> {
        self.active.as_ref().map(|(_, id)| *id)
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_ref().map(|(name, _)| name.as_str())
    }

    /// Handle registered under `name`. Does not touch the active state.
    pub fn lookup(&self, name: &str) -> Option<ModeId> {
        self.modes.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modes.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Forwards to the active mode's `tick`. No-op while idle.
    pub fn tick(&mut self, arena: &mut ModeArena, dt: f64) {
        if let Some(mode) = self.active().and_then(|id| arena.get_mut(id)) {
            mode.tick(dt);
        }
    }

    /// Forwards to the active mode's `draw`. No-op while idle.
    pub fn draw(&mut self, arena: &mut ModeArena) {
        if let Some(mode) = self.active().and_then(|id| arena.get_mut(id)) {
            mode.draw();
        }
    }
}
