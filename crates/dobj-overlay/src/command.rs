//! The `/pobj` chat command.
//!
//! The vocabulary is fixed:
//!
//! | argument   | effect                                  |
//! |------------|-----------------------------------------|
//! | `config`   | toggle the configuration window         |
//! | `on`       | enable the overlay                      |
//! | `off`      | disable the overlay                     |
//! | other/none | flip the overlay on or off              |
//!
//! Arguments are trimmed before matching. Every branch that changes
//! preferences saves them exactly once.

use std::collections::BTreeMap;

use strum::Display;

use crate::preferences::{Preferences, PreferencesStore};

/// Command the addon registers with the host.
pub const COMMAND_NAME: &str = "/pobj";

/// Help text shown by the host's command list.
pub const COMMAND_HELP: &str = "Configure display options";

// ---------------------------------------------------------------------------
// CommandAction
// ---------------------------------------------------------------------------

/// What a `/pobj` invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CommandAction {
    /// Show or hide the configuration window. Preferences are untouched.
    ToggleConfigUi,
    Enable,
    Disable,
    ToggleEnabled,
}

impl CommandAction {
    pub fn parse(args: &str) -> CommandAction {
        match args.trim() {
            "config" => CommandAction::ToggleConfigUi,
            "on" => CommandAction::Enable,
            "off" => CommandAction::Disable,
            _ => CommandAction::ToggleEnabled,
        }
    }

    /// Whether this action changes preferences.
    pub fn mutates(self) -> bool {
        !matches!(self, CommandAction::ToggleConfigUi)
    }
}

// ---------------------------------------------------------------------------
// CommandRouter
// ---------------------------------------------------------------------------

/// Routes `/pobj` invocations to preference changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRouter;

impl CommandRouter {
    pub fn new() -> Self {
        Self
    }

    pub fn name(&self) -> &'static str {
        COMMAND_NAME
    }

    pub fn help(&self) -> &'static str {
        COMMAND_HELP
    }

    /// Apply `/pobj <args>`.
    ///
    /// Returns `None` when `command` is not ours. Toggling the configuration
    /// window is left to the caller; the returned action says when to.
    pub fn dispatch(
        &self,
        command: &str,
        args: &str,
        prefs: &mut Preferences,
        store: &mut dyn PreferencesStore,
    ) -> Option<CommandAction> {
        if command != COMMAND_NAME {
            return None;
        }
        let action = CommandAction::parse(args);
        match action {
            CommandAction::ToggleConfigUi => {}
            CommandAction::Enable => prefs.enabled = true,
            CommandAction::Disable => prefs.enabled = false,
            CommandAction::ToggleEnabled => prefs.enabled = !prefs.enabled,
        }
        if action.mutates() {
            store.save(prefs);
        }
        tracing::debug!(%action, enabled = prefs.enabled, "command dispatched");
        Some(action)
    }
}

// ---------------------------------------------------------------------------
// CommandRegistry
// ---------------------------------------------------------------------------

/// The host's table of chat commands and their help text.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`. Returns `false` if it was already taken.
    pub fn add_handler(&mut self, name: &str, help: &str) -> bool {
        if self.commands.contains_key(name) {
            tracing::warn!(command = name, "command already registered");
            return false;
        }
        self.commands.insert(name.to_owned(), help.to_owned());
        true
    }

    /// Unregister `name`. Returns `false` if it was not registered.
    pub fn remove_handler(&mut self, name: &str) -> bool {
        self.commands.remove(name).is_some()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn help(&self, name: &str) -> Option<&str> {
        self.commands.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
