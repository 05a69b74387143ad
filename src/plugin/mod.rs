//! plugin
//!
//! Plugin registration, activation, and configuration propagation.
//!
//! # Design
//!
//! Plugins are resolved through a linked-in registration table rather than by
//! runtime module loading: every plugin known to the binary appears in
//! [`builtin::table`] as a [`Plugin`] trait object. Activation executes the
//! plugin's registration code (contributing subcommands to the
//! [`CommandRegistry`]) at most once per process, strictly in the order
//! requested; any activation failure aborts startup.
//!
//! A plugin may expose a [`ConfigRegistry`]. After activation, the propagation
//! step walks the `[rollmill]` section of the merged configuration and writes
//! each sub-table into the registry of the matching active plugin. Sections
//! with no matching active plugin are ignored, so configuration may mention
//! plugins that are not installed.

pub mod builtin;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use toml::{Table, Value};

use crate::cli::commands::CommandRegistry;
use crate::core::config::{MergedConfig, MILL_SECTION};

/// Errors from plugin activation.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("unknown plugin '{0}': not present in the registration table")]
    Unknown(String),

    #[error("plugin '{name}' failed to activate: {message}")]
    Activation { name: String, message: String },
}

/// A settable key/value store owned by one plugin.
///
/// The propagation step writes merged configuration values into it; the
/// plugin (and the engine code behind it) reads them back during execution.
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    values: RwLock<BTreeMap<String, Value>>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a registry seeded with default values.
    pub fn with_defaults<I>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Value)>,
    {
        let values = defaults
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }

    /// Set a named attribute.
    pub fn set(&self, name: &str, value: Value) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value);
    }

    /// Read a named attribute.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Enumerate all settable names.
    pub fn names(&self) -> Vec<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// A copy of the current contents as a TOML table.
    pub fn snapshot(&self) -> Table {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    pub fn get_integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|value| value.as_integer())
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|value| match value {
            Value::Float(f) => Some(f),
            Value::Integer(i) => Some(i as f64),
            _ => None,
        })
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(|value| value.as_bool())
    }
}

/// An independently packaged unit contributing subcommands and/or a
/// configuration registry.
pub trait Plugin: Send + Sync {
    /// Full namespaced name, e.g. `rollmill.report`.
    fn name(&self) -> &'static str;

    /// Execute the plugin's registration code.
    fn activate(&self, commands: &mut CommandRegistry) -> Result<(), PluginError>;

    /// The plugin's configuration registry, if it exposes one.
    fn config_registry(&self) -> Option<Arc<ConfigRegistry>> {
        None
    }
}

/// A row of the registration table, for enumeration by scaffolding commands.
pub struct PluginDescriptor {
    pub name: &'static str,
    pub registry: Option<Arc<ConfigRegistry>>,
}

/// Tracks the registration table and the set of activated plugin names.
pub struct PluginHost {
    table: Vec<Arc<dyn Plugin>>,
    active: BTreeSet<String>,
}

impl PluginHost {
    /// A host over the built-in registration table.
    pub fn builtin() -> Self {
        Self::with_table(builtin::table())
    }

    /// A host over an explicit table (used by tests).
    pub fn with_table(table: Vec<Arc<dyn Plugin>>) -> Self {
        Self {
            table,
            active: BTreeSet::new(),
        }
    }

    /// Activate plugins strictly in the order given.
    ///
    /// Names already active are skipped (at-most-once guarantee). The first
    /// failure is logged with the offending name and returned; remaining
    /// plugins are not attempted.
    pub fn activate(
        &mut self,
        names: &[String],
        commands: &mut CommandRegistry,
    ) -> Result<(), PluginError> {
        for name in names {
            if self.active.contains(name) {
                tracing::debug!(plugin = %name, "plugin already active, skipping");
                continue;
            }
            let plugin = self
                .table
                .iter()
                .find(|plugin| plugin.name() == name)
                .cloned()
                .ok_or_else(|| {
                    tracing::error!(plugin = %name, "Failed to activate the plugin.");
                    PluginError::Unknown(name.clone())
                })?;
            plugin.activate(commands).map_err(|err| {
                tracing::error!(plugin = %name, error = %err, "Failed to activate the plugin.");
                err
            })?;
            self.active.insert(name.clone());
        }
        Ok(())
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains(name)
    }

    /// The configuration registry of an *active* plugin, if it exposes one.
    pub fn registry_for(&self, name: &str) -> Option<Arc<ConfigRegistry>> {
        if !self.active.contains(name) {
            return None;
        }
        self.table
            .iter()
            .find(|plugin| plugin.name() == name)
            .and_then(|plugin| plugin.config_registry())
    }

    /// Every plugin in the registration table, active or not.
    pub fn available(&self) -> Vec<PluginDescriptor> {
        self.table
            .iter()
            .map(|plugin| PluginDescriptor {
                name: plugin.name(),
                registry: plugin.config_registry(),
            })
            .collect()
    }
}

/// Push matching configuration sections into active plugin registries.
///
/// For every sub-table `n` of `[rollmill]`, the candidate namespace is
/// `rollmill.<n>`; if a plugin is active under that exact name and exposes a
/// registry, each key/value pair of the sub-table is written onto it. Must
/// run after activation and before any subcommand executes.
pub fn propagate(config: &MergedConfig, host: &PluginHost) {
    for (short_name, table) in config.plugin_tables() {
        let full_name = format!("{MILL_SECTION}.{short_name}");
        let Some(registry) = host.registry_for(&full_name) else {
            tracing::debug!(section = %full_name, "no active plugin for config section, ignoring");
            continue;
        };
        for (key, value) in table {
            registry.set(&key, value);
        }
        tracing::debug!(plugin = %full_name, "propagated configuration section");
    }
}
