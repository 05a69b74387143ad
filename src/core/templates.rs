//! core::templates
//!
//! File templates for the scaffolding commands (`create-config`,
//! `create-input`, `create-project`) and for materializing the global
//! configuration layer on first use.

use std::collections::BTreeMap;

use toml::{Table, Value};

/// Sample input script written by `create-input`.
///
/// A three-unit schedule: oval pass, transport, round pass.
pub const SAMPLE_INPUT: &str = r#"# Sample rolling schedule.
# Load it with `rollmill input` and run `rollmill input solve`.

[profile]
# round entry stock
shape = "round"
diameter = 30e-3
temperature = 1473.15
material = ["C45", "steel"]
flow_stress = 40e6
density = 7.7e3
thermal_capacity = 465.0

[[sequence]]
label = "Oval I"
kind = "roll-pass"
gap = 2e-3
roll_radius = 160e-3
rotational_frequency = 1.0

[[sequence]]
label = "I => II"
kind = "transport"
duration = 1.0

[[sequence]]
label = "Round II"
kind = "roll-pass"
gap = 2e-3
roll_radius = 160e-3
rotational_frequency = 1.0
"#;

/// Render a configuration document from a plugin list and per-plugin
/// configuration-constant tables.
///
/// `constants` is keyed by full plugin name (e.g. `rollmill.core`); each
/// table becomes a `[<full name>]` section.
pub fn render_config(plugins: &[String], constants: &BTreeMap<String, Table>) -> String {
    let mut out = String::new();

    out.push_str("[rollmill]\n");
    out.push_str("# list of plugin packages to load on startup\n");
    let plugin_list = Value::Array(
        plugins
            .iter()
            .map(|name| Value::String(name.clone()))
            .collect(),
    );
    out.push_str(&format!("plugins = {plugin_list}\n"));

    if !constants.is_empty() {
        out.push_str("\n# configuration constants for the core and plugin packages\n");
        for (name, table) in constants {
            out.push_str(&format!("\n[{name}]\n"));
            match toml::to_string(table) {
                Ok(body) => out.push_str(&body),
                Err(err) => {
                    tracing::error!(section = %name, error = %err, "Could not serialize section. Skipping.");
                }
            }
        }
    }

    out.push_str("\n[logging]\nlevel = \"info\"\n");

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_render_parses_as_toml() {
        let rendered = render_config(&[], &BTreeMap::new());
        let table: Table = toml::from_str(&rendered).unwrap();
        let mill = table["rollmill"].as_table().unwrap();
        assert_eq!(mill["plugins"], Value::Array(Vec::new()));
        assert_eq!(table["logging"]["level"].as_str(), Some("info"));
    }

    #[test]
    fn plugins_and_constants_are_rendered() {
        let mut constants = BTreeMap::new();
        let mut core = Table::new();
        core.insert(
            "DEFAULT_MAX_ITERATION_COUNT".to_string(),
            Value::Integer(100),
        );
        constants.insert("rollmill.core".to_string(), core);

        let rendered = render_config(&["rollmill.report".to_string()], &constants);
        let table: Table = toml::from_str(&rendered).unwrap();
        assert_eq!(
            table["rollmill"]["plugins"][0].as_str(),
            Some("rollmill.report")
        );
        assert_eq!(
            table["rollmill"]["core"]["DEFAULT_MAX_ITERATION_COUNT"].as_integer(),
            Some(100)
        );
    }

    #[test]
    fn sample_input_is_valid_toml() {
        let table: Table = toml::from_str(SAMPLE_INPUT).unwrap();
        assert!(table.contains_key("profile"));
        assert_eq!(table["sequence"].as_array().unwrap().len(), 3);
    }
}
