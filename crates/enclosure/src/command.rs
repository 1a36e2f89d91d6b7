//! JSON command protocol for UI and agent front-ends.
//!
//! Every command maps onto a harness operation. Failures are reported in the
//! response instead of aborting a batch.

use serde::{Deserialize, Serialize};
use shared::{ComponentKind, ScrewClass, StlFormat, Transform};

use crate::harness::TestHarness;

/// A command a front-end can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Set a design parameter by field name
    SetParameter {
        name: String,
        value: f64,
    },
    SetScrew {
        screw: ScrewClass,
    },
    /// Load a library component into a new group
    ImportComponent {
        component: ComponentKind,
    },
    RemoveGroup {
        id: String,
    },
    /// Show or hide a registered volume
    ToggleVolume {
        id: String,
    },
    SetGroupTransform {
        id: String,
        #[serde(default)]
        transform: Transform,
    },
    /// Resize an additional-geometry cube
    SetExtraBoxSize {
        id: String,
        length: f64,
        width: f64,
        height: f64,
    },
    /// Re-derive the enclosure and evaluate the preview.
    Tick,
    /// Inspect parameters, groups and registry sets.
    Inspect,
    /// Compose and encode the export artifacts.
    Export {
        #[serde(default)]
        format: StlFormat,
    },
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

impl<E: std::fmt::Display> From<Result<serde_json::Value, E>> for CommandResponse {
    fn from(result: Result<serde_json::Value, E>) -> Self {
        match result {
            Ok(serde_json::Value::Null) => Self::ok(),
            Ok(data) => Self::ok_with_data(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::SetParameter { name, value } => harness
            .set_parameter(&name, value)
            .map(|()| serde_json::Value::Null)
            .into(),

        AgentCommand::SetScrew { screw } => {
            harness.set_screw(screw);
            let warning = harness.params().screw_warning().map(|w| w.to_string());
            CommandResponse::ok_with_data(serde_json::json!({ "warning": warning }))
        }

        AgentCommand::ImportComponent { component } => harness
            .import_component(component)
            .map(|id| serde_json::json!({ "id": id }))
            .into(),

        AgentCommand::RemoveGroup { id } => harness
            .remove_group(&id)
            .map(|removed| serde_json::json!({ "removed": removed }))
            .into(),

        AgentCommand::ToggleVolume { id } => harness
            .toggle_volume(&id)
            .map(|visible| serde_json::json!({ "visible": visible }))
            .into(),

        AgentCommand::SetGroupTransform { id, transform } => harness
            .set_group_transform(&id, transform)
            .map(|()| serde_json::Value::Null)
            .into(),

        AgentCommand::SetExtraBoxSize {
            id,
            length,
            width,
            height,
        } => harness
            .set_extra_box_size(&id, length, width, height)
            .map(|()| serde_json::Value::Null)
            .into(),

        AgentCommand::Tick => harness
            .tick()
            .map(|()| serde_json::json!({ "preview_volume": harness.preview_volume() }))
            .into(),

        AgentCommand::Inspect => CommandResponse::ok_with_data(inspect(harness)),

        AgentCommand::Export { format } => harness
            .export(format)
            .and_then(|bundle| {
                let manifest: serde_json::Value = serde_json::from_str(&bundle.manifest)?;
                Ok(serde_json::json!({
                    "enclosure_bytes": bundle.enclosure.len(),
                    "lid_bytes": bundle.lid.len(),
                    "manifest": manifest,
                }))
            })
            .into(),
    }
}

fn inspect(harness: &TestHarness) -> serde_json::Value {
    let workspace = &harness.workspace;
    let registry = workspace.scene().registry();
    let groups: Vec<serde_json::Value> = workspace
        .scene()
        .groups()
        .iter()
        .map(|group| {
            serde_json::json!({
                "id": group.id,
                "name": group.name,
                "component": group.component,
                "transform": group.transform,
                "extras": group.extras,
            })
        })
        .collect();

    serde_json::json!({
        "parameters": workspace.parameters().params(),
        "screw_warning": workspace.screw_warning().map(|w| w.to_string()),
        "group_count": groups.len(),
        "groups": groups,
        "subtract": registry.subtract_ids(),
        "add": registry.add_ids(),
        "preview_volume": harness.preview_volume(),
        "ticks": workspace.ticks(),
        "last_error": harness.last_error(),
    })
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
