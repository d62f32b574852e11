// ── Interactive configuration handshake ──
//
// The host may drive a short setup conversation with the plugin. Each
// round it passes the plugin-owned context plus the user's last reply; the
// plugin answers with either a form to show or a config block to save.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::config::PLATFORM_NAME;

/// Plugin-owned scratch state carried between handshake rounds.
pub type SetupContext = Map<String, Value>;

/// A handshake round as sent by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetupRequest {
    /// The user's reply to the previous form, if any.
    #[serde(default)]
    pub response: Option<SetupReply>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetupReply {
    /// Text inputs keyed by item id.
    #[serde(default)]
    pub inputs: Option<BTreeMap<String, String>>,
    /// Selected indices for list interfaces.
    #[serde(default)]
    pub selections: Option<Vec<usize>>,
}

impl SetupRequest {
    /// A request carrying a single text input.
    pub fn with_input(id: impl Into<String>, value: impl Into<String>) -> Self {
        let mut inputs = BTreeMap::new();
        inputs.insert(id.into(), value.into());
        Self {
            response: Some(SetupReply {
                inputs: Some(inputs),
                selections: None,
            }),
        }
    }

    /// The non-empty text input named `id`, if the user sent one.
    pub fn input(&self, id: &str) -> Option<&str> {
        self.response
            .as_ref()?
            .inputs
            .as_ref()?
            .get(id)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

// ── Responses ───────────────────────────────────────────────────────

/// What the plugin answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SetupResponse {
    /// Show another form to the user.
    Interface(InterfaceDescriptor),
    /// Persist a config block and end the conversation.
    Save(SaveInstruction),
}

/// Which section of the host config a save targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSection {
    Platform,
    Accessory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveInstruction {
    pub section: ConfigSection,
    /// Replace the existing block instead of merging into it.
    pub replace: bool,
    pub config: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    Input,
    List,
    Instruction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDescriptor {
    pub interface: InterfaceKind,
    pub title: String,
    pub items: Vec<InputItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputItem {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub secure: bool,
}

// ── Fixed answers ───────────────────────────────────────────────────

/// The "Add Accessory" form with a single Name field.
pub fn add_accessory_form() -> InterfaceDescriptor {
    InterfaceDescriptor {
        interface: InterfaceKind::Input,
        title: "Add Accessory".into(),
        items: vec![InputItem {
            id: "name".into(),
            title: "Name".into(),
            placeholder: Some("Fancy Light".into()),
            secure: false,
        }],
    }
}

/// The platform block written once an accessory has been added.
pub fn platform_save() -> SaveInstruction {
    SaveInstruction {
        section: ConfigSection::Platform,
        replace: true,
        config: json!({ "platform": PLATFORM_NAME, "otherConfig": "SomeData" }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn input_ignores_empty_values() {
        assert_eq!(SetupRequest::with_input("name", "").input("name"), None);
        assert_eq!(SetupRequest::default().input("name"), None);
        assert_eq!(SetupRequest::with_input("name", "Den").input("name"), Some("Den"));
    }

    #[test]
    fn request_parses_host_shape() {
        let req: SetupRequest =
            serde_json::from_value(json!({ "response": { "inputs": { "name": "Den" } } }))
                .unwrap();
        assert_eq!(req.input("name"), Some("Den"));
    }

    #[test]
    fn interface_serializes_to_host_shape() {
        let json = serde_json::to_value(SetupResponse::Interface(add_accessory_form())).unwrap();
        assert_eq!(
            json,
            json!({
                "type": "Interface",
                "interface": "input",
                "title": "Add Accessory",
                "items": [
                    { "id": "name", "title": "Name", "placeholder": "Fancy Light" }
                ]
            })
        );
    }

    #[test]
    fn save_targets_platform_section() {
        let save = platform_save();
        assert_eq!(save.section, ConfigSection::Platform);
        assert!(save.replace);
        assert_eq!(save.config["platform"], "honeywell-wifi");
        assert_eq!(save.config["otherConfig"], "SomeData");
    }
}
