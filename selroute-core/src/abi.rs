//! Interface description types.
//!
//! An implementation unit publishes its callable surface as a list of
//! entries in the JSON ABI layout produced by contract compilers. Only the
//! fields needed to derive selectors are modelled; unknown fields are
//! ignored on input.

use crate::error::InterfaceError;
use serde::{Deserialize, Serialize};

/// The type tag of an interface entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A callable operation.
    #[default]
    Function,
    /// The initializer.
    Constructor,
    /// Catch-all entry point.
    Fallback,
    /// Plain value-transfer entry point.
    Receive,
    /// Log declaration.
    Event,
    /// Custom error declaration.
    Error,
    /// Any tag this crate does not know about.
    #[serde(other)]
    Other,
}

/// A typed parameter of an interface entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbiParam {
    /// Parameter name; may be empty.
    #[serde(default)]
    pub name: String,
    /// Type as written by the compiler, e.g. `uint256`, `tuple[]`.
    #[serde(rename = "type")]
    pub ty: String,
    /// Member parameters when `ty` is a `tuple` type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<AbiParam>,
}

impl AbiParam {
    /// An unnamed parameter of the given type.
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            ty: ty.into(),
            components: Vec::new(),
        }
    }

    /// A named parameter of the given type.
    pub fn named(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new(ty)
        }
    }

    /// A `tuple` parameter with the given members.
    ///
    /// `suffix` carries array dimensions such as `"[]"`; pass `""` for a plain tuple.
    pub fn tuple(suffix: &str, components: Vec<AbiParam>) -> Self {
        Self {
            name: String::new(),
            ty: format!("tuple{suffix}"),
            components,
        }
    }
}

/// One entry of an interface description.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiEntry {
    /// Entry type tag. Absent tags default to `function`.
    #[serde(rename = "type", default)]
    pub kind: EntryKind,
    /// Entry name. Constructors, fallbacks and receives have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Ordered input parameters.
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    /// Ordered output parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<AbiParam>,
    /// `pure`, `view`, `nonpayable` or `payable`, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
}

impl AbiEntry {
    /// A function entry.
    pub fn function(name: impl Into<String>, inputs: Vec<AbiParam>) -> Self {
        Self {
            kind: EntryKind::Function,
            name: Some(name.into()),
            inputs,
            ..Self::default()
        }
    }

    /// A constructor entry.
    pub fn constructor(inputs: Vec<AbiParam>) -> Self {
        Self {
            kind: EntryKind::Constructor,
            inputs,
            ..Self::default()
        }
    }

    /// An event entry.
    pub fn event(name: impl Into<String>, inputs: Vec<AbiParam>) -> Self {
        Self {
            kind: EntryKind::Event,
            name: Some(name.into()),
            inputs,
            ..Self::default()
        }
    }

    /// Set the state mutability.
    pub fn with_mutability(mut self, mutability: impl Into<String>) -> Self {
        self.state_mutability = Some(mutability.into());
        self
    }

    /// Set the outputs.
    pub fn with_outputs(mut self, outputs: Vec<AbiParam>) -> Self {
        self.outputs = outputs;
        self
    }
}

/// The published interface of an implementation unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterfaceDescription {
    entries: Vec<AbiEntry>,
}

impl InterfaceDescription {
    /// Create a description from entries, keeping their order.
    pub fn new(entries: Vec<AbiEntry>) -> Self {
        Self { entries }
    }

    /// Parse a JSON ABI array.
    pub fn from_json(json: &str) -> Result<Self, InterfaceError> {
        serde_json::from_str(json).map_err(InterfaceError::Json)
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[AbiEntry] {
        &self.entries
    }

    /// The constructor entry, if declared.
    pub fn constructor(&self) -> Option<&AbiEntry> {
        self.entries
            .iter()
            .find(|e| e.kind == EntryKind::Constructor)
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the description has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<AbiEntry> for InterfaceDescription {
    fn from_iter<I: IntoIterator<Item = AbiEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compiler_output() {
        let json = r#"[
            {"type": "constructor", "inputs": [], "stateMutability": "nonpayable"},
            {"type": "function", "name": "get_a", "inputs": [],
             "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view", "gas": 2400},
            {"type": "event", "name": "Moved", "inputs": [{"name": "x", "type": "uint256", "indexed": false}], "anonymous": false},
            {"name": "legacy", "inputs": [{"name": "who", "type": "address"}]}
        ]"#;

        let iface = InterfaceDescription::from_json(json).unwrap();
        assert_eq!(iface.len(), 4);
        assert_eq!(iface.entries()[0].kind, EntryKind::Constructor);
        assert_eq!(iface.entries()[1].name.as_deref(), Some("get_a"));
        assert_eq!(iface.entries()[1].state_mutability.as_deref(), Some("view"));
        assert_eq!(iface.entries()[2].kind, EntryKind::Event);
        // Missing `type` defaults to function.
        assert_eq!(iface.entries()[3].kind, EntryKind::Function);
        assert_eq!(iface.entries()[3].inputs[0].ty, "address");
        assert!(iface.constructor().is_some());
    }

    #[test]
    fn test_unknown_kind_is_other() {
        let iface =
            InterfaceDescription::from_json(r#"[{"type": "something-new", "name": "x"}]"#).unwrap();
        assert_eq!(iface.entries()[0].kind, EntryKind::Other);
    }

    #[test]
    fn test_invalid_json() {
        let err = InterfaceDescription::from_json(r#"{"not": "an array"}"#).unwrap_err();
        assert!(matches!(err, InterfaceError::Json(_)));

        // A parameter without a type cannot be read.
        let err =
            InterfaceDescription::from_json(r#"[{"type": "function", "name": "f", "inputs": [{"name": "a"}]}]"#)
                .unwrap_err();
        assert!(matches!(err, InterfaceError::Json(_)));
    }

    #[test]
    fn test_builders() {
        let iface: InterfaceDescription = vec![
            AbiEntry::constructor(vec![AbiParam::named("owner", "address")]),
            AbiEntry::function("set", vec![AbiParam::new("uint256")]).with_mutability("nonpayable"),
        ]
        .into_iter()
        .collect();

        assert_eq!(iface.constructor().map(|c| c.inputs.len()), Some(1));
        assert_eq!(iface.entries()[1].inputs[0].ty, "uint256");

        let tuple = AbiParam::tuple("[]", vec![AbiParam::new("address"), AbiParam::new("bytes4[]")]);
        assert_eq!(tuple.ty, "tuple[]");
        assert_eq!(tuple.components.len(), 2);
    }
}
