//! # Interface Extraction
//!
//! Turns a unit's published [`InterfaceDescription`] into the ordered list of
//! operations it exposes, as typed [`Signature`] records ready for selector
//! derivation.
//!
//! Only `function` entries are kept. Initializers (constructor entries, and
//! functions literally named `__init__`) and non-callable entries such as
//! events and errors are skipped. Declaration order is preserved.
//!
//! Parameter types are brought into canonical form on the way: `tuple`
//! types are expanded from their components, and the `uint`/`int`/`fixed`/
//! `ufixed` aliases are widened to their canonical sizes.

use selroute_core::{
    AbiEntry, AbiParam, EntryKind, InterfaceDescription, InterfaceError, Selector, Signature,
    grammar,
};

/// Name some compilers give the initializer when listing it as a function.
pub const INITIALIZER_NAME: &str = "__init__";

/// Returns true if `entry` is a callable, non-initializer operation.
pub fn is_operation(entry: &AbiEntry) -> bool {
    entry.kind == EntryKind::Function && entry.name.as_deref() != Some(INITIALIZER_NAME)
}

/// Extract the operations `iface` exposes, in declaration order.
///
/// # Errors
///
/// Returns an [`InterfaceError`] if an operation entry has no usable name or
/// a parameter type that cannot be parsed.
pub fn extract(iface: &InterfaceDescription) -> Result<Vec<Signature>, InterfaceError> {
    let mut signatures = Vec::new();

    for (index, entry) in iface.entries().iter().enumerate() {
        if !is_operation(entry) {
            continue;
        }

        let name = match entry.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => return Err(InterfaceError::MissingName { index }),
        };
        if !grammar::is_identifier(name) {
            return Err(InterfaceError::InvalidName {
                index,
                name: name.to_string(),
            });
        }

        let params = entry
            .inputs
            .iter()
            .map(|param| {
                canonical_type(param).map_err(|reason| InterfaceError::InvalidParamType {
                    operation: name.to_string(),
                    ty: param.ty.clone(),
                    reason,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        signatures.push(Signature {
            name: name.to_string(),
            params,
        });
    }

    Ok(signatures)
}

/// Extract and derive in one step: the selectors `iface` exposes, in order.
pub fn selectors(iface: &InterfaceDescription) -> Result<Vec<Selector>, InterfaceError> {
    Ok(extract(iface)?.iter().map(Signature::selector).collect())
}

/// Number of parameters the initializer declares; zero if there is none.
pub fn initializer_params(iface: &InterfaceDescription) -> usize {
    iface
        .entries()
        .iter()
        .filter(|e| {
            e.kind == EntryKind::Constructor
                || (e.kind == EntryKind::Function && e.name.as_deref() == Some(INITIALIZER_NAME))
        })
        .map(|e| e.inputs.len())
        .max()
        .unwrap_or(0)
}

/// Canonical form of a parameter type, e.g. `(address,uint256)[]`.
///
/// `tuple` types are expanded from their components; every other type goes
/// through [`grammar::canonical_param`].
pub fn canonical_type(param: &AbiParam) -> Result<String, &'static str> {
    let ty = param.ty.as_str();
    let dims = match ty.strip_prefix("tuple") {
        Some(dims) if dims.is_empty() || dims.starts_with('[') => {
            grammar::split_dimensions(ty)?.1
        }
        _ => return grammar::canonical_param(ty),
    };

    if param.components.is_empty() {
        return Err("tuple type without components");
    }
    let members = param
        .components
        .iter()
        .map(canonical_type)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("({}){dims}", members.join(",")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(ty: &str) -> AbiParam {
        AbiParam::new(ty)
    }

    fn iface(entries: Vec<AbiEntry>) -> InterfaceDescription {
        InterfaceDescription::new(entries)
    }

    #[test]
    fn test_extract_filters_and_keeps_order() {
        let desc = iface(vec![
            AbiEntry::constructor(vec![]),
            AbiEntry::function("create_loan", vec![]),
            AbiEntry::event("LoanCreated", vec![param("uint256")]),
            AbiEntry::function(INITIALIZER_NAME, vec![]),
            AbiEntry::function("get_a", vec![]).with_mutability("view"),
            AbiEntry::function("set", vec![param("address"), param("uint256")]),
        ]);

        let sigs = extract(&desc).unwrap();
        let rendered: Vec<String> = sigs.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["create_loan()", "get_a()", "set(address,uint256)"]);
    }

    #[test]
    fn test_fallback_and_receive_skipped() {
        let desc = iface(vec![
            AbiEntry {
                kind: EntryKind::Fallback,
                ..AbiEntry::default()
            },
            AbiEntry {
                kind: EntryKind::Receive,
                ..AbiEntry::default()
            },
        ]);
        assert!(extract(&desc).unwrap().is_empty());
    }

    #[test]
    fn test_selectors_match_derive() {
        let desc = iface(vec![AbiEntry::function(
            "transfer",
            vec![param("address"), param("uint256")],
        )]);
        assert_eq!(
            selectors(&desc).unwrap(),
            vec![Selector::derive("transfer", &["address", "uint256"])]
        );
    }

    #[test]
    fn test_tuple_expansion() {
        let routes = AbiParam::tuple(
            "[]",
            vec![param("address"), param("bytes4[]")],
        );
        let nested = AbiParam::tuple(
            "",
            vec![param("bool"), AbiParam::tuple("[2]", vec![param("uint")])],
        );
        assert_eq!(canonical_type(&routes).unwrap(), "(address,bytes4[])[]");
        assert_eq!(canonical_type(&nested).unwrap(), "(bool,(uint256)[2])");

        let desc = iface(vec![AbiEntry::function("configure", vec![routes])]);
        assert_eq!(
            selectors(&desc).unwrap(),
            vec![Selector::of_signature("configure((address,bytes4[])[])")]
        );
    }

    #[test]
    fn test_aliases_widened() {
        assert_eq!(canonical_type(&param("uint")).unwrap(), "uint256");
        assert_eq!(canonical_type(&param("int[]")).unwrap(), "int256[]");
        assert_eq!(canonical_type(&param("fixed")).unwrap(), "fixed128x18");
        assert_eq!(canonical_type(&param("ufixed")).unwrap(), "ufixed128x18");
        assert_eq!(canonical_type(&param("ufixed64x10")).unwrap(), "ufixed64x10");
    }

    #[test]
    fn test_elementary_types_accepted() {
        for ty in [
            "address", "bool", "string", "bytes", "function", "uint8", "int256", "bytes1",
            "bytes32", "uint256[3][]", "address[]",
        ] {
            assert_eq!(canonical_type(&param(ty)).unwrap(), ty, "{ty}");
        }
    }

    #[test]
    fn test_malformed_types_rejected() {
        for ty in [
            "", "uint 256", "uint7", "uint264", "int0", "bytes0", "bytes33", "uint+8",
            "address[", "address[0]", "address[]x", "strin", "tuple", "fixed128", "fixed8x81",
        ] {
            assert!(canonical_type(&param(ty)).is_err(), "`{ty}` should be rejected");
        }
    }

    #[test]
    fn test_missing_name() {
        let desc = iface(vec![
            AbiEntry::function("ok", vec![]),
            AbiEntry {
                kind: EntryKind::Function,
                ..AbiEntry::default()
            },
        ]);
        assert!(matches!(
            extract(&desc),
            Err(InterfaceError::MissingName { index: 1 })
        ));
    }

    #[test]
    fn test_dollar_names_match_selector_macro_rule() {
        let desc = iface(vec![AbiEntry::function("$ref", vec![param("uint")])]);
        let sigs = extract(&desc).unwrap();
        // The extracted form parses back as a canonical signature.
        assert_eq!(Signature::parse(&sigs[0].to_string()).unwrap(), sigs[0]);
    }

    #[test]
    fn test_inline_tuple_text() {
        assert_eq!(canonical_type(&param("(uint,bytes4[2])[]")).unwrap(), "(uint256,bytes4[2])[]");
        assert!(canonical_type(&param("(uint256)junk")).is_err());
        assert!(canonical_type(&param("()")).is_err());
    }

    #[test]
    fn test_invalid_name() {
        let desc = iface(vec![AbiEntry::function("not valid", vec![])]);
        assert!(matches!(
            extract(&desc),
            Err(InterfaceError::InvalidName { index: 0, .. })
        ));
    }

    #[test]
    fn test_invalid_param_type_reports_operation() {
        let desc = iface(vec![AbiEntry::function("f", vec![param("uint7")])]);
        match extract(&desc) {
            Err(InterfaceError::InvalidParamType { operation, ty, .. }) => {
                assert_eq!(operation, "f");
                assert_eq!(ty, "uint7");
            }
            other => panic!("expected InvalidParamType, got {other:?}"),
        }
    }

    #[test]
    fn test_initializer_params() {
        assert_eq!(initializer_params(&iface(vec![])), 0);
        assert_eq!(
            initializer_params(&iface(vec![AbiEntry::constructor(vec![])])),
            0
        );
        assert_eq!(
            initializer_params(&iface(vec![AbiEntry::constructor(vec![
                param("address"),
                param("uint256"),
            ])])),
            2
        );
        assert_eq!(
            initializer_params(&iface(vec![AbiEntry::function(
                INITIALIZER_NAME,
                vec![param("address")]
            )])),
            1
        );
    }

    #[test]
    fn test_from_json_description() {
        let json = r#"[
            {"type": "function", "name": "create_loan", "inputs": [], "outputs": []},
            {"type": "function", "name": "get_a", "inputs": [], "outputs": [{"name": "", "type": "uint256"}]}
        ]"#;
        let desc = InterfaceDescription::from_json(json).unwrap();
        let sigs = extract(&desc).unwrap();
        assert_eq!(sigs[0], Signature::new("create_loan", Vec::<String>::new()));
        assert_eq!(sigs[1].selector(), Selector::of_signature("get_a()"));
    }
}
