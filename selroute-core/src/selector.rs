//! # Selector Derivation
//!
//! A [`Selector`] is the four-byte identifier a router uses to pick the
//! implementation unit that serves a call. It is derived from the operation's
//! canonical signature, `name(type1,type2,...)`, by hashing the UTF-8 bytes
//! with Keccak-256 and keeping the first four bytes.
//!
//! Derivation is pure and total: equal signatures always produce equal
//! selectors, across calls and across processes.

use crate::grammar;
use sha3::{Digest, Keccak256};
use std::{fmt, str::FromStr};

/// Width of a selector in bytes.
pub const SELECTOR_LEN: usize = 4;

/// A fixed-width call identifier derived from a canonical signature.
///
/// Stored big-endian, exactly as it appears at the head of a call payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Selector([u8; SELECTOR_LEN]);

impl Selector {
    /// Derive the selector of `name(param_types...)`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use selroute_core::Selector;
    ///
    /// let transfer = Selector::derive("transfer", &["address", "uint256"]);
    /// assert_eq!(transfer.to_string(), "a9059cbb");
    /// ```
    pub fn derive<S: AsRef<str>>(name: &str, param_types: &[S]) -> Self {
        Self::of_signature(&canonical_signature(name, param_types))
    }

    /// Hash an already-canonical signature string.
    pub fn of_signature(signature: &str) -> Self {
        let digest = Keccak256::digest(signature.as_bytes());
        let mut bytes = [0u8; SELECTOR_LEN];
        bytes.copy_from_slice(&digest[..SELECTOR_LEN]);
        Self(bytes)
    }

    /// Create a selector from raw bytes.
    pub const fn from_bytes(bytes: [u8; SELECTOR_LEN]) -> Self {
        Self(bytes)
    }

    /// Read the selector at the head of a call payload.
    ///
    /// Returns `None` if the payload is shorter than [`SELECTOR_LEN`].
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        let head = payload.get(..SELECTOR_LEN)?;
        let mut bytes = [0u8; SELECTOR_LEN];
        bytes.copy_from_slice(head);
        Some(Self(bytes))
    }

    /// The raw big-endian bytes.
    pub const fn as_bytes(&self) -> &[u8; SELECTOR_LEN] {
        &self.0
    }

    /// The selector as a big-endian integer.
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// Lowercase hex without prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; SELECTOR_LEN]> for Selector {
    fn from(bytes: [u8; SELECTOR_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<u32> for Selector {
    fn from(value: u32) -> Self {
        Self(value.to_be_bytes())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::LowerHex for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector({})", self.to_hex())
    }
}

/// Error parsing a selector from hex.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorParseError {
    /// Input was not valid hex.
    #[error("invalid hex in selector")]
    InvalidHex,
    /// Input did not decode to exactly four bytes.
    #[error("selector must be 4 bytes, got {0}")]
    InvalidLength(usize),
}

impl FromStr for Selector {
    type Err = SelectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|_| SelectorParseError::InvalidHex)?;
        let bytes: [u8; SELECTOR_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| SelectorParseError::InvalidLength(bytes.len()))?;
        Ok(Self(bytes))
    }
}

/// Build the canonical signature `name(type1,type2,...)`.
///
/// No whitespace is inserted; the parameter types are joined verbatim.
pub fn canonical_signature<S: AsRef<str>>(name: &str, param_types: &[S]) -> String {
    let mut signature = String::with_capacity(name.len() + 2 + param_types.len() * 8);
    signature.push_str(name);
    signature.push('(');
    for (i, ty) in param_types.iter().enumerate() {
        if i > 0 {
            signature.push(',');
        }
        signature.push_str(ty.as_ref());
    }
    signature.push(')');
    signature
}

/// An operation's name and ordered parameter types.
///
/// This is the typed record the interface extractor produces for every
/// callable entry of an implementation unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Operation name.
    pub name: String,
    /// Canonical parameter types, in declaration order.
    pub params: Vec<String>,
}

impl Signature {
    /// Create a new signature record.
    pub fn new(name: impl Into<String>, params: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// The canonical signature string.
    pub fn canonical(&self) -> String {
        canonical_signature(&self.name, &self.params)
    }

    /// Derive this operation's selector.
    pub fn selector(&self) -> Selector {
        Selector::derive(&self.name, &self.params)
    }

    /// Parse a signature that is already in canonical form.
    ///
    /// Aliases such as `uint` are rejected with the canonical spelling rather
    /// than widened, since the text is hashed as written.
    pub fn parse(signature: &str) -> Result<Self, SignatureParseError> {
        if signature.chars().any(char::is_whitespace) {
            return Err(SignatureParseError::Whitespace);
        }

        let (name, rest) = signature
            .split_once('(')
            .ok_or(SignatureParseError::Shape)?;
        let list = rest.strip_suffix(')').ok_or(SignatureParseError::Shape)?;
        if !grammar::is_identifier(name) {
            return Err(SignatureParseError::InvalidName(name.to_string()));
        }

        let params = grammar::split_list(list).map_err(|reason| {
            SignatureParseError::InvalidParamType {
                ty: list.to_string(),
                reason,
            }
        })?;
        for ty in &params {
            let canonical = grammar::canonical_param(ty).map_err(|reason| {
                SignatureParseError::InvalidParamType {
                    ty: ty.to_string(),
                    reason,
                }
            })?;
            if canonical != *ty {
                return Err(SignatureParseError::NonCanonical {
                    ty: ty.to_string(),
                    canonical,
                });
            }
        }

        Ok(Self::new(name, params))
    }
}

impl FromStr for Signature {
    type Err = SignatureParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error parsing a canonical signature string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureParseError {
    /// The text contains whitespace.
    #[error("signature must not contain whitespace")]
    Whitespace,
    /// The text is not shaped like `name(types)`.
    #[error("signature must look like `name(type1,type2)`")]
    Shape,
    /// The operation name is not an identifier.
    #[error("`{0}` is not a valid operation name")]
    InvalidName(String),
    /// A parameter type does not parse.
    #[error("invalid parameter type `{ty}`: {reason}")]
    InvalidParamType {
        /// The type as written.
        ty: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// A parameter type is valid but not in canonical spelling.
    #[error("use `{canonical}` instead of `{ty}`")]
    NonCanonical {
        /// The type as written.
        ty: String,
        /// Its canonical spelling.
        canonical: String,
    },
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_selectors() {
        let empty: [&str; 0] = [];
        assert_eq!(
            Selector::derive("transfer", &["address", "uint256"]).to_hex(),
            "a9059cbb"
        );
        assert_eq!(
            Selector::derive("balanceOf", &["address"]).to_hex(),
            "70a08231"
        );
        assert_eq!(Selector::derive("totalSupply", &empty).to_hex(), "18160ddd");
    }

    #[test]
    fn test_canonical_signature_has_no_whitespace() {
        assert_eq!(
            canonical_signature("foo", &["uint256", "address"]),
            "foo(uint256,address)"
        );
        let empty: [&str; 0] = [];
        assert_eq!(canonical_signature("bar", &empty), "bar()");
    }

    #[test]
    fn test_signature_record() {
        let sig = Signature::new("transfer", ["address", "uint256"]);
        assert_eq!(sig.to_string(), "transfer(address,uint256)");
        assert_eq!(sig.selector(), Selector::from(0xa9059cbb_u32));
    }

    #[test]
    fn test_from_payload() {
        let payload = [0xa9, 0x05, 0x9c, 0xbb, 0x00, 0x01];
        assert_eq!(
            Selector::from_payload(&payload),
            Some(Selector::from_bytes([0xa9, 0x05, 0x9c, 0xbb]))
        );
        assert_eq!(Selector::from_payload(&payload[..3]), None);
        assert_eq!(Selector::from_payload(&[]), None);
    }

    #[test]
    fn test_hex_rendering() {
        let sel = Selector::from_bytes([0x0a, 0xbc, 0x00, 0xff]);
        assert_eq!(sel.to_string(), "0abc00ff");
        assert_eq!(format!("{:x}", sel), "0abc00ff");
        assert_eq!(format!("{:#x}", sel), "0x0abc00ff");
        assert_eq!(format!("{:?}", sel), "Selector(0abc00ff)");
        assert_eq!(sel.to_u32(), 0x0abc00ff);
    }

    #[test]
    fn test_parse() {
        let sel: Selector = "0xa9059cbb".parse().unwrap();
        assert_eq!(sel, Selector::from(0xa9059cbb_u32));
        let sel: Selector = "a9059cbb".parse().unwrap();
        assert_eq!(sel.to_hex(), "a9059cbb");

        assert_eq!(
            "a9059c".parse::<Selector>(),
            Err(SelectorParseError::InvalidLength(3))
        );
        assert_eq!(
            "zz059cbb".parse::<Selector>(),
            Err(SelectorParseError::InvalidHex)
        );
    }

    #[test]
    fn test_parse_signature() {
        let sig: Signature = "submit((uint256,bytes32)[],bool)".parse().unwrap();
        assert_eq!(sig.name, "submit");
        assert_eq!(sig.params, vec!["(uint256,bytes32)[]", "bool"]);
        assert_eq!(Signature::parse("get()").unwrap().params.len(), 0);
        assert_eq!(Signature::parse("$ref(address)").unwrap().name, "$ref");
    }

    #[test]
    fn test_parse_signature_rejects() {
        assert_eq!(Signature::parse("f(uint256, bool)"), Err(SignatureParseError::Whitespace));
        assert_eq!(Signature::parse("f"), Err(SignatureParseError::Shape));
        assert_eq!(Signature::parse("f(uint256"), Err(SignatureParseError::Shape));
        assert!(matches!(
            Signature::parse("1f()"),
            Err(SignatureParseError::InvalidName(_))
        ));
        assert_eq!(
            Signature::parse("f(uint)"),
            Err(SignatureParseError::NonCanonical {
                ty: "uint".into(),
                canonical: "uint256".into(),
            })
        );
        for junk in ["f((uint256)junk)", "f(uint7)", "f(foo)", "f(())", "f(uint256,)", "f((uint256)"] {
            assert!(
                matches!(
                    Signature::parse(junk),
                    Err(SignatureParseError::InvalidParamType { .. })
                ),
                "`{junk}` should be rejected"
            );
        }
    }

    proptest! {
        #[test]
        fn derive_is_deterministic(
            name in "[a-zA-Z_][a-zA-Z0-9_]{0,20}",
            params in prop::collection::vec("(uint256|address|bool|bytes32|string)", 0..5),
        ) {
            let a = Selector::derive(&name, &params);
            let b = Selector::derive(&name, &params);
            prop_assert_eq!(a, b);
            prop_assert_eq!(a, Signature::new(name.clone(), params.clone()).selector());
            prop_assert_eq!(a, Selector::of_signature(&canonical_signature(&name, &params)));
        }

        #[test]
        fn display_round_trips(raw in any::<u32>()) {
            let sel = Selector::from(raw);
            prop_assert_eq!(sel.to_string().parse::<Selector>().unwrap(), sel);
        }
    }
}
