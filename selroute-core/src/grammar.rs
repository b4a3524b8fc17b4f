//! # Canonical Type Grammar
//!
//! The rules a parameter type must satisfy before it can take part in a
//! canonical signature. Both the interface extractor and the `selector!`
//! macro go through these functions, so a signature accepted by one is
//! accepted by the other.
//!
//! Short aliases are widened (`uint` → `uint256`, `int` → `int256`,
//! `fixed` → `fixed128x18`, `ufixed` → `ufixed128x18`); everything else must
//! already be canonical.

/// Returns true if `name` is a valid operation name.
///
/// ASCII letters, digits, `_` and `$`, not starting with a digit.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Canonical form of a type written as text, e.g. `(address,uint)[]` becomes
/// `(address,uint256)[]`.
///
/// Tuples are written in parentheses; the only thing allowed after the
/// closing parenthesis is a run of array dimensions.
pub fn canonical_param(ty: &str) -> Result<String, &'static str> {
    if ty.is_empty() {
        return Err("empty type");
    }
    if ty.chars().any(char::is_whitespace) {
        return Err("type contains whitespace");
    }

    if let Some(inner) = ty.strip_prefix('(') {
        let close = matching_paren(inner)?;
        let (members, dims) = (&inner[..close], &inner[close + 1..]);
        if members.is_empty() {
            return Err("tuple type without components");
        }
        check_dimensions(dims)?;
        let members = split_list(members)?
            .into_iter()
            .map(canonical_param)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(format!("({}){dims}", members.join(",")));
    }

    let (base, dims) = split_dimensions(ty)?;
    if base == "tuple" {
        return Err("tuple type without components");
    }
    Ok(format!("{}{dims}", canonical_elementary(base)?))
}

/// Split `T[2][]` into `("T", "[2][]")`, validating every dimension.
pub fn split_dimensions(ty: &str) -> Result<(&str, &str), &'static str> {
    let Some(start) = ty.find('[') else {
        return Ok((ty, ""));
    };
    let (base, dims) = ty.split_at(start);
    check_dimensions(dims)?;
    Ok((base, dims))
}

/// Canonical form of an elementary (non-tuple, non-array) type.
pub fn canonical_elementary(base: &str) -> Result<String, &'static str> {
    match base {
        "address" | "bool" | "string" | "bytes" | "function" => return Ok(base.to_string()),
        "uint" => return Ok("uint256".to_string()),
        "int" => return Ok("int256".to_string()),
        "fixed" => return Ok("fixed128x18".to_string()),
        "ufixed" => return Ok("ufixed128x18".to_string()),
        _ => {}
    }

    if let Some(width) = base.strip_prefix("uint").or_else(|| base.strip_prefix("int")) {
        return match parse_decimal(width) {
            Some(m) if is_valid_width(m) => Ok(base.to_string()),
            _ => Err("integer width must be a multiple of 8 in 8..=256"),
        };
    }

    if let Some(size) = base.strip_prefix("bytes") {
        return match parse_decimal(size) {
            Some(1..=32) => Ok(base.to_string()),
            _ => Err("fixed bytes size must be in 1..=32"),
        };
    }

    if let Some(shape) = base.strip_prefix("ufixed").or_else(|| base.strip_prefix("fixed")) {
        let valid = shape
            .split_once('x')
            .and_then(|(m, n)| Some((parse_decimal(m)?, parse_decimal(n)?)))
            .is_some_and(|(m, n)| is_valid_width(m) && n <= 80);
        return if valid {
            Ok(base.to_string())
        } else {
            Err("fixed-point type must be <M>x<N> with M a multiple of 8 in 8..=256 and N <= 80")
        };
    }

    Err("unknown elementary type")
}

/// Split a comma-separated type list at the top level, e.g. the inside of
/// `f(a,(b,c)[])`. An empty list yields no items.
pub(crate) fn split_list(list: &str) -> Result<Vec<&str>, &'static str> {
    if list.is_empty() {
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1).ok_or("unbalanced parentheses")?,
            ',' if depth == 0 => {
                items.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced parentheses");
    }
    items.push(&list[start..]);
    Ok(items)
}

// Index of the `)` closing a group whose `(` was just stripped.
fn matching_paren(inner: &str) -> Result<usize, &'static str> {
    let mut depth = 0usize;
    for (i, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Ok(i),
            ')' => depth -= 1,
            _ => {}
        }
    }
    Err("unbalanced parentheses")
}

fn check_dimensions(mut dims: &str) -> Result<(), &'static str> {
    while !dims.is_empty() {
        if !dims.starts_with('[') {
            return Err("unexpected characters after type");
        }
        let end = dims.find(']').ok_or("unbalanced array brackets")?;
        let size = &dims[1..end];
        if !size.is_empty() {
            match parse_decimal(size) {
                Some(0) | None => return Err("array size must be a positive integer"),
                Some(_) => {}
            }
        }
        dims = &dims[end + 1..];
    }
    Ok(())
}

fn is_valid_width(bits: u32) -> bool {
    (8..=256).contains(&bits) && bits % 8 == 0
}

fn parse_decimal(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
