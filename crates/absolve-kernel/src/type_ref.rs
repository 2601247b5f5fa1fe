//! Type references and the structural compatibility rule.
//!
//! A field's declared type is a tree of wrappers around one named type:
//!
//! ```text
//! [Character!]!   =  NonNullOf(ListOf(NonNullOf(Named(character))))
//! ```
//!
//! Two references are compatible when the wrapper shapes agree at every level
//! and the innermost names resolve to the same registered type. There is no
//! widening: `Int!` and `Int` are different declarations.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::str::FromStr;

/// Deepest list nesting accepted by the `[Name!]!` notation.
pub const MAX_NESTING: usize = 128;

/// Identifier of a registered type.
///
/// Identifiers are what schema authors use to point at a type
/// (`integer`, `person`); canonical names are what clients see
/// (`Int`, `Person`). The registry maps one to the other.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub String);

impl TypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for TypeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TypeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Resolves a type key (identifier or name) to the canonical type name.
///
/// [`crate::Schema`] is the production implementation; tests may supply a
/// plain table.
pub trait TypeRegistry {
    fn canonical_name(&self, key: &str) -> Option<&str>;
}

/// A possibly wrapped reference to a named type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    Named(TypeId),
    ListOf(Box<TypeRef>),
    NonNullOf(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(id: impl Into<TypeId>) -> Self {
        Self::Named(id.into())
    }

    pub fn list_of(inner: TypeRef) -> Self {
        Self::ListOf(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        Self::NonNullOf(Box::new(inner))
    }

    /// The named type at the bottom of the wrapper stack.
    pub fn innermost(&self) -> &TypeId {
        match self {
            Self::Named(id) => id,
            Self::ListOf(inner) | Self::NonNullOf(inner) => inner.innermost(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNullOf(_))
    }

    pub fn is_list(&self) -> bool {
        match self {
            Self::ListOf(_) => true,
            Self::NonNullOf(inner) => inner.is_list(),
            Self::Named(_) => false,
        }
    }
}

/// Structural compatibility between two declared types.
///
/// Wrappers must pair up exactly (`ListOf` with `ListOf`, `NonNullOf` with
/// `NonNullOf`). Named types are compared by canonical name after registry
/// resolution; a name the registry does not know is compatible with nothing.
pub fn compatible<R>(a: &TypeRef, b: &TypeRef, registry: &R) -> bool
where
    R: TypeRegistry + ?Sized,
{
    match (a, b) {
        (TypeRef::ListOf(a), TypeRef::ListOf(b))
        | (TypeRef::NonNullOf(a), TypeRef::NonNullOf(b)) => compatible(a, b, registry),
        (TypeRef::Named(a), TypeRef::Named(b)) => match (
            registry.canonical_name(a.as_str()),
            registry.canonical_name(b.as_str()),
        ) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        _ => false,
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(id) => write!(f, "{id}"),
            Self::ListOf(inner) => write!(f, "[{inner}]"),
            Self::NonNullOf(inner) => write!(f, "{inner}!"),
        }
    }
}

/// Errors from parsing the `[Name!]!` notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeRefParseError {
    #[error("expected a type name in {input:?}")]
    ExpectedName { input: String },

    #[error("unclosed list wrapper in {input:?}")]
    UnclosedList { input: String },

    #[error("repeated non-null marker in {input:?}")]
    RepeatedNonNull { input: String },

    #[error("unexpected trailing input {rest:?} in {input:?}")]
    TrailingInput { input: String, rest: String },

    #[error("list nesting deeper than {limit} in type notation")]
    TooDeep { limit: usize },
}

impl FromStr for TypeRef {
    type Err = TypeRefParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let source = raw.trim();
        let (parsed, rest) = parse_wrapped(source, source, 0)?;
        let rest = rest.trim();
        if !rest.is_empty() {
            return Err(TypeRefParseError::TrailingInput {
                input: source.to_string(),
                rest: rest.to_string(),
            });
        }
        Ok(parsed)
    }
}

fn parse_wrapped<'a>(
    input: &'a str,
    source: &str,
    depth: usize,
) -> Result<(TypeRef, &'a str), TypeRefParseError> {
    let input = input.trim_start();
    let (inner, rest) = if let Some(after_open) = input.strip_prefix('[') {
        if depth >= MAX_NESTING {
            return Err(TypeRefParseError::TooDeep { limit: MAX_NESTING });
        }
        let (item, rest) = parse_wrapped(after_open, source, depth + 1)?;
        let Some(rest) = rest.trim_start().strip_prefix(']') else {
            return Err(TypeRefParseError::UnclosedList {
                input: source.to_string(),
            });
        };
        (TypeRef::list_of(item), rest)
    } else {
        let end = input
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(input.len());
        if end == 0 {
            return Err(TypeRefParseError::ExpectedName {
                input: source.to_string(),
            });
        }
        (TypeRef::named(&input[..end]), &input[end..])
    };

    let rest = rest.trim_start();
    let Some(after_bang) = rest.strip_prefix('!') else {
        return Ok((inner, rest));
    };
    if after_bang.trim_start().starts_with('!') {
        return Err(TypeRefParseError::RepeatedNonNull {
            input: source.to_string(),
        });
    }
    Ok((TypeRef::non_null(inner), after_bang))
}

impl TryFrom<String> for TypeRef {
    type Error = TypeRefParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct Table(BTreeMap<&'static str, &'static str>);

    impl TypeRegistry for Table {
        fn canonical_name(&self, key: &str) -> Option<&str> {
            self.0.get(key).copied()
        }
    }

    fn scalars() -> Table {
        Table(BTreeMap::from([
            ("integer", "Int"),
            ("Int", "Int"),
            ("string", "String"),
            ("String", "String"),
        ]))
    }

    fn int() -> TypeRef {
        TypeRef::named("integer")
    }

    #[test]
    fn wrapper_kinds_must_pair_exactly() {
        let registry = scalars();
        assert!(!compatible(&TypeRef::non_null(int()), &int(), &registry));
        assert!(!compatible(&int(), &TypeRef::non_null(int()), &registry));
        assert!(!compatible(&TypeRef::list_of(int()), &int(), &registry));
        assert!(!compatible(
            &TypeRef::list_of(TypeRef::non_null(int())),
            &TypeRef::non_null(TypeRef::list_of(int())),
            &registry
        ));
        assert!(compatible(
            &TypeRef::list_of(int()),
            &TypeRef::list_of(int()),
            &registry
        ));
    }

    #[test]
    fn identifier_and_name_resolve_to_same_type() {
        let registry = scalars();
        assert!(compatible(
            &TypeRef::non_null(TypeRef::named("integer")),
            &TypeRef::non_null(TypeRef::named("Int")),
            &registry
        ));
        assert!(!compatible(
            &TypeRef::named("Int"),
            &TypeRef::named("String"),
            &registry
        ));
    }

    #[test]
    fn unknown_names_are_never_compatible() {
        let registry = scalars();
        let ghost = TypeRef::named("ghost");
        assert!(!compatible(&ghost, &ghost, &registry));
    }

    #[test]
    fn innermost_walks_all_wrappers() {
        let ty: TypeRef = "[[Int!]]!".parse().expect("notation should parse");
        assert_eq!(ty.innermost().as_str(), "Int");
        assert!(ty.is_non_null());
        assert!(ty.is_list());
        assert!(!TypeRef::named("Int").is_list());
    }

    #[test]
    fn notation_parses_nested_wrappers() {
        let ty: TypeRef = " [ Character ! ] ! ".parse().expect("notation should parse");
        assert_eq!(
            ty,
            TypeRef::non_null(TypeRef::list_of(TypeRef::non_null(TypeRef::named(
                "Character"
            ))))
        );
        insta::assert_snapshot!(ty.to_string(), @"[Character!]!");
    }

    #[test]
    fn notation_rejects_malformed_input() {
        assert!(matches!(
            "".parse::<TypeRef>(),
            Err(TypeRefParseError::ExpectedName { .. })
        ));
        assert!(matches!(
            "[Int".parse::<TypeRef>(),
            Err(TypeRefParseError::UnclosedList { .. })
        ));
        assert!(matches!(
            "Int!!".parse::<TypeRef>(),
            Err(TypeRefParseError::RepeatedNonNull { .. })
        ));
        assert!(matches!(
            "Int]".parse::<TypeRef>(),
            Err(TypeRefParseError::TrailingInput { .. })
        ));
        assert!(matches!(
            "[!]".parse::<TypeRef>(),
            Err(TypeRefParseError::ExpectedName { .. })
        ));
    }

    #[test]
    fn notation_caps_list_nesting() {
        let at_limit = format!("{}Int{}", "[".repeat(MAX_NESTING), "]".repeat(MAX_NESTING));
        let ty: TypeRef = at_limit.parse().expect("nesting at the limit should parse");
        assert_eq!(ty.innermost().as_str(), "Int");

        let past_limit = format!(
            "{}Int{}",
            "[".repeat(MAX_NESTING + 1),
            "]".repeat(MAX_NESTING + 1)
        );
        assert_eq!(
            past_limit.parse::<TypeRef>(),
            Err(TypeRefParseError::TooDeep { limit: MAX_NESTING })
        );

        let hostile = format!("{}Int{}", "[".repeat(200_000), "]".repeat(200_000));
        assert!(matches!(
            hostile.parse::<TypeRef>(),
            Err(TypeRefParseError::TooDeep { .. })
        ));
    }

    #[test]
    fn serde_uses_notation() {
        let ty: TypeRef = serde_json::from_str("\"[String]!\"").expect("should deserialize");
        assert_eq!(
            ty,
            TypeRef::non_null(TypeRef::list_of(TypeRef::named("String")))
        );
        assert_eq!(
            serde_json::to_string(&ty).expect("should serialize"),
            "\"[String]!\""
        );
        assert!(serde_json::from_str::<TypeRef>("\"[String\"").is_err());
    }
}
