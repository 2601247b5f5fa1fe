//! # Absolve Kernel
//!
//! Abstract-type resolution and interface covariance for typed query schemas.
//!
//! Two questions are answered here, and nothing else:
//!
//! 1. At execution time: a value was declared as an interface; which concrete
//!    object type is it?
//! 2. At schema-build time: does every object that claims an interface really
//!    provide each interface field, wrapped exactly the same way?
//!
//! Query parsing, field execution and response formatting belong to the
//! caller. The kernel receives built [`InterfaceType`], [`ObjectType`] and
//! [`Schema`] values and never mutates them.
//!
//! ## Architecture
//!
//! ```text
//! TypeRef               ← Named | ListOf | NonNullOf, structural compatibility
//!     │
//! Schema                ← Registry by identifier/name + implementor index
//!     │
//! ├── covariance        ← check_implements: all invalid fields, never the first
//! ├── resolvability     ← is_resolvable: resolver fn or total is_type_of cover
//! └── resolve           ← resolve_type: resolver fn first, then is_type_of order
//!     │
//! validation            ← Whole-schema report (accepted / rejected)
//!     │
//! document              ← JSON schema description with declarative discriminators
//! ```

pub mod covariance;
pub mod document;
pub mod error;
pub mod field;
pub mod interface;
pub mod object;
pub mod resolvability;
pub mod resolve;
pub mod schema;
pub mod type_ref;
pub mod validation;

pub use covariance::{InvalidFields, check_implements};
pub use document::{
    DOCUMENT_KIND, DOCUMENT_SCHEMA, Discriminator, DocumentError, PresenceRule, SchemaDocument,
    TypeEntry, TypePredicate,
};
pub use error::{ResolveError, SchemaError};
pub use field::{Argument, Field};
pub use interface::{InterfaceType, ResolveTypeFn};
pub use object::{IsTypeOfFn, ObjectType};
pub use resolvability::is_resolvable;
pub use resolve::{ExecutionContext, ResolvedType, resolve_type, resolve_type_with};
pub use schema::{ScalarType, Schema, SchemaBuilder, SchemaType, TypeKind};
pub use type_ref::{TypeId, TypeRef, TypeRefParseError, TypeRegistry, compatible};
pub use validation::{
    ValidationIssue, ValidationReport, failure_class as validation_failure_class,
    validate_schema,
};
