//! `brewery` generates the boilerplate that grows around plain data types: memberwise
//! constructors, builders, stub factories for tests, conversions from transfer types,
//! type-erased trait wrappers and enum accessors.
//!
//! Everything is driven by attributes on the declaration itself:
//!
//! ```rust
//! use brewery::{auto_builder, auto_init};
//!
//! #[auto_init]
//! #[auto_builder]
//! pub struct Cat {
//!     pub age: u32,
//!     pub name: Option<String>,
//!     #[default(true)]
//!     pub fuzzy: bool,
//! }
//!
//! let cat = Cat::new(3);
//! assert_eq!(cat.name, None);
//! assert!(cat.fuzzy);
//!
//! let cat = Cat::new(3).with_name(Some("Tom".to_string()));
//! assert_eq!(cat.name.as_deref(), Some("Tom"));
//!
//! let cat = Cat::builder().age(5).fuzzy(false).build().unwrap();
//! assert_eq!(cat.age, 5);
//! assert!(Cat::builder().build().is_err());
//! ```
//!
//! The macros themselves live in [`brewery_derive`] and are re-exported here. This crate
//! holds the runtime pieces the generated code refers to: [`BuildError`], the
//! [`AutoParseable`] trait and the [`activity`] runner behind [`test_each!`].
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::missing_crate_level_docs)]
#![deny(missing_docs)]

pub mod activity;
mod parse;

use core::fmt;

pub use crate::parse::AutoParseable;
pub use brewery_derive::{
    auto_builder, auto_init, auto_parse, auto_parseable, auto_stub, auto_type_erase, enum_properties, stub,
    test_each,
};

/// The error returned by a generated builder's `build`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildError {
    /// A field without a default was never set. Holds the field's name.
    MissingField(&'static str),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "tried to build without setting required field `{}`", field),
        }
    }
}

impl std::error::Error for BuildError {}
