//! Procedural macros for `brewery`.
//!
//! Every macro here reads the declaration it is attached to and emits new items next to it.
//! The declaration itself is re-emitted as written, except that marker attributes the macro
//! consumed are removed once no other `brewery` macro on the same item still needs them.
//!
//! ```rust,ignore
//! #[auto_init]
//! #[auto_builder]
//! pub struct Cat {
//!     pub age: u32,
//!     pub name: Option<String>,
//!     #[default(true)]
//!     pub fuzzy: bool,
//! }
//! ```
//!
//! This would generate:
//! - `Cat::new(age: u32) -> Cat`, with `name` set to `None` and `fuzzy` set to `true`,
//!   plus `with_name` and `with_fuzzy` to override them
//! - a `CatBuilder` with one setter per field and a fallible `build`, and `Cat::builder()`
//!
//! Macros that take arguments accept `access = "public" | "internal" | "private" | "fileprivate"`
//! to choose the visibility of what they generate. Without it, generated items copy the
//! visibility of the declaration.
//!
//! Problems are reported as compile errors at the offending field or attachment. Warnings
//! are reported as deprecation warnings, since that is the only kind of warning a stable
//! procedural macro can raise.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::missing_crate_level_docs)]
#![deny(missing_docs)]

mod access;
mod attachment;
mod auto_builder;
mod auto_init;
mod auto_parse;
mod auto_stub;
mod auto_type_erase;
mod diagnostic;
mod enum_properties;
mod markers;
#[cfg(test)]
mod proptests;
mod signature;
mod syntax;
mod test_each;
mod util;

extern crate proc_macro;

use attachment::Attachment;
use diagnostic::Expansion;
use quote::quote;
use syn::{parse_macro_input, Item};

fn attached(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
    accepts_from: bool,
    expand: fn(&Attachment, &Item) -> Expansion,
) -> proc_macro::TokenStream {
    let mut item = parse_macro_input!(item as Item);
    let attachment = match Attachment::parse(attr.into(), accepts_from) {
        Ok(attachment) => attachment,
        Err(e) => {
            markers::strip(&mut item);
            let error = e.to_compile_error();
            return quote!(#item #error).into();
        }
    };

    let expansion = expand(&attachment, &item);
    markers::strip(&mut item);
    quote!(#item #expansion).into()
}

fn marker(item: proc_macro::TokenStream, check: fn(&proc_macro2::TokenStream) -> Expansion) -> proc_macro::TokenStream {
    let item = proc_macro2::TokenStream::from(item);
    let expansion = check(&item);
    quote!(#item #expansion).into()
}

/// Generates a memberwise `new` constructor for a struct.
///
/// Parameters follow field order. Fields with a `#[default(value)]` marker, and `Option`
/// fields, are initialized by the constructor instead of being taken as parameters.
/// `PhantomData` fields are filled in automatically. Each initialized field also gets a
/// `with_field(value)` setter that replaces it on the constructed value.
///
/// ```rust,ignore
/// #[auto_init(access = "public")]
/// struct Cat {
///     age: u32,
///     #[default(true)]
///     fuzzy: bool,
/// }
///
/// let cat = Cat::new(3).with_fuzzy(false);
/// ```
#[proc_macro_attribute]
pub fn auto_init(attr: proc_macro::TokenStream, item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    attached(attr, item, false, auto_init::expand)
}

/// Generates a `NameBuilder` for a struct.
///
/// The builder has one by-value setter per field. `build` returns
/// `Err(brewery::BuildError::MissingField(..))` if a field without a default was never set.
#[proc_macro_attribute]
pub fn auto_builder(attr: proc_macro::TokenStream, item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    attached(attr, item, false, auto_builder::expand)
}

/// Generates a conversion from a raw transfer type into a struct.
///
/// `from = Type` names the raw type, which must have a field of the same name for every
/// field of the struct. Fields marked `#[auto_parseable]` are converted with their own
/// `brewery::AutoParseable` implementation.
///
/// ```rust,ignore
/// #[auto_parse(from = UserDto)]
/// struct User {
///     name: String,
///     #[auto_parseable]
///     address: Option<Address>,
/// }
///
/// let user = User::from(dto);
/// ```
#[proc_macro_attribute]
pub fn auto_parse(attr: proc_macro::TokenStream, item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    attached(attr, item, true, auto_parse::expand)
}

/// Marks a field as parsed through its own `brewery::AutoParseable` implementation.
///
/// Only meaningful on fields of a struct with `#[auto_parse]`.
#[proc_macro_attribute]
pub fn auto_parseable(_attr: proc_macro::TokenStream, item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    marker(item, auto_parse::expand_marker)
}

/// Generates a `stub` factory for a struct, for use in tests.
///
/// Each field takes its value from `#[stub(value)]`, or from its type's own `stub()` when
/// marked with a bare `#[stub]`. Remaining fields fall back to `#[default(value)]`, then
/// to `None` for `Option`s, and otherwise become parameters of `stub`. Fields that are not
/// parameters get a `with_field(value)` setter, shared with `#[auto_init]` when both are
/// attached.
#[proc_macro_attribute]
pub fn auto_stub(attr: proc_macro::TokenStream, item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    attached(attr, item, false, auto_stub::expand)
}

/// Sets the value a field gets from an `#[auto_stub]` factory.
///
/// Only meaningful on fields of a struct with `#[auto_stub]`.
#[proc_macro_attribute]
pub fn stub(_attr: proc_macro::TokenStream, item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    marker(item, auto_stub::expand_marker)
}

/// Generates an `AnyTrait` wrapper that implements a trait by forwarding to any value that
/// implements it.
///
/// Methods marked `#[property]` must have the form `fn name(&self) -> Type`. Their values
/// are copied out when the wrapper is created. Every other method is called through a
/// stored closure, and `async` methods are awaited. A trait without properties generates
/// nothing.
///
/// ```rust,ignore
/// #[auto_type_erase]
/// trait Animal {
///     #[property]
///     fn name(&self) -> String;
///     fn speak(&self) -> String;
/// }
///
/// let animals = vec![AnyAnimal::new(Cat), AnyAnimal::new(Dog)];
/// ```
#[proc_macro_attribute]
pub fn auto_type_erase(attr: proc_macro::TokenStream, item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    attached(attr, item, false, auto_type_erase::expand)
}

/// Generates `is_variant` checks and payload accessors for every variant of an enum.
///
/// A variant with one field gets `fn variant(&self) -> Option<&T>`, and a variant with
/// several gets `fn variant(&self) -> Option<(&A, &B, ..)>`.
#[proc_macro_attribute]
pub fn enum_properties(attr: proc_macro::TokenStream, item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    attached(attr, item, false, enum_properties::expand)
}

/// Runs a closure once per value, reporting each run under the value's source text.
///
/// ```rust,ignore
/// test_each!([1, 2, 3], |n| assert!(n > 0));
/// ```
#[proc_macro]
pub fn test_each(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    test_each::to_expression(&test_each::expand(input.into())).into()
}
