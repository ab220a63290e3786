use crate::{
    access,
    attachment::Attachment,
    auto_init,
    diagnostic::{Diagnostic, DiagnosticMessage, Expansion, Severity},
    markers,
    signature::{default_setters, field_values, own_default, phantom_values, render_inputs, Parameter},
    syntax::{option_inner, require_types, DeclKind, Declaration, Property, StubMarker},
};
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Field, Item};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoStubDiagnostic {
    SupportedTypes,
    PropertyTypeRequired,
}

impl DiagnosticMessage for AutoStubDiagnostic {
    fn message(&self) -> String {
        match self {
            Self::SupportedTypes => "`#[auto_stub]` can only be applied to structs.",
            Self::PropertyTypeRequired => "`#[auto_stub]` requires that properties provide explicit type information.",
        }
        .to_string()
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn id(&self) -> &'static str {
        match self {
            Self::SupportedTypes => "supportedTypes",
            Self::PropertyTypeRequired => "propertyTypeRequired",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StubDiagnostic {
    NotProperty,
}

impl DiagnosticMessage for StubDiagnostic {
    fn message(&self) -> String {
        "`#[stub]` can only be applied to properties.".to_string()
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn id(&self) -> &'static str {
        "notProperty"
    }
}

/// Resolves the stub value of one property.
///
/// An explicit `#[stub(value)]` wins, then a bare `#[stub]` delegating to the
/// property type's own `stub()`, then the property's own default.
fn stub_default(property: &Property) -> Option<TokenStream> {
    match (&property.stub, property.ty) {
        (Some(StubMarker::Value(value)), _) => Some(quote!(#value)),
        (Some(StubMarker::Delegate), Some(ty)) => Some(match option_inner(ty) {
            Some(inner) => quote!(::core::option::Option::Some(<#inner>::stub())),
            None => quote!(<#ty>::stub()),
        }),
        _ => own_default(property),
    }
}

pub fn parameters<'a>(properties: &[Property<'a>]) -> Vec<Parameter<'a>> {
    properties
        .iter()
        .filter_map(|property| Parameter::new(property, stub_default(property)))
        .collect()
}

/// Generates a `stub` factory for a struct.
pub fn expand(attachment: &Attachment, item: &Item) -> Expansion {
    let mut expansion = Expansion::new();
    let decl = Declaration::new(item);
    let (name, generics) = match decl.supported(DeclKind::Struct) {
        Some(supported) => supported,
        None => {
            expansion.diagnose(Diagnostic::at(attachment.span, AutoStubDiagnostic::SupportedTypes));
            return expansion;
        }
    };

    let (properties, computed) = match (decl.stored_properties(), decl.computed_properties()) {
        (Ok(properties), Ok(computed)) => (properties, computed),
        (Err(e), _) | (_, Err(e)) => {
            expansion.diagnose(e);
            return expansion;
        }
    };
    let properties = require_types(properties, &mut expansion, AutoStubDiagnostic::PropertyTypeRequired);
    if properties.is_empty() {
        return expansion;
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let vis = access::resolve(attachment.access, &decl);

    let params = parameters(&properties);
    let inputs = render_inputs(&params);
    let values = field_values(&params);
    let phantoms = phantom_values(&computed);
    let covered = if markers::pending(item, "auto_init") {
        auto_init::parameters(&properties)
    } else {
        Vec::new()
    };
    let setters = default_setters(&params, &covered, &vis);

    expansion.push(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            #vis fn stub(#inputs) -> Self {
                Self {
                    #values
                    #phantoms
                }
            }

            #setters
        }
    });

    expansion
}

/// Checks a standalone `#[stub]`, which is only valid on fields.
pub fn expand_marker(item: &TokenStream) -> Expansion {
    let mut expansion = Expansion::new();
    if syn::parse::Parser::parse2(Field::parse_named, item.clone()).is_err() {
        expansion.diagnose(Diagnostic::at(Span::call_site(), StubDiagnostic::NotProperty));
    }
    expansion
}
