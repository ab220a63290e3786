use crate::{
    access,
    attachment::Attachment,
    diagnostic::{Diagnostic, DiagnosticMessage, Expansion, Severity},
    signature::phantom_values,
    syntax::{option_inner, require_types, DeclKind, Declaration, Property},
};
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Field, Item};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoParseDiagnostic {
    SupportedTypes,
    PropertyTypeRequired,
    NoRawType,
}

impl DiagnosticMessage for AutoParseDiagnostic {
    fn message(&self) -> String {
        match self {
            Self::SupportedTypes => "`#[auto_parse]` can only be applied to structs.",
            Self::PropertyTypeRequired => "`#[auto_parse]` requires that properties provide explicit type information.",
            Self::NoRawType => "`#[auto_parse]` requires a `from = Type` argument naming the type to parse from.",
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
            Self::NoRawType => "noRawType",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoParseableDiagnostic {
    NotProperty,
}

impl DiagnosticMessage for AutoParseableDiagnostic {
    fn message(&self) -> String {
        "`#[auto_parseable]` can only be applied to properties.".to_string()
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn id(&self) -> &'static str {
        "notProperty"
    }
}

/// The expression that reads one property off `raw`.
///
/// Marked properties convert through their own type's `AutoParseable` impl.
/// Optional ones map over the `Option`, so an absent value stays absent.
fn parse_value(property: &Property) -> Option<TokenStream> {
    let ident = property.ident?;
    let ty = property.ty?;
    let value = if !property.recursive_parse() {
        quote! { raw.#ident }
    } else if let Some(inner) = option_inner(ty) {
        quote! { raw.#ident.map(<#inner as ::brewery::AutoParseable>::parse) }
    } else {
        quote! { <#ty as ::brewery::AutoParseable>::parse(raw.#ident) }
    };
    Some(quote! { #ident: #value })
}

/// Generates `from_raw`, an `AutoParseable` impl and `From<Raw>` for a struct.
pub fn expand(attachment: &Attachment, item: &Item) -> Expansion {
    let mut expansion = Expansion::new();
    let decl = Declaration::new(item);
    let (name, generics) = match decl.supported(DeclKind::Struct) {
        Some(supported) => supported,
        None => {
            expansion.diagnose(Diagnostic::at(attachment.span, AutoParseDiagnostic::SupportedTypes));
            return expansion;
        }
    };

    let raw = match &attachment.from {
        Some(raw) => raw,
        None => {
            expansion.diagnose(Diagnostic::at(attachment.span, AutoParseDiagnostic::NoRawType));
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
    let properties = require_types(properties, &mut expansion, AutoParseDiagnostic::PropertyTypeRequired);
    if properties.is_empty() {
        return expansion;
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let vis = access::resolve(attachment.access, &decl);
    let values = properties.iter().filter_map(parse_value);
    let phantoms = phantom_values(&computed);

    expansion.push(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            #vis fn from_raw(raw: #raw) -> Self {
                Self {
                    #(#values,)*
                    #phantoms
                }
            }
        }

        impl #impl_generics ::brewery::AutoParseable for #name #ty_generics #where_clause {
            type Raw = #raw;

            #[inline]
            fn parse(raw: #raw) -> Self {
                Self::from_raw(raw)
            }
        }

        impl #impl_generics ::core::convert::From<#raw> for #name #ty_generics #where_clause {
            #[inline]
            fn from(raw: #raw) -> Self {
                Self::from_raw(raw)
            }
        }
    });

    expansion
}

/// Checks a standalone `#[auto_parseable]`.
///
/// The marker only means something on a field consumed by `#[auto_parse]`;
/// anywhere else it is an error. It never generates code.
pub fn expand_marker(item: &TokenStream) -> Expansion {
    let mut expansion = Expansion::new();
    if syn::parse::Parser::parse2(Field::parse_named, item.clone()).is_err() {
        expansion.diagnose(Diagnostic::at(Span::call_site(), AutoParseableDiagnostic::NotProperty));
    }
    expansion
}
