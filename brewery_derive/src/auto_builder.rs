use crate::{
    access,
    attachment::Attachment,
    diagnostic::{Diagnostic, DiagnosticMessage, Expansion, Severity},
    signature::phantom_values,
    syntax::{require_types, DeclKind, Declaration, Property},
    util::builder_name,
};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Ident, Item, LitStr, Type};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoBuilderDiagnostic {
    SupportedTypes,
    PropertyTypeRequired,
}

impl DiagnosticMessage for AutoBuilderDiagnostic {
    fn message(&self) -> String {
        match self {
            Self::SupportedTypes => "`#[auto_builder]` can only be applied to structs.",
            Self::PropertyTypeRequired => "`#[auto_builder]` requires that properties provide explicit type information.",
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

/// How a builder stores one property until `build` is called.
enum Slot<'a> {
    /// Starts at the property's `#[default]` value.
    Defaulted(&'a syn::Expr),
    /// The property is itself optional and starts at `None`.
    Optional,
    /// Must be set before `build`.
    Required,
}

struct BuilderField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    slot: Slot<'a>,
}

impl<'a> BuilderField<'a> {
    fn new(property: &'a Property<'a>) -> Option<Self> {
        let slot = if let Some(default) = &property.default {
            Slot::Defaulted(default)
        } else if property.is_optional() {
            Slot::Optional
        } else {
            Slot::Required
        };
        Some(Self {
            ident: property.ident?,
            ty: property.ty?,
            slot,
        })
    }

    fn declaration(&self) -> TokenStream {
        let ident = self.ident;
        let ty = self.ty;
        match self.slot {
            Slot::Defaulted(_) | Slot::Optional => quote! { #ident: #ty },
            Slot::Required => quote! { #ident: ::core::option::Option<#ty> },
        }
    }

    fn initial(&self) -> TokenStream {
        let ident = self.ident;
        match self.slot {
            Slot::Defaulted(default) => quote! { #ident: #default },
            Slot::Optional | Slot::Required => quote! { #ident: ::core::option::Option::None },
        }
    }

    fn setter(&self, vis: &TokenStream) -> TokenStream {
        let ident = self.ident;
        let ty = self.ty;
        let value = match self.slot {
            Slot::Defaulted(_) | Slot::Optional => quote! { #ident },
            Slot::Required => quote! { ::core::option::Option::Some(#ident) },
        };
        quote! {
            #[must_use]
            #vis fn #ident(mut self, #ident: #ty) -> Self {
                self.#ident = #value;
                self
            }
        }
    }

    fn build_value(&self) -> TokenStream {
        let ident = self.ident;
        match self.slot {
            Slot::Defaulted(_) | Slot::Optional => quote! { #ident: self.#ident },
            Slot::Required => {
                let name = LitStr::new(&ident.to_string(), ident.span());
                quote! {
                    #ident: match self.#ident {
                        ::core::option::Option::Some(value) => value,
                        ::core::option::Option::None => {
                            return ::core::result::Result::Err(::brewery::BuildError::MissingField(#name));
                        }
                    }
                }
            }
        }
    }
}

/// Generates a `NameBuilder` with fluent setters and a fallible `build`.
pub fn expand(attachment: &Attachment, item: &Item) -> Expansion {
    let mut expansion = Expansion::new();
    let decl = Declaration::new(item);
    let (name, generics) = match decl.supported(DeclKind::Struct) {
        Some(supported) => supported,
        None => {
            expansion.diagnose(Diagnostic::at(attachment.span, AutoBuilderDiagnostic::SupportedTypes));
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
    let properties = require_types(properties, &mut expansion, AutoBuilderDiagnostic::PropertyTypeRequired);
    if properties.is_empty() {
        return expansion;
    }

    let builder = builder_name(name);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let vis = access::resolve(attachment.access, &decl);

    let fields = properties.iter().filter_map(BuilderField::new).collect::<Vec<_>>();
    let declarations = fields.iter().map(BuilderField::declaration);
    let initials = fields.iter().map(BuilderField::initial);
    let setters = fields.iter().map(|field| field.setter(&vis));
    let build_values = fields.iter().map(BuilderField::build_value);
    let phantoms = phantom_values(&computed);

    // Generic parameters may only appear in skipped fields, so the builder
    // always mentions the target type.
    let (target_field, target_initial) = if generics.params.is_empty() {
        (quote!(), quote!())
    } else {
        (
            quote! { _target: ::core::marker::PhantomData<fn() -> #name #ty_generics>, },
            quote! { _target: ::core::marker::PhantomData, },
        )
    };

    expansion.push(quote! {
        #vis struct #builder #generics #where_clause {
            #(#declarations,)*
            #target_field
        }

        impl #impl_generics #builder #ty_generics #where_clause {
            #vis fn new() -> Self {
                Self {
                    #(#initials,)*
                    #target_initial
                }
            }

            #(#setters)*

            #vis fn build(self) -> ::core::result::Result<#name #ty_generics, ::brewery::BuildError> {
                ::core::result::Result::Ok(#name {
                    #(#build_values,)*
                    #phantoms
                })
            }
        }

        impl #impl_generics ::core::default::Default for #builder #ty_generics #where_clause {
            fn default() -> Self {
                Self::new()
            }
        }

        impl #impl_generics #name #ty_generics #where_clause {
            #vis fn builder() -> #builder #ty_generics {
                #builder::new()
            }
        }
    });

    expansion
}
