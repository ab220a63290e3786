use crate::{
    access,
    attachment::Attachment,
    diagnostic::{Diagnostic, DiagnosticMessage, Expansion, Severity},
    syntax::Declaration,
    util::ident,
};
use inflector::cases::snakecase::to_snake_case;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::HashSet;
use syn::{ext::IdentExt, Fields, Ident, Item, Variant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnumPropertiesDiagnostic {
    SupportedTypes,
    DuplicateAccessor,
}

impl DiagnosticMessage for EnumPropertiesDiagnostic {
    fn message(&self) -> String {
        match self {
            Self::SupportedTypes => "`#[enum_properties]` can only be applied to enums.",
            Self::DuplicateAccessor => {
                "`#[enum_properties]` would give this variant an accessor name that an earlier variant already uses."
            }
        }
        .to_string()
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn id(&self) -> &'static str {
        match self {
            Self::SupportedTypes => "supportedTypes",
            Self::DuplicateAccessor => "duplicateAccessor",
        }
    }
}

/// The methods generated for one variant.
struct Accessors<'a> {
    variant: &'a Variant,
    is_case: Ident,
    /// Absent for variants without fields.
    payload: Option<Ident>,
}

impl<'a> Accessors<'a> {
    fn new(variant: &'a Variant) -> Self {
        let name = &variant.ident;
        let snake = to_snake_case(&name.unraw().to_string());
        Self {
            variant,
            is_case: ident(&format!("is_{}", snake), name.span()),
            payload: if variant.fields.is_empty() {
                None
            } else {
                Some(ident(&snake, name.span()))
            },
        }
    }

    fn names(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(&self.is_case).chain(self.payload.as_ref()).map(Ident::to_string)
    }

    fn render(&self, vis: &TokenStream) -> TokenStream {
        let name = &self.variant.ident;
        let is_case = &self.is_case;
        let check = quote! {
            #vis fn #is_case(&self) -> bool {
                ::core::matches!(self, Self::#name { .. })
            }
        };
        let payload = match &self.payload {
            Some(payload) => payload,
            None => return check,
        };

        let fields = self.variant.fields.iter().collect::<Vec<_>>();
        let bindings = (0..fields.len()).map(|i| format_ident!("__{}", i)).collect::<Vec<_>>();
        let pattern = match &self.variant.fields {
            Fields::Named(_) => {
                let labels = fields.iter().filter_map(|field| field.ident.as_ref());
                quote! { Self::#name { #(#labels: #bindings),* } }
            }
            Fields::Unnamed(_) => quote! { Self::#name(#(#bindings),*) },
            Fields::Unit => return check,
        };
        let (ty, value) = match fields.as_slice() {
            [field] => {
                let ty = &field.ty;
                (quote!(&#ty), quote!(__0))
            }
            _ => {
                let tys = fields.iter().map(|field| &field.ty);
                (quote!((#(&#tys),*)), quote!((#(#bindings),*)))
            }
        };

        quote! {
            #check

            #[allow(unreachable_patterns)]
            #vis fn #payload(&self) -> ::core::option::Option<#ty> {
                match self {
                    #pattern => ::core::option::Option::Some(#value),
                    _ => ::core::option::Option::None,
                }
            }
        }
    }
}

/// Generates `is_*` checks and payload accessors for every variant of an enum.
pub fn expand(attachment: &Attachment, item: &Item) -> Expansion {
    let mut expansion = Expansion::new();
    let decl = Declaration::new(item);
    let input = match decl {
        Declaration::Enum(input) => input,
        _ => {
            expansion.diagnose(Diagnostic::at(attachment.span, EnumPropertiesDiagnostic::SupportedTypes));
            return expansion;
        }
    };
    if input.variants.is_empty() {
        return expansion;
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let vis = access::resolve(attachment.access, &decl);

    let mut taken = HashSet::new();
    let mut methods = Vec::new();
    for variant in input.variants.iter() {
        let accessors = Accessors::new(variant);
        if accessors.names().any(|name| taken.contains(&name)) {
            expansion.diagnose(Diagnostic::spanned(&variant.ident, EnumPropertiesDiagnostic::DuplicateAccessor));
            continue;
        }
        taken.extend(accessors.names());
        methods.push(accessors.render(&vis));
    }

    expansion.push(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            #(#methods)*
        }
    });

    expansion
}
