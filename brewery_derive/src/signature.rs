use crate::syntax::Property;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Ident, Type};

/// One parameter of a generated constructor or factory.
#[derive(Clone, Debug)]
pub struct Parameter<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    /// The value used when the caller does not supply one.
    pub default: Option<TokenStream>,
}

impl<'a> Parameter<'a> {
    /// Builds a parameter from an eligible property. Returns `None` for
    /// properties without a name or explicit type.
    pub fn new(property: &Property<'a>, default: Option<TokenStream>) -> Option<Self> {
        Some(Self {
            ident: property.ident?,
            ty: property.ty?,
            default,
        })
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// The default a property carries by itself: its `#[default]` value, or `None`
/// for an optional property.
pub fn own_default(property: &Property) -> Option<TokenStream> {
    if let Some(default) = &property.default {
        Some(quote!(#default))
    } else if property.is_optional() {
        Some(quote!(::core::option::Option::None))
    } else {
        None
    }
}

/// Renders the required parameters as `name: Type` pairs.
///
/// Rust functions have no default arguments, so parameters with a default are
/// left out and filled in by [`field_values`].
pub fn render_inputs(params: &[Parameter]) -> TokenStream {
    let inputs = params.iter().filter(|p| p.is_required()).map(|p| {
        let ident = p.ident;
        let ty = p.ty;
        quote! { #ident: #ty }
    });
    quote! { #(#inputs),* }
}

/// Renders `field: value` initializers for every parameter, in order.
pub fn field_values(params: &[Parameter]) -> TokenStream {
    let values = params.iter().map(|p| {
        let ident = p.ident;
        match &p.default {
            Some(default) => quote! { #ident: #default },
            None => quote! { #ident },
        }
    });
    quote! { #(#values,)* }
}

/// Renders a chainable `with_field` setter for every defaulted parameter, so a
/// value from `new` or `stub` can still override what it was defaulted to.
///
/// Parameters that are also defaulted in `covered` are skipped. That is the
/// parameter model of a sibling macro expanding later on the same item, which
/// emits those setters itself.
pub fn default_setters(params: &[Parameter], covered: &[Parameter], vis: &TokenStream) -> TokenStream {
    let setters = params
        .iter()
        .filter(|p| !p.is_required())
        .filter(|p| !covered.iter().any(|c| !c.is_required() && c.ident == p.ident))
        .map(|p| {
            let ident = p.ident;
            let ty = p.ty;
            let setter = format_ident!("with_{}", ident);
            quote! {
                #[must_use]
                #vis fn #setter(mut self, #ident: #ty) -> Self {
                    self.#ident = #ident;
                    self
                }
            }
        });
    quote! { #(#setters)* }
}

/// Renders `field: PhantomData` initializers for fields that carry no data.
pub fn phantom_values(computed: &[Property]) -> TokenStream {
    let idents = computed.iter().filter_map(|p| p.ident);
    quote! { #(#idents: ::core::marker::PhantomData,)* }
}
