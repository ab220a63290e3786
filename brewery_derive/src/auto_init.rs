use crate::{
    access,
    attachment::Attachment,
    auto_stub,
    diagnostic::{Diagnostic, DiagnosticMessage, Expansion, Severity},
    markers,
    signature::{default_setters, field_values, own_default, phantom_values, render_inputs, Parameter},
    syntax::{require_types, DeclKind, Declaration, Property},
};
use quote::quote;
use syn::Item;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoInitDiagnostic {
    SupportedTypes,
    PropertyTypeRequired,
}

impl DiagnosticMessage for AutoInitDiagnostic {
    fn message(&self) -> String {
        match self {
            Self::SupportedTypes => "`#[auto_init]` can only be applied to structs.",
            Self::PropertyTypeRequired => "`#[auto_init]` requires that properties provide explicit type information.",
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

/// The constructor's parameters in declaration order.
///
/// Optional properties without an explicit default get `None`.
pub fn parameters<'a>(properties: &[Property<'a>]) -> Vec<Parameter<'a>> {
    properties
        .iter()
        .filter_map(|property| Parameter::new(property, own_default(property)))
        .collect()
}

/// Generates a memberwise `new` constructor for a struct.
pub fn expand(attachment: &Attachment, item: &Item) -> Expansion {
    let mut expansion = Expansion::new();
    let decl = Declaration::new(item);
    let (name, generics) = match decl.supported(DeclKind::Struct) {
        Some(supported) => supported,
        None => {
            expansion.diagnose(Diagnostic::at(attachment.span, AutoInitDiagnostic::SupportedTypes));
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
    let properties = require_types(properties, &mut expansion, AutoInitDiagnostic::PropertyTypeRequired);
    if properties.is_empty() {
        return expansion;
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let vis = access::resolve(attachment.access, &decl);

    let params = parameters(&properties);
    let inputs = render_inputs(&params);
    let values = field_values(&params);
    let phantoms = phantom_values(&computed);
    let covered = if markers::pending(item, "auto_stub") {
        auto_stub::parameters(&properties)
    } else {
        Vec::new()
    };
    let setters = default_setters(&params, &covered, &vis);

    expansion.push(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            #[inline]
            #vis fn new(#inputs) -> Self {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessLevel;
    use pretty_assertions::assert_eq;
    use proc_macro2::Span;
    use syn::parse_quote;

    fn expand_default(item: &Item) -> Expansion {
        expand(&Attachment::new(Span::call_site()), item)
    }

    #[test]
    fn memberwise_constructor() {
        let item: Item = parse_quote! {
            pub struct Cat {
                pub age: u32,
                pub name: Option<String>,
                pub soft: bool,
                #[default(true)]
                pub fuzzy: bool,
            }
        };
        let expansion = expand_default(&item);
        assert!(expansion.diagnostics.is_empty());
        assert_eq!(
            expansion.tokens(),
            quote! {
                impl Cat {
                    #[inline]
                    pub fn new(age: u32, soft: bool) -> Self {
                        Self {
                            age,
                            name: ::core::option::Option::None,
                            soft,
                            fuzzy: true,
                        }
                    }

                    #[must_use]
                    pub fn with_name(mut self, name: Option<String>) -> Self {
                        self.name = name;
                        self
                    }

                    #[must_use]
                    pub fn with_fuzzy(mut self, fuzzy: bool) -> Self {
                        self.fuzzy = fuzzy;
                        self
                    }
                }
            }
            .to_string(),
        );
    }

    #[test]
    fn setters_are_left_to_a_later_stub_factory() {
        let item: Item = parse_quote! {
            #[auto_stub]
            struct Cat {
                age: u32,
                #[default(true)]
                fuzzy: bool,
                #[stub(3)]
                lives: u8,
            }
        };
        let tokens = expand_default(&item).tokens();
        assert!(tokens.contains(&quote!(fn new(age: u32, lives: u8) -> Self).to_string()));
        assert!(!tokens.contains("with_fuzzy"));
        assert!(!tokens.contains("with_lives"));
    }

    #[test]
    fn parameter_model_keeps_every_property_in_order() {
        let item: Item = parse_quote! {
            struct Cat {
                age: u32,
                name: Option<String>,
                soft: bool,
                #[default(true)]
                fuzzy: bool,
            }
        };
        let properties = Declaration::new(&item).stored_properties().unwrap();
        let params = parameters(&properties);
        let summary = params
            .iter()
            .map(|p| match &p.default {
                Some(default) => format!("{} = {}", p.ident, default),
                None => p.ident.to_string(),
            })
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            ["age", "name = :: core :: option :: Option :: None", "soft", "fuzzy = true"],
        );
    }

    #[test]
    fn explicit_default_on_optional_is_kept() {
        let item: Item = parse_quote! {
            struct Cat {
                #[default(Some("Luna".to_string()))]
                name: Option<String>,
            }
        };
        let properties = Declaration::new(&item).stored_properties().unwrap();
        let params = parameters(&properties);
        let default = params[0].default.as_ref().unwrap();
        assert_eq!(default.to_string(), quote!(Some("Luna".to_string())).to_string());
    }

    #[test]
    fn access_level_precedence() {
        let item: Item = parse_quote! {
            pub(crate) struct Cat {
                age: u32,
            }
        };

        let inherited = expand_default(&item).tokens();
        assert!(inherited.contains(&quote!(pub(crate) fn new).to_string()));

        let mut attachment = Attachment::new(Span::call_site());
        attachment.access = Some(AccessLevel::Public);
        let explicit = expand(&attachment, &item).tokens();
        assert!(explicit.contains(&quote!(pub fn new).to_string()));

        let item: Item = parse_quote!(struct Cat { age: u32 });
        let unspecified = expand_default(&item).tokens();
        assert!(unspecified.contains(&quote!(#[inline] fn new).to_string()));
    }

    #[test]
    fn computed_fields_are_filled() {
        let item: Item = parse_quote! {
            struct Tagged<T> where T: Clone {
                value: u32,
                _tag: PhantomData<T>,
            }
        };
        let expansion = expand_default(&item);
        assert_eq!(
            expansion.tokens(),
            quote! {
                impl<T> Tagged<T> where T: Clone {
                    #[inline]
                    fn new(value: u32) -> Self {
                        Self {
                            value,
                            _tag: ::core::marker::PhantomData,
                        }
                    }
                }
            }
            .to_string(),
        );
    }

    #[test]
    fn empty_struct_produces_nothing() {
        let unit: Item = parse_quote!(struct Empty;);
        let braces: Item = parse_quote!(struct Empty {});
        let phantom_only: Item = parse_quote!(struct Empty { _p: PhantomData<u8> });
        for item in [unit, braces, phantom_only].iter() {
            let expansion = expand_default(item);
            assert!(expansion.items.is_empty());
            assert!(expansion.diagnostics.is_empty());
        }
    }

    #[test]
    fn missing_type_is_reported_per_property() {
        let item: Item = parse_quote! {
            struct Cat {
                age: u32,
                name: _,
            }
        };
        let expansion = expand_default(&item);
        assert_eq!(expansion.ids(), ["propertyTypeRequired"]);
        let tokens = expansion.tokens();
        assert!(tokens.contains(&quote!(fn new(age: u32)).to_string()));
        assert!(!tokens.contains("name"));
    }

    #[test]
    fn unsupported_kinds() {
        let items: Vec<Item> = vec![
            parse_quote!(enum Animal { Cat }),
            parse_quote!(trait Animal {}),
            parse_quote!(union Bits { a: u8 }),
        ];
        for item in items.iter() {
            let expansion = expand_default(item);
            assert!(expansion.items.is_empty());
            assert_eq!(expansion.ids(), ["supportedTypes"]);
        }
    }

    #[test]
    fn deterministic() {
        let item: Item = parse_quote! {
            struct Cat {
                age: u32,
                name: Option<String>,
            }
        };
        assert_eq!(expand_default(&item).tokens(), expand_default(&item).tokens());
    }
}
