//! Property-based tests over randomly shaped declarations.

use crate::{
    attachment::Attachment,
    auto_builder, auto_init, auto_stub,
    diagnostic::Expansion,
    syntax::Declaration,
    test_each,
};
use proc_macro2::{Span, TokenStream};
use proptest::prelude::*;
use quote::{format_ident, quote};
use syn::Item;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldShape {
    Required,
    Optional,
    Defaulted,
    Stubbed,
    Phantom,
    Untyped,
}

impl FieldShape {
    fn is_eligible(self) -> bool {
        !matches!(self, Self::Phantom | Self::Untyped)
    }
}

fn arb_shape() -> impl Strategy<Value = FieldShape> {
    prop_oneof![
        Just(FieldShape::Required),
        Just(FieldShape::Optional),
        Just(FieldShape::Defaulted),
        Just(FieldShape::Stubbed),
        Just(FieldShape::Phantom),
        Just(FieldShape::Untyped),
    ]
}

fn arb_fields() -> impl Strategy<Value = Vec<(String, FieldShape)>> {
    prop::collection::vec(("[a-z]{1,6}", arb_shape()), 0..8).prop_map(|fields| {
        fields
            .into_iter()
            .enumerate()
            .map(|(i, (name, shape))| (format!("{}_{}", name, i), shape))
            .collect()
    })
}

fn declare(fields: &[(String, FieldShape)]) -> Item {
    let fields = fields.iter().map(|(name, shape)| {
        let ident = format_ident!("{}", name);
        match shape {
            FieldShape::Required => quote! { #ident: u32 },
            FieldShape::Optional => quote! { #ident: Option<String> },
            FieldShape::Defaulted => quote! { #[default(7)] #ident: u32 },
            FieldShape::Stubbed => quote! { #[stub(9)] #ident: u32 },
            FieldShape::Phantom => quote! { #ident: ::core::marker::PhantomData<u8> },
            FieldShape::Untyped => quote! { #ident: _ },
        }
    });
    syn::parse2(quote! {
        pub struct Sample {
            #(#fields,)*
        }
    })
    .unwrap()
}

fn expand_with(expand: fn(&Attachment, &Item) -> Expansion, item: &Item) -> Expansion {
    expand(&Attachment::new(Span::call_site()), item)
}

fn eligible(fields: &[(String, FieldShape)]) -> Vec<&(String, FieldShape)> {
    fields.iter().filter(|(_, shape)| shape.is_eligible()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn init_parameters_follow_declaration_order(fields in arb_fields()) {
        let item = declare(&fields);
        let properties = Declaration::new(&item).stored_properties().unwrap();
        let properties = properties.into_iter().filter(|p| p.ty.is_some()).collect::<Vec<_>>();
        let params = auto_init::parameters(&properties);

        let expected = eligible(&fields);
        prop_assert_eq!(params.len(), expected.len());
        for (param, (name, shape)) in params.iter().zip(expected) {
            prop_assert_eq!(param.ident.to_string(), name.clone());
            let defaulted = matches!(shape, FieldShape::Optional | FieldShape::Defaulted);
            prop_assert_eq!(param.default.is_some(), defaulted);
        }
    }

    #[test]
    fn untyped_fields_are_reported_and_skipped(fields in arb_fields()) {
        let item = declare(&fields);
        let expansion = expand_with(auto_init::expand, &item);
        let untyped = fields.iter().filter(|(_, shape)| *shape == FieldShape::Untyped).count();
        prop_assert_eq!(expansion.ids().len(), untyped);
        prop_assert!(expansion.ids().iter().all(|id| *id == "propertyTypeRequired"));

        let tokens = expansion.tokens();
        for (name, shape) in fields.iter() {
            if *shape == FieldShape::Untyped {
                let needle = format!(" {} ", name);
                prop_assert!(!tokens.contains(&needle));
            }
        }
        prop_assert_eq!(expansion.items.is_empty(), eligible(&fields).is_empty());
    }

    #[test]
    fn expansions_are_deterministic(fields in arb_fields()) {
        let item = declare(&fields);
        let transformers: [fn(&Attachment, &Item) -> Expansion; 3] =
            [auto_init::expand, auto_builder::expand, auto_stub::expand];
        for expand in transformers.iter() {
            prop_assert_eq!(expand_with(*expand, &item).tokens(), expand_with(*expand, &item).tokens());
        }
    }

    #[test]
    fn one_setter_per_eligible_field(fields in arb_fields()) {
        let item = declare(&fields);
        let tokens = expand_with(auto_builder::expand, &item).tokens();
        prop_assert_eq!(tokens.matches("# [must_use]").count(), eligible(&fields).len());
    }

    #[test]
    fn stub_requires_only_unresolved_fields(fields in arb_fields()) {
        let item = declare(&fields);
        let properties = Declaration::new(&item).stored_properties().unwrap();
        let properties = properties.into_iter().filter(|p| p.ty.is_some()).collect::<Vec<_>>();
        let required = auto_stub::parameters(&properties)
            .into_iter()
            .filter(|p| p.is_required())
            .map(|p| p.ident.to_string())
            .collect::<Vec<_>>();
        let expected = fields
            .iter()
            .filter(|(_, shape)| *shape == FieldShape::Required)
            .map(|(name, _)| name.clone())
            .collect::<Vec<_>>();
        prop_assert_eq!(required, expected);
    }

    #[test]
    fn test_each_keeps_value_order(values in prop::collection::vec(0u16..1000, 1..12)) {
        let literals = values.iter().map(|v| proc_macro2::Literal::u16_unsuffixed(*v));
        let input: TokenStream = quote!([#(#literals),*], |n| check(n));
        let tokens = test_each::expand(input).tokens();
        let mut rest = tokens.as_str();
        for value in values.iter() {
            let label = format!("run_activity (\"{}\"", value);
            let at = rest.find(&label);
            prop_assert!(at.is_some());
            rest = &rest[at.unwrap_or(0) + label.len()..];
        }
        prop_assert_eq!(tokens.matches("run_activity").count(), values.len());
    }
}
