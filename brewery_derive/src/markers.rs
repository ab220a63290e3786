//! Removal of consumed marker attributes from re-emitted items.
//!
//! Markers like `#[default(..)]` are inert: they only carry data for the
//! attribute macros on the enclosing item. Each of those macros re-emits the
//! item, and the markers must be gone by the time rustc sees it. A marker stays
//! while a later macro on the same item may still read it.

use crate::util::attr_name;
use syn::{Attribute, Item, TraitItem};

/// Each marker with the macros that read it.
const MARKERS: &[(&str, &[&str])] = &[
    ("default", &["auto_init", "auto_builder", "auto_stub"]),
    ("stub", &["auto_stub"]),
    ("auto_parseable", &["auto_parse"]),
    ("property", &["auto_type_erase"]),
];

/// Markers that no remaining attribute on the item still needs.
fn consumed(remaining: &[Attribute]) -> Vec<&'static str> {
    let needed = |consumer: &&str| {
        remaining
            .iter()
            .filter_map(attr_name)
            .any(|name| name == consumer)
    };
    MARKERS
        .iter()
        .filter(|(_, consumers)| !consumers.iter().any(needed))
        .map(|(marker, _)| *marker)
        .collect()
}

fn retain(attrs: &mut Vec<Attribute>, consumed: &[&str]) {
    attrs.retain(|attr| attr_name(attr).map_or(true, |name| !consumed.iter().any(|marker| name == marker)));
}

/// Whether `name` is still attached to `item`, so it expands after the macro
/// currently running.
pub fn pending(item: &Item, name: &str) -> bool {
    let attrs = match item {
        Item::Struct(item) => &item.attrs,
        Item::Trait(item) => &item.attrs,
        Item::Enum(item) => &item.attrs,
        _ => return false,
    };
    attrs.iter().filter_map(attr_name).any(|attr| attr == name)
}

/// Strips markers from struct fields and trait items.
///
/// `item` must no longer carry the attribute currently being expanded, which is
/// how rustc hands it to an attribute macro.
pub fn strip(item: &mut Item) {
    match item {
        Item::Struct(item) => {
            let consumed = consumed(&item.attrs);
            for field in item.fields.iter_mut() {
                retain(&mut field.attrs, &consumed);
            }
        }
        Item::Trait(item) => {
            let consumed = consumed(&item.attrs);
            for member in item.items.iter_mut() {
                if let TraitItem::Method(method) = member {
                    retain(&mut method.attrs, &consumed);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quote::quote;
    use syn::parse_quote;

    fn stripped(mut item: Item) -> String {
        strip(&mut item);
        quote!(#item).to_string()
    }

    #[test]
    fn last_consumer_strips() {
        let item: Item = parse_quote! {
            struct Cat {
                #[default(3)]
                #[stub(7)]
                #[serde(rename = "years")]
                age: u32,
            }
        };
        assert_eq!(
            stripped(item),
            quote! {
                struct Cat {
                    #[serde(rename = "years")]
                    age: u32,
                }
            }
            .to_string(),
        );
    }

    #[test]
    fn markers_wait_for_later_consumers() {
        let item: Item = parse_quote! {
            #[brewery::auto_stub]
            struct Cat {
                #[default(3)]
                #[stub(7)]
                #[auto_parseable]
                age: u32,
            }
        };
        assert_eq!(
            stripped(item),
            quote! {
                #[brewery::auto_stub]
                struct Cat {
                    #[default(3)]
                    #[stub(7)]
                    age: u32,
                }
            }
            .to_string(),
        );

        let item: Item = parse_quote! {
            #[auto_builder]
            struct Cat {
                #[default(3)]
                #[stub(7)]
                age: u32,
            }
        };
        assert_eq!(
            stripped(item),
            quote! {
                #[auto_builder]
                struct Cat {
                    #[default(3)]
                    age: u32,
                }
            }
            .to_string(),
        );
    }

    #[test]
    fn pending_macros() {
        let item: Item = parse_quote! {
            #[brewery::auto_stub]
            #[derive(Debug)]
            struct Cat {
                age: u32,
            }
        };
        assert!(pending(&item, "auto_stub"));
        assert!(!pending(&item, "auto_init"));
        assert!(!pending(&parse_quote!(fn cat() {}), "auto_stub"));
    }

    #[test]
    fn trait_properties() {
        let item: Item = parse_quote! {
            trait Animal {
                /// The name.
                #[property]
                fn name(&self) -> String;
            }
        };
        let tokens = stripped(item);
        assert!(!tokens.contains("property"));
        assert!(tokens.contains("doc"));
    }

    #[test]
    fn other_items_are_untouched() {
        let item: Item = parse_quote! {
            #[derive(Default)]
            enum Light {
                #[default]
                Red,
                Green,
            }
        };
        assert_eq!(stripped(item.clone()), quote!(#item).to_string());
    }
}
