use proc_macro2::Span;
use syn::{Attribute, Ident};

/// The last path segment of an attribute, so `#[brewery::stub]` reads as `stub`.
pub fn attr_name(attr: &Attribute) -> Option<&Ident> {
    attr.path.segments.last().map(|segment| &segment.ident)
}

/// Makes an identifier, escaping it as a raw identifier when it is a keyword.
pub fn ident(name: &str, span: Span) -> Ident {
    if syn::parse_str::<Ident>(name).is_ok() {
        Ident::new(name, span)
    } else if matches!(name, "crate" | "self" | "super" | "Self") {
        // These cannot be raw identifiers.
        Ident::new(&format!("{}_", name), span)
    } else {
        Ident::new_raw(name, span)
    }
}

pub fn builder_name(name: &Ident) -> Ident {
    Ident::new(&format!("{}Builder", name), name.span())
}

pub fn erased_name(name: &Ident) -> Ident {
    Ident::new(&format!("Any{}", name), name.span())
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn keywords_become_raw() {
        assert_eq!(ident("success", Span::call_site()).to_string(), "success");
        assert_eq!(ident("match", Span::call_site()).to_string(), "r#match");
        assert_eq!(ident("crate", Span::call_site()).to_string(), "crate_");
    }

    #[test]
    fn attribute_names() {
        let attr: Attribute = parse_quote!(#[brewery::stub(7)]);
        assert_eq!(attr_name(&attr).unwrap(), "stub");
    }

    #[test]
    fn generated_names() {
        let name: Ident = parse_quote!(Animal);
        assert_eq!(builder_name(&name), "AnimalBuilder");
        assert_eq!(erased_name(&name), "AnyAnimal");
    }
}
