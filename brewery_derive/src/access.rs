use crate::syntax::Declaration;
use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::Visibility;

/// The access levels a macro argument may name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessLevel {
    Public,
    Internal,
    Private,
    FilePrivate,
}

impl AccessLevel {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(Self::Public),
            "internal" => Some(Self::Internal),
            "private" => Some(Self::Private),
            "fileprivate" => Some(Self::FilePrivate),
            _ => None,
        }
    }

    /// Reads the access level keyword off a declared visibility.
    ///
    /// Restricted visibilities other than `pub(crate)` and `pub(self)` have no
    /// matching keyword and yield `None`.
    pub fn of(vis: &Visibility) -> Option<Self> {
        match vis {
            Visibility::Public(_) => Some(Self::Public),
            Visibility::Crate(_) => Some(Self::Internal),
            Visibility::Restricted(restricted) if restricted.in_token.is_none() => {
                if restricted.path.is_ident("crate") {
                    Some(Self::Internal)
                } else if restricted.path.is_ident("self") {
                    Some(Self::FilePrivate)
                } else {
                    None
                }
            }
            Visibility::Restricted(_) | Visibility::Inherited => None,
        }
    }
}

impl ToTokens for AccessLevel {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(match self {
            Self::Public => quote!(pub),
            Self::Internal => quote!(pub(crate)),
            Self::FilePrivate => quote!(pub(self)),
            Self::Private => quote!(),
        });
    }
}

/// Picks the visibility of generated items.
///
/// An explicit macro argument wins, then the declaration's own access level,
/// then the default (no keyword). Restricted visibilities without a keyword,
/// like `pub(super)`, are carried over as written.
pub fn resolve(explicit: Option<AccessLevel>, decl: &Declaration) -> TokenStream {
    match (explicit.or_else(|| decl.access_level()), decl.visibility()) {
        (Some(level), _) => level.into_token_stream(),
        (None, Some(vis)) => vis.into_token_stream(),
        (None, None) => TokenStream::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::{parse_quote, Item};

    #[test]
    fn keywords() {
        assert_eq!(AccessLevel::from_keyword("public"), Some(AccessLevel::Public));
        assert_eq!(AccessLevel::from_keyword("internal"), Some(AccessLevel::Internal));
        assert_eq!(AccessLevel::from_keyword("private"), Some(AccessLevel::Private));
        assert_eq!(AccessLevel::from_keyword("fileprivate"), Some(AccessLevel::FilePrivate));
        assert_eq!(AccessLevel::from_keyword("open"), None);
    }

    #[test]
    fn reads_declared_visibility() {
        let public: Visibility = parse_quote!(pub);
        let internal: Visibility = parse_quote!(pub(crate));
        let module: Visibility = parse_quote!(pub(self));
        let parent: Visibility = parse_quote!(pub(super));

        assert_eq!(AccessLevel::of(&public), Some(AccessLevel::Public));
        assert_eq!(AccessLevel::of(&internal), Some(AccessLevel::Internal));
        assert_eq!(AccessLevel::of(&module), Some(AccessLevel::FilePrivate));
        assert_eq!(AccessLevel::of(&parent), None);
        assert_eq!(AccessLevel::of(&Visibility::Inherited), None);
    }

    #[test]
    fn explicit_argument_wins() {
        let item: Item = parse_quote!(pub(crate) struct Cat;);
        let decl = Declaration::new(&item);
        assert_eq!(
            resolve(Some(AccessLevel::Public), &decl).to_string(),
            quote!(pub).to_string(),
        );
        assert_eq!(resolve(Some(AccessLevel::Private), &decl).to_string(), "");
        assert_eq!(resolve(None, &decl).to_string(), quote!(pub(crate)).to_string());
    }

    #[test]
    fn declared_visibility() {
        let cases: Vec<(Item, TokenStream)> = vec![
            (parse_quote!(crate struct Cat;), quote!(pub(crate))),
            (parse_quote!(pub(super) struct Cat;), quote!(pub(super))),
            (parse_quote!(struct Cat;), quote!()),
            (parse_quote!(fn cat() {}), quote!()),
        ];
        for (item, expected) in cases.iter() {
            assert_eq!(resolve(None, &Declaration::new(item)).to_string(), expected.to_string());
        }
    }
}
