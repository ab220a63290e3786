use crate::access::AccessLevel;
use proc_macro2::{Span, TokenStream};
use syn::{
    parse::{ParseStream, Parser},
    Error, Expr, ExprLit, ExprPath, Ident, Lit, Token, Type,
};

/// The arguments written at a macro's attachment site.
#[derive(Clone, Debug)]
pub struct Attachment {
    /// Where diagnostics about the attachment itself are reported.
    pub span: Span,
    pub access: Option<AccessLevel>,
    /// The raw type named by `from = Type`.
    pub from: Option<Type>,
}

impl Attachment {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            access: None,
            from: None,
        }
    }

    /// Parses `key = value` pairs. `from` is only accepted when `accepts_from`.
    pub fn parse(tokens: TokenStream, accepts_from: bool) -> Result<Self, Error> {
        let parser = |input: ParseStream| -> Result<Attachment, Error> {
            let mut attachment = Attachment::new(Span::call_site());
            while !input.is_empty() {
                let (key, value) = parse_arg(input, accepts_from)?;
                match value {
                    ArgValue::Access(access) => attachment.access = access,
                    ArgValue::From(ty) => {
                        if attachment.from.is_some() {
                            return Err(Error::new_spanned(key, "duplicate `from` argument"));
                        }
                        attachment.from = Some(ty);
                    }
                }
                if !input.is_empty() {
                    input.parse::<Token![,]>()?;
                }
            }
            Ok(attachment)
        };
        parser.parse2(tokens)
    }
}

enum ArgValue {
    Access(Option<AccessLevel>),
    From(Type),
}

fn parse_arg(input: ParseStream, accepts_from: bool) -> Result<(Ident, ArgValue), Error> {
    let key: Ident = input.parse()?;
    input.parse::<Token![=]>()?;
    if key == "access" {
        let value: Expr = input.parse()?;
        let access = match &value {
            Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => AccessLevel::from_keyword(&s.value()),
            Expr::Path(ExprPath { path, qself: None, .. }) => path
                .get_ident()
                .and_then(|ident| AccessLevel::from_keyword(&ident.to_string())),
            _ => return Err(Error::new_spanned(value, "expected an access level such as \"public\"")),
        };
        Ok((key, ArgValue::Access(access)))
    } else if key == "from" && accepts_from {
        Ok((key, ArgValue::From(input.parse()?)))
    } else {
        let expected = if accepts_from { "`access` or `from`" } else { "`access`" };
        Err(Error::new_spanned(&key, format!("unknown argument `{}`, expected {}", key, expected)))
    }
}
