use crate::diagnostic::{Diagnostic, DiagnosticMessage, Expansion, Severity};
use proc_macro2::{Delimiter, Span, TokenStream, TokenTree};
use quote::quote;
use syn::{parse::Parser, punctuated::Punctuated, spanned::Spanned, Expr, Ident, LitStr, Token};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestEachDiagnostic {
    NoValues,
    NoClosure,
    ClosureArity,
}

impl DiagnosticMessage for TestEachDiagnostic {
    fn message(&self) -> String {
        match self {
            Self::NoValues => "No values passed to `test_each!`.",
            Self::NoClosure => "`test_each!` requires the second argument be a closure.",
            Self::ClosureArity => "`test_each!` requires the provided closure to have a single parameter.",
        }
        .to_string()
    }

    fn severity(&self) -> Severity {
        match self {
            Self::NoValues => Severity::Warning,
            Self::NoClosure | Self::ClosureArity => Severity::Error,
        }
    }

    fn id(&self) -> &'static str {
        match self {
            Self::NoValues => "noValues",
            Self::NoClosure => "noClosure",
            Self::ClosureArity => "closureArity",
        }
    }
}

/// Writes tokens the way they are usually typed: words are separated by a
/// space and commas are followed by one, everything else is packed.
fn write_compact(tokens: TokenStream, out: &mut String) {
    let mut after_word = false;
    for token in tokens {
        match token {
            TokenTree::Ident(ident) => {
                if after_word {
                    out.push(' ');
                }
                out.push_str(&ident.to_string());
                after_word = true;
            }
            TokenTree::Literal(literal) => {
                if after_word {
                    out.push(' ');
                }
                out.push_str(&literal.to_string());
                after_word = true;
            }
            TokenTree::Punct(punct) => {
                out.push(punct.as_char());
                if matches!(punct.as_char(), ',' | ';') {
                    out.push(' ');
                }
                after_word = false;
            }
            TokenTree::Group(group) => {
                let (open, close) = match group.delimiter() {
                    Delimiter::Parenthesis => ("(", ")"),
                    Delimiter::Brace => ("{", "}"),
                    Delimiter::Bracket => ("[", "]"),
                    Delimiter::None => ("", ""),
                };
                out.push_str(open);
                write_compact(group.stream(), out);
                out.push_str(close);
                after_word = false;
            }
        }
    }
}

/// The name a case is reported under.
///
/// The value's source text is used when the compiler can give all of it;
/// otherwise the tokens are printed compactly.
fn label(value: &Expr) -> String {
    let tokens = quote!(#value);
    let printed = tokens.to_string();
    let source = value.span().source_text().filter(|text| {
        syn::parse_str::<Expr>(text).map_or(false, |parsed| quote!(#parsed).to_string() == printed)
    });
    match source {
        Some(text) => text,
        None => {
            let mut text = String::new();
            write_compact(tokens, &mut text);
            text
        }
    }
}

/// Expands `test_each!([values..], |value| body)` into one reported call per
/// value, in the order given.
pub fn expand(input: TokenStream) -> Expansion {
    let mut expansion = Expansion::new();
    let args = match Punctuated::<Expr, Token![,]>::parse_terminated.parse2(input) {
        Ok(args) => args,
        Err(e) => {
            expansion.diagnose(e);
            return expansion;
        }
    };
    let mut args = args.into_iter();

    let values = match args.next() {
        Some(Expr::Array(array)) if !array.elems.is_empty() => array.elems,
        other => {
            let span = other.as_ref().map_or_else(Span::call_site, Spanned::span);
            expansion.diagnose(Diagnostic::at(span, TestEachDiagnostic::NoValues));
            return expansion;
        }
    };

    let closure = match args.next() {
        Some(Expr::Closure(closure)) => closure,
        other => {
            let span = other.as_ref().map_or_else(Span::call_site, Spanned::span);
            expansion.diagnose(Diagnostic::at(span, TestEachDiagnostic::NoClosure));
            return expansion;
        }
    };
    if closure.inputs.len() != 1 {
        expansion.diagnose(Diagnostic::spanned(&closure.inputs, TestEachDiagnostic::ClosureArity));
        return expansion;
    }

    let perform_test = Ident::new("perform_test", Span::mixed_site());
    let cases = values.iter().map(|value| {
        let label = LitStr::new(&label(value), value.span());
        quote! {
            ::brewery::activity::run_activity(#label, || #perform_test(#value));
        }
    });

    expansion.push(quote! {
        {
            #[allow(unused_mut)]
            let mut #perform_test = #closure;
            #(#cases)*
        }
    });

    expansion
}

/// Renders an expansion in expression position.
///
/// Diagnostics go first so the block still evaluates to `()` when nothing was
/// generated.
pub fn to_expression(expansion: &Expansion) -> TokenStream {
    let diagnostics = &expansion.diagnostics;
    let items = &expansion.items;
    quote! {
        {
            #(#diagnostics)*
            #(#items)*
        }
    }
}
