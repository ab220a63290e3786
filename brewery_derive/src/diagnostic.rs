use proc_macro2::{Ident, Span, TokenStream};
use quote::{quote, quote_spanned, ToTokens};
use syn::spanned::Spanned;

/// How seriously the host compiler should treat a [`Diagnostic`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// The expansion produced no output for the offending node.
    Error,
    /// The expansion continued with degraded behavior.
    Warning,
}

/// A fixed, human-readable message that a transformer can report.
///
/// Every transformer defines its own closed set of these as an enum.
pub trait DiagnosticMessage {
    /// The message shown to the user.
    fn message(&self) -> String;

    /// Whether this message is an error or a warning.
    fn severity(&self) -> Severity;

    /// A stable identifier for the message. Warnings are raised under this name.
    fn id(&self) -> &'static str;
}

/// A message anchored to a location in the macro input.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub span: Span,
    pub id: &'static str,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn at<M: DiagnosticMessage>(span: Span, message: M) -> Self {
        Self {
            span,
            id: message.id(),
            message: message.message(),
            severity: message.severity(),
        }
    }

    pub fn spanned<T: Spanned, M: DiagnosticMessage>(node: &T, message: M) -> Self {
        Self::at(node.span(), message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<syn::Error> for Diagnostic {
    fn from(error: syn::Error) -> Self {
        Self {
            span: error.span(),
            id: "malformedAttribute",
            message: error.to_string(),
            severity: Severity::Error,
        }
    }
}

impl ToTokens for Diagnostic {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        match self.severity {
            Severity::Error => {
                tokens.extend(syn::Error::new(self.span, &self.message).to_compile_error());
            }
            Severity::Warning => {
                // Stable proc macros cannot emit warnings directly, so the
                // message rides on a deprecated item that is used right away.
                let message = &self.message;
                let name = Ident::new(self.id, self.span);
                tokens.extend(quote_spanned! { self.span=>
                    const _: () = {
                        #[deprecated(note = #message)]
                        #[allow(non_upper_case_globals)]
                        const #name: () = ();
                        let _ = #name;
                    };
                });
            }
        }
    }
}

/// The result of running one transformer: generated items plus diagnostics.
#[derive(Default)]
pub struct Expansion {
    pub items: Vec<TokenStream>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Expansion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: TokenStream) {
        self.items.push(item);
    }

    pub fn diagnose(&mut self, diagnostic: impl Into<Diagnostic>) {
        self.diagnostics.push(diagnostic.into());
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    #[cfg(test)]
    pub fn ids(&self) -> Vec<&'static str> {
        self.diagnostics.iter().map(|d| d.id).collect()
    }

    #[cfg(test)]
    pub fn tokens(&self) -> String {
        let items = &self.items;
        quote!(#(#items)*).to_string()
    }
}

impl ToTokens for Expansion {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let items = &self.items;
        let diagnostics = &self.diagnostics;
        tokens.extend(quote! {
            #(#items)*
            #(#diagnostics)*
        });
    }
}
