use crate::{
    access,
    attachment::Attachment,
    diagnostic::{Diagnostic, DiagnosticMessage, Expansion, Severity},
    syntax::{is_property_requirement, receiver, Declaration, Property},
    util::erased_name,
};
use proc_macro2::{Span, TokenStream, TokenTree};
use quote::{format_ident, quote, ToTokens};
use syn::{FnArg, Ident, Item, Pat, PatIdent, ReturnType, Signature, TraitItem, TraitItemMethod, Type};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unforwardable {
    Generic,
    Receiver,
    Unsafe,
    BorrowedReturn,
    BorrowedAsyncInput,
    SelfType,
    Static,
    Initializer,
    Constant,
    AssociatedType,
    Macro,
}

impl Unforwardable {
    fn describe(&self) -> &'static str {
        match self {
            Self::Generic => "generic methods",
            Self::Receiver => "methods whose receiver is not `&self`",
            Self::Unsafe => "`unsafe` methods",
            Self::BorrowedReturn => "methods returning references",
            Self::BorrowedAsyncInput => "`async` methods taking references",
            Self::SelfType => "signatures that mention `Self`",
            Self::Static => "required functions without a receiver",
            Self::Initializer => "required functions returning `Self` without a receiver",
            Self::Constant => "associated consts without a default",
            Self::AssociatedType => "associated types",
            Self::Macro => "macro invocations",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoTypeEraseDiagnostic {
    SupportedTypes,
    PropertyTypeRequired,
    PropertyShape,
    GenericTrait,
    Unforwardable(Unforwardable),
}

impl DiagnosticMessage for AutoTypeEraseDiagnostic {
    fn message(&self) -> String {
        match self {
            Self::SupportedTypes => "`#[auto_type_erase]` can only be applied to traits.".to_string(),
            Self::PropertyTypeRequired => {
                "`#[auto_type_erase]` requires that properties provide explicit type information.".to_string()
            }
            Self::PropertyShape => "`#[property]` requirements must have the form `fn name(&self) -> Type`.".to_string(),
            Self::GenericTrait => {
                "`#[auto_type_erase]` cannot erase generic traits or traits with supertraits.".to_string()
            }
            Self::Unforwardable(reason) => format!("`#[auto_type_erase]` cannot forward {}.", reason.describe()),
        }
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn id(&self) -> &'static str {
        match self {
            Self::SupportedTypes => "supportedTypes",
            Self::PropertyTypeRequired => "propertyTypeRequired",
            Self::PropertyShape => "propertyShape",
            Self::GenericTrait => "genericTrait",
            Self::Unforwardable(_) => "unforwardable",
        }
    }
}

/// A `#[property]` getter, copied out of the wrapped value once.
struct Getter<'a> {
    method: &'a TraitItemMethod,
    ty: &'a Type,
}

/// A method called through a stored closure.
struct Forwarded<'a> {
    method: &'a TraitItemMethod,
    args: Vec<(Ident, &'a Type)>,
}

enum Member<'a> {
    Property(Getter<'a>),
    Method(Forwarded<'a>),
}

impl<'a> Member<'a> {
    fn ident(&self) -> &'a Ident {
        match self {
            Self::Property(getter) => &getter.method.sig.ident,
            Self::Method(forwarded) => &forwarded.method.sig.ident,
        }
    }
}

fn mentions_self(tokens: TokenStream) -> bool {
    tokens.into_iter().any(|tree| match tree {
        TokenTree::Ident(ident) => ident == "Self",
        TokenTree::Group(group) => mentions_self(group.stream()),
        _ => false,
    })
}

fn is_reference(ty: &Type) -> bool {
    matches!(ty, Type::Reference(_))
}

fn is_impl_trait(ty: &Type) -> bool {
    matches!(ty, Type::ImplTrait(_))
}

fn is_self_pattern(arg: &FnArg) -> bool {
    match arg {
        FnArg::Typed(typed) => matches!(&*typed.pat, Pat::Ident(pat) if pat.ident == "self"),
        FnArg::Receiver(_) => true,
    }
}

fn borrows_self(method: &TraitItemMethod) -> bool {
    receiver(method).map_or(false, |r| r.reference.is_some() && r.mutability.is_none())
}

fn classify_property<'a>(method: &'a TraitItemMethod, expansion: &mut Expansion) -> Option<Member<'a>> {
    let sig = &method.sig;
    if receiver(method).is_none() && method.default.is_some() {
        return None;
    }
    let getter_shaped = borrows_self(method)
        && sig.inputs.len() == 1
        && sig.asyncness.is_none()
        && sig.unsafety.is_none()
        && sig.generics.params.is_empty()
        && sig.generics.where_clause.is_none();
    if !getter_shaped {
        expansion.diagnose(Diagnostic::spanned(sig, AutoTypeEraseDiagnostic::PropertyShape));
        return None;
    }
    match Property::from_requirement(method).ty {
        Some(ty) if mentions_self(ty.to_token_stream()) => {
            expansion.diagnose(Diagnostic::spanned(
                ty,
                AutoTypeEraseDiagnostic::Unforwardable(Unforwardable::SelfType),
            ));
            None
        }
        Some(ty) if is_reference(ty) || is_impl_trait(ty) => {
            expansion.diagnose(Diagnostic::spanned(ty, AutoTypeEraseDiagnostic::PropertyShape));
            None
        }
        Some(ty) => Some(Member::Property(Getter { method, ty })),
        None => {
            expansion.diagnose(Diagnostic::spanned(sig, AutoTypeEraseDiagnostic::PropertyTypeRequired));
            None
        }
    }
}

fn unforwardable_method(method: &TraitItemMethod) -> Option<Unforwardable> {
    let sig = &method.sig;
    let typed = sig.inputs.iter().filter_map(|arg| match arg {
        FnArg::Typed(typed) => Some(&*typed.ty),
        FnArg::Receiver(_) => None,
    });
    let output = match &sig.output {
        ReturnType::Type(_, ty) => Some(&**ty),
        ReturnType::Default => None,
    };

    if sig.unsafety.is_some() {
        Some(Unforwardable::Unsafe)
    } else if !borrows_self(method) {
        Some(Unforwardable::Receiver)
    } else if !sig.generics.params.is_empty()
        || sig.generics.where_clause.is_some()
        || sig.variadic.is_some()
        || typed.clone().chain(output).any(is_impl_trait)
    {
        Some(Unforwardable::Generic)
    } else if typed.clone().chain(output).any(|ty| mentions_self(ty.to_token_stream())) {
        Some(Unforwardable::SelfType)
    } else if output.map_or(false, is_reference) {
        Some(Unforwardable::BorrowedReturn)
    } else if sig.asyncness.is_some() && typed.clone().any(is_reference) {
        Some(Unforwardable::BorrowedAsyncInput)
    } else {
        None
    }
}

fn classify_method<'a>(
    method: &'a TraitItemMethod,
    initializers: &[&TraitItemMethod],
    expansion: &mut Expansion,
) -> Option<Member<'a>> {
    let has_receiver = method.sig.inputs.first().map_or(false, is_self_pattern);
    if !has_receiver {
        if method.default.is_none() {
            let reason = if initializers.iter().any(|init| std::ptr::eq(*init, method)) {
                Unforwardable::Initializer
            } else {
                Unforwardable::Static
            };
            expansion.diagnose(Diagnostic::spanned(&method.sig, AutoTypeEraseDiagnostic::Unforwardable(reason)));
        }
        return None;
    }
    if let Some(reason) = unforwardable_method(method) {
        expansion.diagnose(Diagnostic::spanned(&method.sig, AutoTypeEraseDiagnostic::Unforwardable(reason)));
        return None;
    }

    let args = method
        .sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(typed) => Some(typed),
            FnArg::Receiver(_) => None,
        })
        .enumerate()
        .map(|(i, typed)| {
            let ident = match &*typed.pat {
                Pat::Ident(pat) if pat.by_ref.is_none() && pat.subpat.is_none() => pat.ident.clone(),
                _ => format_ident!("__arg{}", i),
            };
            (ident, &*typed.ty)
        })
        .collect();
    Some(Member::Method(Forwarded { method, args }))
}

/// Sorts a trait item into a member of the wrapper, reporting items that
/// cannot be forwarded. Associated types are reported by the caller.
fn classify<'a>(
    item: &'a TraitItem,
    initializers: &[&TraitItemMethod],
    expansion: &mut Expansion,
) -> Option<Member<'a>> {
    let unforwardable = |reason| AutoTypeEraseDiagnostic::Unforwardable(reason);
    match item {
        TraitItem::Method(method) if is_property_requirement(method) => classify_property(method, expansion),
        TraitItem::Method(method) => classify_method(method, initializers, expansion),
        TraitItem::Const(constant) => {
            if constant.default.is_none() {
                expansion.diagnose(Diagnostic::spanned(constant, unforwardable(Unforwardable::Constant)));
            }
            None
        }
        TraitItem::Type(_) => None,
        item => {
            expansion.diagnose(Diagnostic::spanned(item, unforwardable(Unforwardable::Macro)));
            None
        }
    }
}

impl<'a> Forwarded<'a> {
    fn is_async(&self) -> bool {
        self.method.sig.asyncness.is_some()
    }

    fn output(&self) -> TokenStream {
        match &self.method.sig.output {
            ReturnType::Type(_, ty) => ty.to_token_stream(),
            ReturnType::Default => quote!(()),
        }
    }

    /// The return type of the stored closure.
    fn closure_output(&self) -> TokenStream {
        let output = self.output();
        if self.is_async() {
            quote! {
                ::core::pin::Pin<::std::boxed::Box<dyn ::core::future::Future<Output = #output>>>
            }
        } else {
            output
        }
    }

    fn field_type(&self) -> TokenStream {
        let inputs = self.args.iter().map(|(_, ty)| ty);
        let output = self.closure_output();
        quote! { ::std::sync::Arc<dyn Fn(#(#inputs),*) -> #output> }
    }

    fn capture(&self, trait_name: &Ident, base: &Ident) -> TokenStream {
        let ident = &self.method.sig.ident;
        let field_type = self.field_type();
        let output = self.closure_output();
        let params = self.args.iter().map(|(arg, ty)| quote!(#arg: #ty));
        let args = self.args.iter().map(|(arg, _)| arg);
        let call = quote! { <T as #trait_name>::#ident(&*#base #(, #args)*) };
        let body = if self.is_async() {
            quote! {
                let #base = ::std::sync::Arc::clone(&#base);
                ::std::boxed::Box::pin(async move { #call.await })
            }
        } else {
            call
        };
        quote! {
            let #ident: #field_type = {
                let #base = ::std::sync::Arc::clone(&#base);
                ::std::sync::Arc::new(move |#(#params),*| -> #output { #body })
            };
        }
    }

    /// The original signature with every argument bound to a plain name.
    fn signature(&self) -> Signature {
        let mut sig = self.method.sig.clone();
        let mut names = self.args.iter().map(|(arg, _)| arg.clone());
        for arg in sig.inputs.iter_mut() {
            let typed = match arg {
                FnArg::Typed(typed) => typed,
                FnArg::Receiver(_) => continue,
            };
            if let Some(ident) = names.next() {
                typed.attrs.clear();
                *typed.pat = Pat::Ident(PatIdent {
                    attrs: Vec::new(),
                    by_ref: None,
                    mutability: None,
                    ident,
                    subpat: None,
                });
            }
        }
        sig
    }

    fn forward(&self) -> TokenStream {
        let ident = &self.method.sig.ident;
        let sig = self.signature();
        let args = self.args.iter().map(|(arg, _)| arg);
        let awaited = if self.is_async() { quote!(.await) } else { quote!() };
        quote! {
            #sig {
                (self.#ident)(#(#args),*) #awaited
            }
        }
    }
}

/// Generates an `AnyTrait` wrapper that erases the concrete implementor.
pub fn expand(attachment: &Attachment, item: &Item) -> Expansion {
    let mut expansion = Expansion::new();
    let decl = Declaration::new(item);
    let input = match decl {
        Declaration::Trait(input) => input,
        _ => {
            expansion.diagnose(Diagnostic::at(attachment.span, AutoTypeEraseDiagnostic::SupportedTypes));
            return expansion;
        }
    };

    if !input.generics.params.is_empty() || input.generics.where_clause.is_some() || !input.supertraits.is_empty() {
        expansion.diagnose(Diagnostic::spanned(&input.ident, AutoTypeEraseDiagnostic::GenericTrait));
        return expansion;
    }

    match decl.properties() {
        Ok(properties) if properties.is_empty() => return expansion,
        Ok(_) => {}
        Err(e) => {
            expansion.diagnose(e);
            return expansion;
        }
    }

    for ty in decl.associated_types() {
        expansion.diagnose(Diagnostic::spanned(
            ty,
            AutoTypeEraseDiagnostic::Unforwardable(Unforwardable::AssociatedType),
        ));
    }
    let initializers = decl.initializers();
    let members = input
        .items
        .iter()
        .filter_map(|item| classify(item, &initializers, &mut expansion))
        .collect::<Vec<_>>();
    if expansion.has_errors() {
        return expansion;
    }
    // Static properties with a default body leave nothing to copy.
    if !members.iter().any(|member| matches!(member, Member::Property(_))) {
        return expansion;
    }

    let name = &input.ident;
    let erased = erased_name(name);
    let vis = access::resolve(attachment.access, &decl);
    let unsafety = &input.unsafety;
    let base = Ident::new("base", Span::mixed_site());

    let mut fields = Vec::new();
    let mut copies = Vec::new();
    let mut captures = Vec::new();
    let mut forwards = Vec::new();
    for member in members.iter() {
        let ident = member.ident();
        match member {
            Member::Property(getter) => {
                let ty = getter.ty;
                let sig = &getter.method.sig;
                fields.push(quote! { #vis #ident: #ty });
                copies.push(quote! { let #ident = <T as #name>::#ident(&#base); });
                forwards.push(quote! {
                    #sig {
                        ::core::clone::Clone::clone(&self.#ident)
                    }
                });
            }
            Member::Method(forwarded) => {
                let field_type = forwarded.field_type();
                fields.push(quote! { #ident: #field_type });
                captures.push(forwarded.capture(name, &base));
                forwards.push(forwarded.forward());
            }
        }
    }
    let share = if captures.is_empty() {
        quote!()
    } else {
        quote! { let #base = ::std::sync::Arc::new(#base); }
    };
    let idents = members.iter().map(Member::ident);

    expansion.push(quote! {
        #[derive(Clone)]
        #vis struct #erased {
            #(#fields,)*
        }

        impl #erased {
            #vis fn new<T: #name + 'static>(#base: T) -> Self {
                #(#copies)*
                #share
                #(#captures)*
                Self {
                    #(#idents,)*
                }
            }
        }

        #unsafety impl #name for #erased {
            #(#forwards)*
        }
    });

    expansion
}
