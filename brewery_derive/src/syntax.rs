//! Read-only queries over declaration syntax.

use crate::{
    access::AccessLevel,
    diagnostic::{Diagnostic, DiagnosticMessage, Expansion},
    util::attr_name,
};
use proc_macro2::Span;
use syn::{
    parse::ParseStream, spanned::Spanned, Attribute, Error, Expr, Field, Fields, FnArg, GenericArgument,
    Generics, Ident, Item, ItemEnum, ItemStruct, ItemTrait, PathArguments, ReturnType, TraitItem,
    TraitItemMethod, TraitItemType, Type, TypePath, Visibility,
};

/// The kinds of declaration a macro can be attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Struct,
    Enum,
    Trait,
    Union,
    Other,
}

/// A declaration a macro was attached to.
#[derive(Clone, Copy)]
pub enum Declaration<'a> {
    Struct(&'a ItemStruct),
    Enum(&'a ItemEnum),
    Trait(&'a ItemTrait),
    Other(&'a Item),
}

impl<'a> Declaration<'a> {
    pub fn new(item: &'a Item) -> Self {
        match item {
            Item::Struct(item) => Self::Struct(item),
            Item::Enum(item) => Self::Enum(item),
            Item::Trait(item) => Self::Trait(item),
            item => Self::Other(item),
        }
    }

    pub fn kind(&self) -> DeclKind {
        match self {
            Self::Struct(_) => DeclKind::Struct,
            Self::Enum(_) => DeclKind::Enum,
            Self::Trait(_) => DeclKind::Trait,
            Self::Other(Item::Union(_)) => DeclKind::Union,
            Self::Other(_) => DeclKind::Other,
        }
    }

    pub fn name(&self) -> Option<&'a Ident> {
        match self {
            Self::Struct(item) => Some(&item.ident),
            Self::Enum(item) => Some(&item.ident),
            Self::Trait(item) => Some(&item.ident),
            Self::Other(Item::Union(item)) => Some(&item.ident),
            Self::Other(_) => None,
        }
    }

    pub fn visibility(&self) -> Option<&'a Visibility> {
        match self {
            Self::Struct(item) => Some(&item.vis),
            Self::Enum(item) => Some(&item.vis),
            Self::Trait(item) => Some(&item.vis),
            Self::Other(Item::Union(item)) => Some(&item.vis),
            Self::Other(_) => None,
        }
    }

    pub fn access_level(&self) -> Option<AccessLevel> {
        self.visibility().and_then(AccessLevel::of)
    }

    /// The name and generics of the declaration, if it is of the given kind.
    pub fn supported(&self, kind: DeclKind) -> Option<(&'a Ident, &'a Generics)> {
        if self.kind() == kind {
            Some((self.name()?, self.generics()?))
        } else {
            None
        }
    }

    pub fn generics(&self) -> Option<&'a Generics> {
        match self {
            Self::Struct(item) => Some(&item.generics),
            Self::Enum(item) => Some(&item.generics),
            Self::Trait(item) => Some(&item.generics),
            Self::Other(_) => None,
        }
    }

    /// Every property: struct fields, or `#[property]` requirements of a trait.
    pub fn properties(&self) -> Result<Vec<Property<'a>>, Error> {
        match self {
            Self::Struct(item) => fields(&item.fields).map(Property::from_field).collect(),
            Self::Trait(item) => Ok(trait_methods(item)
                .filter(|method| is_property_requirement(method))
                .map(Property::from_requirement)
                .collect()),
            Self::Enum(_) | Self::Other(_) => Ok(Vec::new()),
        }
    }

    /// Properties eligible for code generation: stored, not static, and named.
    ///
    /// Properties without an explicit type are kept so callers can report them.
    pub fn stored_properties(&self) -> Result<Vec<Property<'a>>, Error> {
        Ok(self
            .properties()?
            .into_iter()
            .filter(|p| p.is_stored() && !p.is_static() && p.ident.is_some())
            .collect())
    }

    /// Fields that carry no data and must be filled with `PhantomData`.
    pub fn computed_properties(&self) -> Result<Vec<Property<'a>>, Error> {
        Ok(self
            .properties()?
            .into_iter()
            .filter(|p| p.is_computed() && p.ident.is_some())
            .collect())
    }

    /// Trait methods that are not property requirements.
    pub fn functions(&self) -> Vec<&'a TraitItemMethod> {
        match self {
            Self::Trait(item) => trait_methods(item)
                .filter(|method| !is_property_requirement(method))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Receiver-less trait functions returning `Self`.
    pub fn initializers(&self) -> Vec<&'a TraitItemMethod> {
        self.functions()
            .into_iter()
            .filter(|method| receiver(method).is_none() && returns_self(method))
            .collect()
    }

    pub fn associated_types(&self) -> Vec<&'a TraitItemType> {
        match self {
            Self::Trait(item) => item
                .items
                .iter()
                .filter_map(|item| match item {
                    TraitItem::Type(ty) => Some(ty),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn fields(fields: &Fields) -> impl Iterator<Item = &Field> {
    let fields = match fields {
        Fields::Named(named) => Some(named.named.iter()),
        Fields::Unnamed(unnamed) => Some(unnamed.unnamed.iter()),
        Fields::Unit => None,
    };
    fields.into_iter().flatten()
}

fn trait_methods(item: &ItemTrait) -> impl Iterator<Item = &TraitItemMethod> {
    item.items.iter().filter_map(|item| match item {
        TraitItem::Method(method) => Some(method),
        _ => None,
    })
}

pub fn is_property_requirement(method: &TraitItemMethod) -> bool {
    method.attrs.iter().any(|attr| attr_name(attr).map_or(false, |name| name == "property"))
}

/// The receiver of a trait method, if it has one.
pub fn receiver(method: &TraitItemMethod) -> Option<&syn::Receiver> {
    match method.sig.inputs.first() {
        Some(FnArg::Receiver(receiver)) => Some(receiver),
        _ => None,
    }
}

fn returns_self(method: &TraitItemMethod) -> bool {
    match &method.sig.output {
        ReturnType::Type(_, ty) => matches!(&**ty, Type::Path(TypePath { qself: None, path }) if path.is_ident("Self")),
        ReturnType::Default => false,
    }
}

/// The value a stub factory uses for a property.
#[derive(Clone, Debug)]
pub enum StubMarker {
    /// `#[stub(expr)]`
    Value(Expr),
    /// `#[stub]`: call the property type's own `stub()`.
    Delegate,
}

/// A stored or computed property together with its marker metadata.
#[derive(Clone, Debug)]
pub struct Property<'a> {
    pub ident: Option<&'a Ident>,
    /// The declared type, or `None` when left to inference with `_`.
    pub ty: Option<&'a Type>,
    pub attrs: &'a [Attribute],
    pub span: Span,
    is_static: bool,
    pub default: Option<Expr>,
    pub stub: Option<StubMarker>,
}

impl<'a> Property<'a> {
    pub fn from_field(field: &'a Field) -> Result<Self, Error> {
        let mut property = Self {
            ident: field.ident.as_ref(),
            ty: explicit_type(&field.ty),
            attrs: &field.attrs,
            span: field.span(),
            is_static: false,
            default: None,
            stub: None,
        };

        for attr in field.attrs.iter() {
            let name = match attr_name(attr) {
                Some(name) => name,
                None => continue,
            };
            if name == "default" {
                property.default = Some(attr.parse_args()?);
            } else if name == "stub" {
                property.stub = Some(parse_stub(attr)?);
            } else if name == "auto_parseable" && !attr.tokens.is_empty() {
                return Err(Error::new_spanned(attr, "`#[auto_parseable]` takes no arguments"));
            }
        }

        Ok(property)
    }

    pub fn from_requirement(method: &'a TraitItemMethod) -> Self {
        let ty = match &method.sig.output {
            ReturnType::Type(_, ty) => explicit_type(ty),
            ReturnType::Default => None,
        };
        Self {
            ident: Some(&method.sig.ident),
            ty,
            attrs: &method.attrs,
            span: method.sig.span(),
            is_static: receiver(method).is_none(),
            default: None,
            stub: None,
        }
    }

    /// A property is computed when it carries no data of its own.
    pub fn is_computed(&self) -> bool {
        self.ty.map_or(false, is_phantom)
    }

    pub fn is_stored(&self) -> bool {
        !self.is_computed()
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_optional(&self) -> bool {
        self.ty.and_then(option_inner).is_some()
    }

    pub fn attribute(&self, name: &str) -> Option<&'a Attribute> {
        self.attrs
            .iter()
            .find(|attr| attr_name(attr).map_or(false, |n| n == name))
    }

    /// Whether the property converts through its own `AutoParseable` impl.
    pub fn recursive_parse(&self) -> bool {
        self.attribute("auto_parseable").is_some()
    }
}

fn parse_stub(attr: &Attribute) -> Result<StubMarker, Error> {
    if attr.tokens.is_empty() {
        return Ok(StubMarker::Delegate);
    }
    attr.parse_args_with(|input: ParseStream| -> Result<StubMarker, Error> {
        if input.is_empty() {
            Ok(StubMarker::Delegate)
        } else {
            Ok(StubMarker::Value(input.parse()?))
        }
    })
}

fn explicit_type(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Infer(_) => None,
        ty => Some(ty),
    }
}

/// Returns `T` for `Option<T>`.
pub fn option_inner(ty: &Type) -> Option<&Type> {
    let segment = match ty {
        Type::Path(TypePath { qself: None, path }) => path.segments.last()?,
        _ => return None,
    };
    if segment.ident != "Option" {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first() {
            Some(GenericArgument::Type(inner)) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}

pub fn is_phantom(ty: &Type) -> bool {
    match ty {
        Type::Path(TypePath { qself: None, path }) => path
            .segments
            .last()
            .map_or(false, |segment| segment.ident == "PhantomData"),
        _ => false,
    }
}

/// Drops properties without an explicit type, reporting each one.
pub fn require_types<'a, M>(
    properties: Vec<Property<'a>>,
    expansion: &mut Expansion,
    missing: M,
) -> Vec<Property<'a>>
where
    M: DiagnosticMessage + Copy,
{
    properties
        .into_iter()
        .filter(|property| {
            if property.ty.is_none() {
                expansion.diagnose(Diagnostic::at(property.span, missing));
                false
            } else {
                true
            }
        })
        .collect()
}
