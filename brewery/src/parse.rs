/// A type that can be built from a raw transfer type, usually one decoded straight off the
/// wire.
///
/// `#[auto_parse(from = Raw)]` implements this for a struct. Fields of such a struct that
/// are marked `#[auto_parseable]` are converted through their own implementation, which
/// extends to `Option`, `Vec` and `Box` of parseable types:
///
/// ```rust
/// use brewery::{auto_parse, AutoParseable};
///
/// pub struct AddressDto {
///     pub street: String,
/// }
///
/// pub struct UserDto {
///     pub name: String,
///     pub addresses: Vec<AddressDto>,
/// }
///
/// #[auto_parse(from = AddressDto)]
/// pub struct Address {
///     pub street: String,
/// }
///
/// #[auto_parse(from = UserDto)]
/// pub struct User {
///     pub name: String,
///     #[auto_parseable]
///     pub addresses: Vec<Address>,
/// }
///
/// let user = User::parse(UserDto {
///     name: "Ana".to_string(),
///     addresses: vec![AddressDto { street: "Elm".to_string() }],
/// });
/// assert_eq!(user.addresses[0].street, "Elm");
/// ```
pub trait AutoParseable: Sized {
    /// The type this one is parsed from.
    type Raw;

    /// Converts a raw value.
    fn parse(raw: Self::Raw) -> Self;
}

impl<T: AutoParseable> AutoParseable for Option<T> {
    type Raw = Option<T::Raw>;

    #[inline]
    fn parse(raw: Self::Raw) -> Self {
        raw.map(T::parse)
    }
}

impl<T: AutoParseable> AutoParseable for Vec<T> {
    type Raw = Vec<T::Raw>;

    #[inline]
    fn parse(raw: Self::Raw) -> Self {
        raw.into_iter().map(T::parse).collect()
    }
}

impl<T: AutoParseable> AutoParseable for Box<T> {
    type Raw = Box<T::Raw>;

    #[inline]
    fn parse(raw: Self::Raw) -> Self {
        Box::new(T::parse(*raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Celsius(i32);

    impl AutoParseable for Celsius {
        type Raw = i32;

        fn parse(raw: i32) -> Self {
            Celsius(raw)
        }
    }

    #[test]
    fn containers_parse_elementwise() {
        assert_eq!(Option::<Celsius>::parse(Some(3)), Some(Celsius(3)));
        assert_eq!(Option::<Celsius>::parse(None), None);
        assert_eq!(Vec::<Celsius>::parse(vec![1, 2]), vec![Celsius(1), Celsius(2)]);
        assert_eq!(Box::<Celsius>::parse(Box::new(7)), Box::new(Celsius(7)));
    }

    #[test]
    fn nested_containers() {
        let parsed = Vec::<Option<Celsius>>::parse(vec![Some(1), None]);
        assert_eq!(parsed, vec![Some(Celsius(1)), None]);
    }
}
