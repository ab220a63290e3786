use brewery::{auto_parse, AutoParseable};

pub struct AddressDto {
    pub street: String,
    pub city: String,
}

pub struct UserDto {
    pub name: String,
    pub age: u32,
    pub home: Option<AddressDto>,
    pub previous: Vec<AddressDto>,
    pub nickname: Option<String>,
}

#[auto_parse(from = AddressDto)]
#[derive(Debug, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
}

#[auto_parse(from = UserDto)]
#[derive(Debug, PartialEq)]
pub struct User {
    pub name: String,
    pub age: u32,
    #[auto_parseable]
    pub home: Option<Address>,
    #[auto_parseable]
    pub previous: Vec<Address>,
    pub nickname: Option<String>,
}

/// Parses any list of raw values through their generated conversion.
pub fn parse_all<T: AutoParseable>(raw: Vec<T::Raw>) -> Vec<T> {
    raw.into_iter().map(T::parse).collect()
}
