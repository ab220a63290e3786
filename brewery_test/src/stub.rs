use brewery::{auto_init, auto_stub};

#[auto_stub]
#[derive(Debug, PartialEq)]
pub struct Owner {
    #[stub("Ana".to_string())]
    pub name: String,
    #[default(1)]
    pub pets: u32,
}

#[auto_stub]
#[derive(Debug, PartialEq)]
pub struct Cat {
    pub age: u32,
    #[stub("Tom".to_string())]
    pub name: String,
    pub nickname: Option<String>,
    #[stub]
    pub owner: Owner,
    #[stub]
    pub vet: Option<Owner>,
    #[default(true)]
    #[stub(false)]
    pub fuzzy: bool,
}

#[auto_init]
#[auto_stub]
#[derive(Debug, PartialEq)]
pub struct Dog {
    pub age: u32,
    #[default(true)]
    pub good: bool,
    #[stub("Rex".to_string())]
    pub name: String,
}
