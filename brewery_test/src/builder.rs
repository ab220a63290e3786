use brewery::{auto_builder, auto_init};

#[auto_init]
#[auto_builder]
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub url: String,
    pub body: Option<Vec<u8>>,
    #[default(30)]
    pub timeout: u32,
}
