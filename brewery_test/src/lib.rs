//! End-to-end checks that the code generated by `brewery` compiles and behaves.

pub mod builder;
pub mod enum_properties;
pub mod init;
pub mod parse;
pub mod stub;
pub mod type_erase;
