use brewery::enum_properties;

#[enum_properties]
#[derive(Debug, PartialEq)]
pub enum Response {
    Success(String),
    Failure { code: u16, reason: String },
    NotModified,
}

#[enum_properties(access = "internal")]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}
