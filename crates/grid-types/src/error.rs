/// Errors produced while constructing or parsing foundation types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("address is empty")]
    EmptyAddress,

    #[error("address contains whitespace: {0:?}")]
    AddressContainsWhitespace(String),
}
