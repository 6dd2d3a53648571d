use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Dom(#[from] DomException),
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum DomException {
    #[error("node cannot be inserted at this position")]
    HierarchyRequestErr,
    #[error("reference node is not a child of the parent")]
    NotFoundErr,
    #[error("attribute is already attached to an element")]
    InuseAttributeErr,
}

pub type Result<T> = std::result::Result<T, Error>;
