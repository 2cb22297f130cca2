use galley_math::MathError;
use galley_viewtree::TreeError;
use thiserror::Error;

/// Top-level error type of the typesetting facade.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypesetError {
    #[error("math layout failed: {0}")]
    Math(#[from] MathError),
    #[error("view tree construction failed: {0}")]
    Tree(#[from] TreeError),
}
