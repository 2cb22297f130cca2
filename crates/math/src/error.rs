use galley_viewtree::TreeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// A math construct is missing a required child. Reported to the caller,
    /// who may substitute a placeholder or skip the subtree; never fatal to
    /// the enclosing document.
    #[error("{construct} is missing required child '{missing}'")]
    Structural {
        construct: &'static str,
        missing: &'static str,
    },

    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl MathError {
    pub(crate) fn structural(construct: &'static str, missing: &'static str) -> Self {
        log::warn!(
            "structural error: {} without required child '{}'",
            construct,
            missing
        );
        MathError::Structural { construct, missing }
    }
}
