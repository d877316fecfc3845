use thiserror::Error;

/// Top-level error type for the Skelis skeletonization kernel.
#[derive(Debug, Error)]
pub enum SkelisError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Thinning(#[from] ThinningError),
}

/// Errors related to grid construction.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("buffer holds {actual} elements, grid {width}x{height}x{depth} needs {expected}")]
    SizeMismatch {
        width: usize,
        height: usize,
        depth: usize,
        expected: usize,
        actual: usize,
    },

    #[error("grid dimensions {width}x{height}x{depth} overflow the addressable range")]
    DimensionOverflow {
        width: usize,
        height: usize,
        depth: usize,
    },
}

/// Errors related to the grid-to-world transform.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("grid-to-world transform is not invertible")]
    NotInvertible,
}

/// Errors related to the thinning process.
#[derive(Debug, Error)]
pub enum ThinningError {
    #[error("thinning did not converge within {budget} iterations")]
    IterationBudgetExhausted { budget: u32 },
}

/// Convenience type alias for results using [`SkelisError`].
pub type Result<T> = std::result::Result<T, SkelisError>;
