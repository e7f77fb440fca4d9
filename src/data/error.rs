use thiserror::Error;

/// A timeseries table could not be assembled from its parts.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("{names} column names given for {columns} data columns")]
    ColumnCountMismatch { names: usize, columns: usize },

    #[error("column '{column}' has {actual} values but the time index has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("snapshot '{0}' appears more than once in the time index")]
    DuplicateSnapshot(String),
}

/// A requested timeseries does not exist on the network.
#[derive(Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error("network has no timeseries collection '{collection}'")]
    MissingCollection { collection: String },

    #[error("collection '{collection}' has no timeseries attribute '{attribute}'")]
    MissingAttribute {
        collection: String,
        attribute: String,
    },
}

/// Failure while building a wide table from a selection.
#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error(transparent)]
    Lookup(#[from] NetworkError),

    #[error("{collection}.{attribute}: expected {expected} columns, found {actual}")]
    ShapeMismatch {
        collection: String,
        attribute: String,
        expected: usize,
        actual: usize,
    },

    #[error("selection is empty, nothing to extract")]
    EmptySelection,
}
