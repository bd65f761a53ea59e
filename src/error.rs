use std::fmt;

/// The storage operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    Read,
    Write,
    Delete,
    List,
}

impl fmt::Display for StorageOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageOp::Read => "read",
            StorageOp::Write => "write",
            StorageOp::Delete => "delete",
            StorageOp::List => "list",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Encoding or decoding a model failed.
    Serialization(String),
    /// The backend could not complete an I/O operation.
    Storage { op: StorageOp, message: String },
    /// No storage unit exists for the requested record.
    NotFound { type_name: String, id: String },
    /// The id cannot be mapped to a storage unit.
    InvalidId(String),
}

impl StoreError {
    pub(crate) fn storage(op: StorageOp, err: impl fmt::Display) -> Self {
        StoreError::Storage {
            op,
            message: err.to_string(),
        }
    }

    pub(crate) fn not_found(type_name: &str, id: &str) -> Self {
        StoreError::NotFound {
            type_name: type_name.to_string(),
            id: id.to_string(),
        }
    }

    /// True for `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Serialization(msg) => write!(f, "serialization error: {}", msg),
            StoreError::Storage { op, message } => {
                write!(f, "storage {} failed: {}", op, message)
            }
            StoreError::NotFound { type_name, id } => {
                write!(f, "storage unit not found: {}:{}", type_name, id)
            }
            StoreError::InvalidId(id) => write!(f, "invalid record id: {:?}", id),
        }
    }
}

impl std::error::Error for StoreError {}
