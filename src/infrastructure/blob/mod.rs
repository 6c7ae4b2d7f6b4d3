//! Blob store implementations

mod in_memory;
mod local;

pub use in_memory::InMemoryBlobStore;
pub use local::LocalBlobStore;

use std::path::{Component, Path};

use crate::domain::DomainError;

/// Rejects namespace paths that could escape their bucket
fn ensure_relative(path: &str) -> Result<(), DomainError> {
    let escapes = Path::new(path)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

    if path.is_empty() || escapes {
        return Err(DomainError::invalid_input(format!(
            "Invalid blob path '{}'",
            path
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_relative() {
        assert!(ensure_relative("p1/m1").is_ok());
        assert!(ensure_relative("").is_err());
        assert!(ensure_relative("../m1").is_err());
        assert!(ensure_relative("p1/../../m1").is_err());
        assert!(ensure_relative("/etc").is_err());
    }
}
