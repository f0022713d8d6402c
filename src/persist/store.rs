//! Storage backends for the two persistence scopes.
//!
//! - `SessionStore`: opaque snapshot bytes for the current game, scoped to
//!   one session (survives a reload, not a new session).
//! - `CounterStore`: the cumulative move total shared by every session.

use derive_more::Display;

/// Why a store could not be read or written.
#[derive(Debug, Display)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[display("Storage I/O error: {}", _0)]
    Io(std::io::Error),

    /// The store is turned off or otherwise unreachable.
    #[display("Storage unavailable: {}", _0)]
    Unavailable(String),

    /// Stored data could not be parsed.
    #[display("Stored data malformed: {}", _0)]
    Format(String),
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err)
    }
}

/// Session-scoped snapshot storage.
pub trait SessionStore {
    /// Replace the stored snapshot.
    fn save(&mut self, bytes: &[u8]) -> Result<(), StorageError>;

    /// Read the stored snapshot, `None` if there is none.
    fn load(&self) -> Result<Option<Vec<u8>>, StorageError>;

    /// Remove the stored snapshot. Clearing an empty store succeeds.
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// Cross-session cumulative move counter.
///
/// Updates are best-effort last-writer-wins: `increment` is a plain read
/// followed by a write, so two holders that read the same value both write
/// the same successor and one increment is lost.
pub trait CounterStore {
    /// Current total. A missing counter reads as 0.
    fn read(&self) -> Result<u64, StorageError>;

    /// Overwrite the total.
    fn write(&mut self, value: u64) -> Result<(), StorageError>;

    /// Read, add one, write back. Returns the written value.
    fn increment(&mut self) -> Result<u64, StorageError> {
        let next = self.read()?.saturating_add(1);
        self.write(next)?;
        Ok(next)
    }

    /// Latest value written by some other holder since the last call,
    /// if any.
    fn take_external_change(&mut self) -> Option<u64>;
}

/// Store that refuses every operation, for hosts without storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn save(&mut self, _bytes: &[u8]) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("session storage disabled".into()))
    }

    fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        Err(StorageError::Unavailable("session storage disabled".into()))
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("session storage disabled".into()))
    }
}

impl CounterStore for UnavailableStore {
    fn read(&self) -> Result<u64, StorageError> {
        Err(StorageError::Unavailable("counter storage disabled".into()))
    }

    fn write(&mut self, _value: u64) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("counter storage disabled".into()))
    }

    fn take_external_change(&mut self) -> Option<u64> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Plain(u64);

    impl CounterStore for Plain {
        fn read(&self) -> Result<u64, StorageError> {
            Ok(self.0)
        }

        fn write(&mut self, value: u64) -> Result<(), StorageError> {
            self.0 = value;
            Ok(())
        }

        fn take_external_change(&mut self) -> Option<u64> {
            None
        }
    }

    #[test]
    fn test_provided_increment() {
        let mut counter = Plain(41);
        assert_eq!(counter.increment().unwrap(), 42);
        assert_eq!(counter.read().unwrap(), 42);
    }

    #[test]
    fn test_increment_saturates() {
        let mut counter = Plain(u64::MAX);
        assert_eq!(counter.increment().unwrap(), u64::MAX);
    }

    #[test]
    fn test_unavailable_store() {
        let mut store = UnavailableStore;
        assert!(SessionStore::save(&mut store, b"x").is_err());
        assert!(SessionStore::load(&store).is_err());
        assert!(CounterStore::increment(&mut store).is_err());
        assert_eq!(store.take_external_change(), None);
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error;

        let err = StorageError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("disk"));
        assert!(StorageError::Format("bad".into()).source().is_none());
    }
}
