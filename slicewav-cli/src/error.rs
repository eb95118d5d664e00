// slicewav-cli/src/error.rs
//
// The CLI reuses the core error type and only adds context on top of it.

use slicewav_core::{CoreError, CoreResult};

use std::fmt;

/// Result type for CLI operations.
pub type CliResult<T> = CoreResult<T>;

/// Prefixes an error with what the CLI was doing when it happened.
pub trait CliErrorContext<T> {
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::OperationFailed(format!("{}: {}", f(), core_error))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_context_wraps_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::other("disk full"));
        let err = result
            .cli_with_context(|| "Creating output directory")
            .unwrap_err();
        assert!(matches!(
            &err,
            CoreError::OperationFailed(msg)
                if msg.starts_with("Creating output directory: ") && msg.contains("disk full")
        ));
    }

    #[test]
    fn test_ok_passes_through() {
        let result: Result<u8, io::Error> = Ok(7);
        assert_eq!(result.cli_with_context(|| "unused").unwrap(), 7);
    }
}
