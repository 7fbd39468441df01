//! Tests for error types including source chaining and message formatting

#[cfg(test)]
mod tests {
    use std::error::Error;
    use tilecore::GenerationError;
    use tilecore::io::error::{configuration_error, invalid_face, invalid_parameter};

    // Tests error source chaining works correctly
    // Verified by breaking source chain
    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = GenerationError::FileSystem {
            path: "/tmp/test.png".into(),
            operation: "read",
            source: io_error,
        };

        assert!(error.source().is_some());
        assert!(error.to_string().contains("/tmp/test.png"));
    }

    // Tests setup contradictions name the constraint
    // Verified by omitting the name from the message
    #[test]
    fn test_setup_contradiction_message() {
        let error = GenerationError::ContradictionDuringSetup {
            constraint: "skybox".to_string(),
        };
        assert_eq!(error.to_string(), "Contradiction while applying 'skybox'");
    }

    // Tests run contradictions report the cell
    // Verified by dropping the cell from the message
    #[test]
    fn test_run_contradiction_message() {
        let error = GenerationError::ContradictionDuringRun {
            cell: Some([1, 2, 0]),
        };
        assert_eq!(
            error.to_string(),
            "Contradiction during generation at cell Some([1, 2, 0])"
        );
    }

    // Tests only run contradictions are worth retrying
    // Verified by marking setup contradictions retryable
    #[test]
    fn test_is_retryable() {
        assert!(GenerationError::ContradictionDuringRun { cell: None }.is_retryable());
        assert!(
            !GenerationError::ContradictionDuringSetup {
                constraint: "pin".to_string()
            }
            .is_retryable()
        );
        assert!(!GenerationError::Cancelled.is_retryable());
        assert!(!GenerationError::EmptyTileSet.is_retryable());
    }

    // Tests helper constructors fill every field
    // Verified by swapping value and reason
    #[test]
    fn test_helper_constructors() {
        let error = invalid_parameter("width", &0, &"must be positive");
        assert_eq!(
            error.to_string(),
            "Invalid parameter 'width' = '0': must be positive"
        );

        let error = configuration_error(&"bad pin");
        assert_eq!(error.to_string(), "Invalid configuration: bad pin");

        let error = invalid_face("bridge", &"offset out of range");
        assert_eq!(
            error.to_string(),
            "Tile 'bridge' has an invalid face: offset out of range"
        );
    }

    // Tests out-of-order phases name both states
    // Verified by swapping expected and actual
    #[test]
    fn test_invalid_state_message() {
        let error = GenerationError::InvalidState {
            expected: "SetUp",
            actual: "Uninitialized",
        };
        assert_eq!(
            error.to_string(),
            "Pipeline expected state SetUp but was in Uninitialized"
        );
    }
}
