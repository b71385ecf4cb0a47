use crate::errors::EngineError;

/// Canonicalizes a raw identity (an email address) into the key all merge
/// lookups run against: surrounding whitespace trimmed, lower-cased. Two
/// inputs differing only in case or whitespace always normalize to the same
/// key; this is the basis of all deduplication.
pub fn normalize(raw: &str) -> Result<String, EngineError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidIdentity(
            "identity is empty".to_string(),
        ));
    }
    if !trimmed.contains('@') {
        return Err(EngineError::InvalidIdentity(format!(
            "'{trimmed}' is not an email address"
        )));
    }
    Ok(trimmed.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_whitespace_invariance() {
        let variants = [" X@Y.com ", "x@y.com", "X@y.COM", "\tx@Y.com\n"];
        for raw in variants {
            assert_eq!(normalize(raw).unwrap(), "x@y.com", "input was {raw:?}");
        }
    }

    #[test]
    fn test_empty_is_invalid() {
        assert!(matches!(
            normalize("   "),
            Err(EngineError::InvalidIdentity(_))
        ));
    }

    #[test]
    fn test_missing_at_is_invalid() {
        assert!(matches!(
            normalize("not-an-email"),
            Err(EngineError::InvalidIdentity(_))
        ));
    }
}
