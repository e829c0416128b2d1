//! Error types for the Huffman codec.

/// Error type for every fallible codec operation.
///
/// Apart from `Io`, every variant describes a local, non-retryable condition:
/// the input, table or bitstream handed to the codec is unusable as given.
#[derive(Debug, thiserror::Error)]
pub enum HuffmanError {
    /// No symbols to build a tree from.
    #[error("cannot build a code tree from empty input")]
    EmptyInput,

    /// A symbol passed to `encode` has no code in the table.
    #[error("symbol {symbol} has no entry in the code table")]
    UnknownSymbol {
        /// Debug rendering of the offending symbol.
        symbol: String,
    },

    /// The bitstream ended part-way down a code path.
    #[error("bitstream ends {dangling_bits} bit(s) into an unfinished code")]
    TruncatedCode {
        /// Bits consumed since the last complete symbol.
        dangling_bits: usize,
    },

    /// A persisted code table record could not be parsed, or the records do
    /// not form a valid prefix code.
    #[error("malformed code table at line {line}: {reason}")]
    MalformedTable {
        /// 1-based line number, or 0 when the problem concerns the table as a whole.
        line: usize,
        reason: String,
    },

    /// A text or packed bitstream could not be read back.
    #[error("invalid bitstream: {0}")]
    InvalidBitstream(String),

    /// Reading or writing a persisted table failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HuffmanError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        HuffmanError::MalformedTable {
            line,
            reason: reason.into(),
        }
    }

    /// Returns true if the error points at corrupted or incomplete encoded data
    /// rather than at the caller's input.
    #[inline]
    pub fn is_corrupt_data(&self) -> bool {
        matches!(
            self,
            HuffmanError::TruncatedCode { .. }
                | HuffmanError::MalformedTable { .. }
                | HuffmanError::InvalidBitstream(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, HuffmanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_corrupt_data() {
        assert!(HuffmanError::TruncatedCode { dangling_bits: 2 }.is_corrupt_data());
        assert!(HuffmanError::malformed(3, "missing ':'").is_corrupt_data());
        assert!(HuffmanError::InvalidBitstream("x".into()).is_corrupt_data());
        assert!(!HuffmanError::EmptyInput.is_corrupt_data());
        assert!(!HuffmanError::from(std::io::Error::other("disk gone")).is_corrupt_data());
        assert!(
            !HuffmanError::UnknownSymbol {
                symbol: "'z'".into()
            }
            .is_corrupt_data()
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            HuffmanError::EmptyInput.to_string(),
            "cannot build a code tree from empty input"
        );
        assert_eq!(
            HuffmanError::TruncatedCode { dangling_bits: 3 }.to_string(),
            "bitstream ends 3 bit(s) into an unfinished code"
        );
        assert_eq!(
            HuffmanError::malformed(7, "empty code").to_string(),
            "malformed code table at line 7: empty code"
        );
    }
}
