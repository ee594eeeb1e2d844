use std::sync::Arc;

use tracing::info;

use crate::repository::quote_repo::QuoteRepository;
use crate::util::error::ServiceError;

const QUOTE_PREFIX: &str = "QT-";
/// Hard ceiling for the 7-digit sequence. Once reached, generation fails
/// rather than rolling over.
pub const MAX_QUOTE_SEQUENCE: i32 = 9_999_999;

/// A freshly generated quote number, paired with the sequence value that
/// backs it. The sequence is stored on the quote so the store can answer
/// `find_max_quote_sequence` without parsing number strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteNumber {
    pub sequence: i32,
    pub value: String,
}

impl std::fmt::Display for QuoteNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Generates sequential quote numbers in the format `QT-XXXXXXX`.
///
/// The generator itself is a pure read-then-compute step: it scans the store
/// for the current maximum sequence and adds one. Uniqueness under
/// concurrency is enforced by the store's unique index on the quote number;
/// the creation workflow retries the whole generate-and-insert step when the
/// index rejects a duplicate.
pub struct QuoteNumberGenerator {
    quote_repo: Arc<dyn QuoteRepository>,
}

impl QuoteNumberGenerator {
    pub fn new(quote_repo: Arc<dyn QuoteRepository>) -> Self {
        QuoteNumberGenerator { quote_repo }
    }

    /// Produce the next sequential quote number.
    ///
    /// Returns `ServiceError::FatalState` once the sequence is exhausted;
    /// that is an operational ceiling, not a user input error.
    pub async fn generate_next_quote_number(&self) -> Result<QuoteNumber, ServiceError> {
        let max_sequence = self
            .quote_repo
            .find_max_quote_sequence()
            .await
            .map_err(ServiceError::from)?
            .unwrap_or(0);

        if max_sequence >= MAX_QUOTE_SEQUENCE {
            return Err(ServiceError::FatalState(
                "Quote number sequence exceeded maximum value. Cannot generate more quote numbers."
                    .to_string(),
            ));
        }

        let next_sequence = max_sequence + 1;
        let quote_number = QuoteNumber {
            sequence: next_sequence,
            value: Self::format_quote_number(next_sequence),
        };

        info!("Generated quote number: {}", quote_number);
        Ok(quote_number)
    }

    /// Format a sequence into `QT-XXXXXXX` (7 digits, zero-padded).
    fn format_quote_number(sequence: i32) -> String {
        format!("{}{:07}", QUOTE_PREFIX, sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_to_seven_digits() {
        assert_eq!(QuoteNumberGenerator::format_quote_number(1), "QT-0000001");
        assert_eq!(QuoteNumberGenerator::format_quote_number(100), "QT-0000100");
        assert_eq!(QuoteNumberGenerator::format_quote_number(1000), "QT-0001000");
        assert_eq!(QuoteNumberGenerator::format_quote_number(9_999_999), "QT-9999999");
    }
}
