mod common;

use std::sync::Arc;

use chantier_backend::service::quote_number::{QuoteNumberGenerator, MAX_QUOTE_SEQUENCE};
use chantier_backend::util::error::ServiceError;
use common::InMemoryQuoteRepository;

fn generator_with_max(sequence: Option<i32>) -> QuoteNumberGenerator {
    let repo = Arc::new(InMemoryQuoteRepository::new());
    if let Some(sequence) = sequence {
        repo.seed_sequence(sequence);
    }
    QuoteNumberGenerator::new(repo)
}

#[tokio::test]
async fn first_quote_number_when_store_is_empty() {
    let generator = generator_with_max(None);

    let number = generator.generate_next_quote_number().await.unwrap();

    assert_eq!(number.value, "QT-0000001");
    assert_eq!(number.sequence, 1);
}

#[tokio::test]
async fn next_number_is_max_plus_one() {
    let generator = generator_with_max(Some(5));

    let number = generator.generate_next_quote_number().await.unwrap();

    assert_eq!(number.value, "QT-0000006");
}

#[tokio::test]
async fn zero_padding_is_seven_digits() {
    // max -> expected next
    let cases = [
        (99, "QT-0000100"),
        (999, "QT-0001000"),
        (1000, "QT-0001001"),
        (123_456, "QT-0123457"),
    ];

    for (max, expected) in cases {
        let generator = generator_with_max(Some(max));
        let number = generator.generate_next_quote_number().await.unwrap();
        assert_eq!(number.value, expected, "max sequence {}", max);
    }
}

#[tokio::test]
async fn sequence_ceiling_is_a_hard_stop() {
    let generator = generator_with_max(Some(MAX_QUOTE_SEQUENCE));

    match generator.generate_next_quote_number().await {
        Err(ServiceError::FatalState(msg)) => {
            assert!(msg.contains("exceeded maximum value"), "message: {}", msg);
        }
        other => panic!("expected FatalState, got {:?}", other.map(|n| n.value)),
    }
}

#[tokio::test]
async fn last_valid_sequence_still_generates() {
    let generator = generator_with_max(Some(MAX_QUOTE_SEQUENCE - 1));

    let number = generator.generate_next_quote_number().await.unwrap();

    assert_eq!(number.value, "QT-9999999");
}

#[tokio::test]
async fn generation_has_no_side_effects() {
    let repo = Arc::new(InMemoryQuoteRepository::new());
    repo.seed_sequence(7);
    let generator = QuoteNumberGenerator::new(repo.clone());

    // Reading twice without an insert yields the same number
    let first = generator.generate_next_quote_number().await.unwrap();
    let second = generator.generate_next_quote_number().await.unwrap();

    assert_eq!(first.value, "QT-0000008");
    assert_eq!(second.value, "QT-0000008");
    assert_eq!(repo.quotes.lock().unwrap().len(), 1);
}
