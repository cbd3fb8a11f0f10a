//! Known vectors for detection, checksum and formatting
use cardform::card::CardTypeRegistry;
use cardform::validation::{
    detect_card_type, format_card_number, format_expiry_date, luhn_check, strip_non_digits,
    validate_cvv, validate_expiry_date, validate_expiry_date_at, FieldError, YearMonth,
};

#[test]
fn test_luhn_vectors() {
    assert!(luhn_check("4532015112830366"));
    assert!(luhn_check("378282246310005"));
    assert!(!luhn_check("1234567890123456"));
}

#[test]
fn test_detect_known_prefixes() {
    let registry = CardTypeRegistry::builtin();

    let visa = detect_card_type(&registry, "4532015112830366").expect("visa");
    assert_eq!(visa.name, "Visa");
    assert_eq!(
        registry.rules().iter().position(|r| r.key == visa.key),
        Some(0)
    );

    let amex = detect_card_type(&registry, "371449635398431").expect("amex");
    assert_eq!(amex.name, "American Express");
    assert_eq!(amex.code.size, 4);
    assert_eq!(amex.lengths, vec![15]);

    assert!(detect_card_type(&registry, "9999999999999999").is_none());
}

#[test]
fn test_format_round_trip() {
    let registry = CardTypeRegistry::builtin();
    let visa = registry.get("visa");

    let formatted = format_card_number("4111111111111111", visa);
    assert_eq!(formatted, "4111 1111 1111 1111");
    assert_eq!(
        format_card_number(&strip_non_digits(&formatted), visa),
        formatted
    );
}

#[test]
fn test_expiry_vectors() {
    assert_eq!(format_expiry_date("1225"), "12/25");
    assert_eq!(
        validate_expiry_date("13/25"),
        Err(FieldError::InvalidMonth)
    );
    assert_eq!(
        validate_expiry_date("01/00"),
        Err(FieldError::Expired)
    );
    assert_eq!(
        validate_expiry_date_at("09/26", YearMonth::new(2026, 10)),
        Err(FieldError::Expired)
    );
    assert_eq!(
        validate_expiry_date_at("10/26", YearMonth::new(2026, 10)),
        Ok(())
    );
}

#[test]
fn test_cvv_vectors() {
    let registry = CardTypeRegistry::builtin();
    let amex = registry.get("amex");

    assert!(!validate_cvv("12", amex));
    assert!(validate_cvv("1234", amex));
}
