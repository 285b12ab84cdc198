use proptest::prelude::*;
use smart_maic_exporter::device::ChannelValue;

fn channel(value: String) -> ChannelValue {
    serde_json::from_value(serde_json::json!({
        "name": "channel",
        "unit": "",
        "value": value,
    }))
    .unwrap()
}

proptest! {
    /// Any finite value the device could report round-trips exactly through
    /// the parser, regardless of where whitespace is injected.
    #[test]
    fn parse_recovers_value_despite_whitespace(
        value in -1.0e9f64..1.0e9f64,
        pad_left in 0usize..3,
        pad_right in 0usize..3,
    ) {
        let raw = format!(
            "{}{}{}",
            " ".repeat(pad_left),
            value,
            " ".repeat(pad_right)
        );
        prop_assert_eq!(channel(raw).parse("V1").unwrap(), value);
    }

    /// A space injected anywhere inside the literal is stripped before
    /// parsing, so the cleaned value still round-trips.
    #[test]
    fn parse_ignores_embedded_space(value in 0.0f64..1.0e9f64, pos_seed in 0usize..64) {
        let literal = format!("{}", value);
        let pos = pos_seed % (literal.len() + 1);
        let raw = format!("{} {}", &literal[..pos], &literal[pos..]);
        prop_assert_eq!(channel(raw).parse("Wh1").unwrap(), value);
    }

    /// Alphabetic junk never parses.
    #[test]
    fn parse_rejects_alphabetic(raw in "[a-zA-Z/]{1,8}") {
        prop_assert!(channel(raw).parse("V1").is_err());
    }
}
