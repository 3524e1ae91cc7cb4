//! Layer tag encoding
//!
//! The broker has no native concept of a grid layer, so layer identity is
//! carried in each order/position comment as `<TAG>|side=<BUY|SELL>|layer=<N>`.
//! This is the system's only durable record; comments are parsed back into
//! a typed [`LayerTag`] the moment they are read, and a malformed layer
//! field degrades to layer 0 rather than failing the scan.

use crate::gateway::OrderSide;

/// Typed form of the comment tag embedded in broker records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerTag {
    pub side: OrderSide,
    pub layer: u32,
}

impl LayerTag {
    /// Render the comment string for a grid leg
    pub fn render(&self, prefix: &str) -> String {
        format!("{prefix}|side={}|layer={}", self.side, self.layer)
    }

    /// Parse a broker comment back into a tag
    ///
    /// Returns `None` when the comment does not carry our prefix or names
    /// no side. A missing or corrupt `layer=` field maps to layer 0.
    pub fn parse(comment: &str, prefix: &str) -> Option<LayerTag> {
        let rest = comment.strip_prefix(prefix)?.strip_prefix('|')?;

        let mut side = None;
        for field in rest.split('|') {
            match field.strip_prefix("side=") {
                Some("BUY") => side = Some(OrderSide::Buy),
                Some("SELL") => side = Some(OrderSide::Sell),
                _ => {}
            }
        }

        Some(LayerTag {
            side: side?,
            layer: parse_layer(comment),
        })
    }
}

/// Extract the layer index from a comment, defaulting to 0
pub fn parse_layer(comment: &str) -> u32 {
    comment
        .split('|')
        .find_map(|field| field.strip_prefix("layer="))
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

/// True when a comment carries our tag prefix
pub fn has_tag(comment: &str, prefix: &str) -> bool {
    comment
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('|'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_parse_round_trip() {
        let tag = LayerTag {
            side: OrderSide::Sell,
            layer: 3,
        };
        let comment = tag.render("HMv1");
        assert_eq!(comment, "HMv1|side=SELL|layer=3");

        let parsed = LayerTag::parse(&comment, "HMv1").unwrap();
        assert_eq!(parsed, tag);
        assert_eq!(parsed.layer, 3);
    }

    #[test]
    fn test_parse_wrong_prefix() {
        assert!(LayerTag::parse("other|side=BUY|layer=1", "HMv1").is_none());
        assert!(LayerTag::parse("", "HMv1").is_none());
        // Prefix must be followed by the separator, not merely share letters
        assert!(LayerTag::parse("HMv12|side=BUY|layer=1", "HMv1").is_none());
    }

    #[test]
    fn test_parse_missing_side() {
        assert!(LayerTag::parse("HMv1|layer=2", "HMv1").is_none());
    }

    #[test]
    fn test_corrupt_layer_defaults_to_zero() {
        let parsed = LayerTag::parse("HMv1|side=BUY|layer=abc", "HMv1").unwrap();
        assert_eq!(parsed.layer, 0);

        let parsed = LayerTag::parse("HMv1|side=BUY", "HMv1").unwrap();
        assert_eq!(parsed.layer, 0);
    }

    #[test]
    fn test_parse_layer_standalone() {
        assert_eq!(parse_layer("HMv1|side=SELL|layer=4"), 4);
        assert_eq!(parse_layer("HMv1|close_basket"), 0);
        assert_eq!(parse_layer("layer="), 0);
    }

    #[test]
    fn test_has_tag() {
        assert!(has_tag("HMv1|side=BUY|layer=0", "HMv1"));
        assert!(has_tag("HMv1|close_basket", "HMv1"));
        assert!(!has_tag("HMv10|side=BUY|layer=0", "HMv1"));
        assert!(!has_tag("manual entry", "HMv1"));
    }
}
