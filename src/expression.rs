use std::collections::BTreeMap;
use std::sync::LazyLock;

use tracing::warn;

use crate::error::{PanelError, PanelResult};

/// Fallback expression every unknown-name path resolves to.
pub const NEUTRAL_EXPRESSION: &str = "neutral";

/// Closed set of facial blend channels. Channels not present in an
/// expression default to 0.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BlendChannel {
    BrowRaise,
    BrowFurrow,
    EyeWide,
    EyeClose,
    MouthSmile,
    MouthFrown,
    MouthOpen,
}

pub type BlendWeights = BTreeMap<BlendChannel, f64>;

/// Named blend-weight state for the face.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExpressionDefinition {
    channels: BlendWeights,
}

impl ExpressionDefinition {
    pub fn new(pairs: &[(BlendChannel, f64)]) -> Self {
        let channels = pairs
            .iter()
            .map(|&(c, w)| (c, w.clamp(0.0, 1.0)))
            .collect();
        Self { channels }
    }

    pub fn channels(&self) -> &BlendWeights {
        &self.channels
    }

    /// Weight for one channel, 0 when absent.
    pub fn weight(&self, channel: BlendChannel) -> f64 {
        self.channels.get(&channel).copied().unwrap_or(0.0)
    }
}

static EXPRESSIONS: LazyLock<BTreeMap<&'static str, ExpressionDefinition>> =
    LazyLock::new(|| {
        use BlendChannel::*;

        let mut map = BTreeMap::new();
        map.insert(NEUTRAL_EXPRESSION, ExpressionDefinition::new(&[]));
        map.insert(
            "happy",
            ExpressionDefinition::new(&[(MouthSmile, 0.9), (BrowRaise, 0.3)]),
        );
        map.insert(
            "sad",
            ExpressionDefinition::new(&[
                (MouthFrown, 0.8),
                (BrowFurrow, 0.4),
                (EyeClose, 0.3),
            ]),
        );
        map.insert(
            "angry",
            ExpressionDefinition::new(&[(BrowFurrow, 0.9), (MouthFrown, 0.6)]),
        );
        map.insert(
            "surprised",
            ExpressionDefinition::new(&[
                (EyeWide, 0.9),
                (BrowRaise, 0.8),
                (MouthOpen, 0.7),
            ]),
        );
        map.insert(
            "worried",
            ExpressionDefinition::new(&[
                (BrowFurrow, 0.5),
                (MouthFrown, 0.3),
                (EyeWide, 0.2),
            ]),
        );
        map
    });

fn normalize_name(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

pub fn resolve_expression(name: &str) -> PanelResult<&'static ExpressionDefinition> {
    let key = normalize_name(name);
    EXPRESSIONS
        .get(key.as_str())
        .ok_or_else(|| PanelError::unknown_expression(name))
}

/// Resolve an expression, falling back to neutral with a warning when the
/// name is unknown. Returns the resolved canonical name.
pub fn resolve_expression_or_neutral(
    name: &str,
) -> (&'static str, &'static ExpressionDefinition) {
    let key = normalize_name(name);
    if let Some((k, def)) = EXPRESSIONS.get_key_value(key.as_str()) {
        return (k, def);
    }
    warn!(
        expression = name,
        "unknown expression, falling back to neutral"
    );
    let (k, def) = EXPRESSIONS
        .get_key_value(NEUTRAL_EXPRESSION)
        .expect("neutral expression always present");
    (k, def)
}

pub fn expression_names() -> impl Iterator<Item = &'static str> {
    EXPRESSIONS.keys().copied()
}
