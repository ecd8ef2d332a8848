/// Color palettes for the clock faces.
/// Each face has a typed record of color roles plus a partial counterpart used
/// to overwrite only the roles a caller provides.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A typed palette that can absorb a partial update.
pub trait Palette: Default + Clone + Serialize {
    type Partial: DeserializeOwned;

    /// Overwrite the roles present in `partial`; absent roles keep their values.
    fn merge(&mut self, partial: Self::Partial);

    /// Palette as a plain role -> color mapping.
    fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Apply a JSON mapping to a palette.
///
/// Non-object input is ignored. An object whose known roles are not strings is
/// rejected whole, leaving the palette untouched. Returns whether anything was
/// merged.
pub fn merge_json<P: Palette>(palette: &mut P, colors: &Value) -> bool {
    if !colors.is_object() {
        debug!("Ignoring non-mapping color input: {}", colors);
        return false;
    }
    match serde_json::from_value::<P::Partial>(colors.clone()) {
        Ok(partial) => {
            palette.merge(partial);
            true
        }
        Err(e) => {
            warn!("Ignoring malformed color mapping: {}", e);
            false
        }
    }
}

/// Seven-segment face colors
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalPalette {
    pub background: String,
    pub line_on: String,
    pub line_off: String,
    /// Roles the face does not know about; stored, never drawn
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for DigitalPalette {
    fn default() -> Self {
        Self {
            background: "#200000".to_string(),
            line_on: "#FF0000".to_string(),
            line_off: "#5A0000".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalColors {
    pub background: Option<String>,
    pub line_on: Option<String>,
    pub line_off: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Palette for DigitalPalette {
    type Partial = DigitalColors;

    fn merge(&mut self, partial: DigitalColors) {
        if let Some(c) = partial.background {
            self.background = c;
        }
        if let Some(c) = partial.line_on {
            self.line_on = c;
        }
        if let Some(c) = partial.line_off {
            self.line_off = c;
        }
        self.extra.extend(partial.extra);
    }
}

/// Analog face colors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalogPalette {
    pub hour: String,
    pub minute: String,
    pub second: String,
    pub stroke: String,
    pub background: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for AnalogPalette {
    fn default() -> Self {
        Self {
            hour: "#efefef".to_string(),
            minute: "#cccccc".to_string(),
            second: "#ff9933".to_string(),
            stroke: "#cccccc".to_string(),
            background: "#000000".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalogColors {
    pub hour: Option<String>,
    pub minute: Option<String>,
    pub second: Option<String>,
    pub stroke: Option<String>,
    pub background: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Palette for AnalogPalette {
    type Partial = AnalogColors;

    fn merge(&mut self, partial: AnalogColors) {
        let slots = [
            (partial.hour, &mut self.hour),
            (partial.minute, &mut self.minute),
            (partial.second, &mut self.second),
            (partial.stroke, &mut self.stroke),
            (partial.background, &mut self.background),
        ];
        for (value, slot) in slots {
            if let Some(c) = value {
                *slot = c;
            }
        }
        self.extra.extend(partial.extra);
    }
}
