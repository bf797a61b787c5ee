use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User options. `editMode` is the only recognized key; anything else found
/// in storage is preserved untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default, rename = "editMode")]
    pub edit_mode: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_has_edit_mode_off() {
        let s = Settings::default();
        assert!(!s.edit_mode);
        assert_eq!(serde_json::to_value(&s).unwrap(), json!({"editMode": false}));
    }

    #[test]
    fn unknown_options_round_trip() {
        let v = json!({"editMode": true, "fontScale": 1.2});
        let s: Settings = serde_json::from_value(v.clone()).unwrap();
        assert!(s.edit_mode);
        assert_eq!(serde_json::to_value(&s).unwrap(), v);
    }

    #[test]
    fn missing_edit_mode_defaults_false() {
        let s: Settings = serde_json::from_str("{}").unwrap();
        assert!(!s.edit_mode);
    }
}
