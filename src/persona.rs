//! Buyer persona configuration.
//!
//! A persona bundles the phrasing traits used to flavor buyer messages
//! with the numeric strategy tunables the decision policy runs on. It is
//! loaded once from a JSON file and stays immutable for the session; a
//! missing or malformed file is a fatal initialization error.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decision::StrategyConfig;
use crate::error::PersonaError;

/// Persona definition as stored on disk.
///
/// Every field is optional in the file; absent strategy parameters fall
/// back to the documented defaults in [`StrategyConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub traits: Vec<String>,
    /// Preferred key for the negotiation style.
    #[serde(default)]
    pub negotiation_style: Option<String>,
    /// Legacy alias for `negotiation_style`.
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub catchphrases: Vec<String>,
    #[serde(default)]
    pub strategy_params: StrategyConfig,
}

fn default_name() -> String {
    "Buyer".to_string()
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: default_name(),
            traits: Vec::new(),
            negotiation_style: None,
            style: None,
            catchphrases: Vec::new(),
            strategy_params: StrategyConfig::default(),
        }
    }
}

/// Loads and exposes the buyer persona.
#[derive(Debug, Clone)]
pub struct PersonaComponent {
    persona: Persona,
}

impl PersonaComponent {
    /// Load a persona from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError`] when the file cannot be read or parsed.
    /// The caller must treat this as fatal and not start the session.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PersonaError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| PersonaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let persona = serde_json::from_str(&content).map_err(|source| PersonaError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { persona })
    }

    /// Wrap an already-built persona, mainly for tests and embedding.
    pub fn from_persona(persona: Persona) -> Self {
        Self { persona }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Strategy tunables for the decision policy.
    pub fn strategy_params(&self) -> &StrategyConfig {
        &self.persona.strategy_params
    }

    /// Render the one-line persona string used in rationales and
    /// phrasing prompts.
    pub fn make_prompt(&self) -> String {
        let p = &self.persona;
        let style = p
            .negotiation_style
            .as_deref()
            .or(p.style.as_deref())
            .unwrap_or("direct");
        format!(
            "Persona: {} | Style: {} | Traits: {} | Catchphrases: {}",
            p.name,
            style,
            p.traits.join(", "),
            p.catchphrases.join(", "),
        )
    }

    /// Export the persona as a JSON mapping for checkpointing.
    pub fn get_state(&self) -> Value {
        serde_json::json!({ "persona": self.persona })
    }

    /// Restore a persona from exported state; ignored when the state
    /// carries no valid persona.
    pub fn set_state(&mut self, state: &Value) {
        if let Some(p) = state
            .get("persona")
            .and_then(|p| serde_json::from_value(p.clone()).ok())
        {
            self.persona = p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_persona() {
        let file = write_config(
            r#"{
                "name": "Haggler",
                "traits": ["aggressive", "patient"],
                "negotiation_style": "hardball",
                "catchphrases": ["Seal it."],
                "strategy_params": { "opening_pct": 0.6, "final_round": 8 }
            }"#,
        );
        let component = PersonaComponent::from_file(file.path()).unwrap();
        assert_eq!(component.persona().name, "Haggler");
        assert_eq!(component.strategy_params().opening_pct, 0.6);
        assert_eq!(component.strategy_params().final_round, 8);
        // Unspecified tunables keep their defaults.
        assert_eq!(component.strategy_params().mid_pct, 0.80);
    }

    #[test]
    fn test_style_alias() {
        let file = write_config(r#"{ "name": "B", "style": "calm" }"#);
        let component = PersonaComponent::from_file(file.path()).unwrap();
        assert!(component.make_prompt().contains("Style: calm"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = PersonaComponent::from_file("/nonexistent/persona.json").unwrap_err();
        assert!(matches!(err, PersonaError::Io { .. }));
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let file = write_config("{ not json");
        let err = PersonaComponent::from_file(file.path()).unwrap_err();
        assert!(matches!(err, PersonaError::Parse { .. }));
    }

    #[test]
    fn test_make_prompt_defaults() {
        let component = PersonaComponent::from_persona(Persona::default());
        let prompt = component.make_prompt();
        assert!(prompt.starts_with("Persona: Buyer"));
        assert!(prompt.contains("Style: direct"));
    }

    #[test]
    fn test_state_round_trip() {
        let mut component = PersonaComponent::from_persona(Persona::default());
        let state = serde_json::json!({
            "persona": { "name": "Restored", "strategy_params": { "late_pct": 0.9 } }
        });
        component.set_state(&state);
        assert_eq!(component.persona().name, "Restored");
        assert_eq!(component.strategy_params().late_pct, 0.9);
    }
}
