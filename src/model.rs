//! Model name resolution and the per-operation model selection.

/// Default model for service previews.
pub const DEFAULT_VISUAL_MODEL: &str = "gemini-3-pro-image-preview";
/// Default model for photo analysis and validation.
pub const DEFAULT_VISION_MODEL: &str = "gemini-3-pro-preview";
/// Default model for photo edits.
pub const DEFAULT_EDIT_MODEL: &str = "gemini-2.5-flash-image";

/// Short name aliases for popular models.
const ALIASES: &[(&str, &str)] = &[
    ("nano-banana", "gemini-2.5-flash-image"),
    ("nano-banana-2", "gemini-3.1-flash-image-preview"),
    ("nano-banana-pro", "gemini-3-pro-image-preview"),
    ("gemini-pro", "gemini-3-pro-preview"),
    ("gemini-flash", "gemini-2.5-flash"),
];

/// Resolve a model name (alias or exact) to the full model identifier.
#[must_use]
pub fn resolve_model(name: &str) -> String {
    for &(alias, full) in ALIASES {
        if name == alias {
            return full.to_string();
        }
    }
    name.to_string()
}

/// Check that a resolved model name targets the Gemini API.
///
/// # Errors
///
/// Returns an error if the model name is not a `gemini-*` model.
pub fn check_gemini(model: &str) -> Result<(), String> {
    if model.starts_with("gemini") {
        Ok(())
    } else {
        Err(format!("Unsupported model '{model}'. Expected a 'gemini-*' model or alias."))
    }
}

/// Models used for each gateway operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSet {
    /// Image generation for service previews.
    pub visual: String,
    /// Vision model for analysis and validation.
    pub vision: String,
    /// Image editing.
    pub edit: String,
}

impl Default for ModelSet {
    fn default() -> Self {
        Self {
            visual: DEFAULT_VISUAL_MODEL.to_string(),
            vision: DEFAULT_VISION_MODEL.to_string(),
            edit: DEFAULT_EDIT_MODEL.to_string(),
        }
    }
}

impl ModelSet {
    /// Resolve aliases in every slot and check they are Gemini models.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first unsupported model.
    pub fn resolved(&self) -> Result<Self, String> {
        let set = Self {
            visual: resolve_model(&self.visual),
            vision: resolve_model(&self.vision),
            edit: resolve_model(&self.edit),
        };
        check_gemini(&set.visual)?;
        check_gemini(&set.vision)?;
        check_gemini(&set.edit)?;
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_nano_banana_pro() {
        assert_eq!(resolve_model("nano-banana-pro"), "gemini-3-pro-image-preview");
    }

    #[test]
    fn resolve_exact_name_passthrough() {
        assert_eq!(resolve_model("gemini-3-pro-preview"), "gemini-3-pro-preview");
    }

    #[test]
    fn non_gemini_rejected() {
        assert!(check_gemini("gpt-image-1").is_err());
        assert!(check_gemini("gemini-2.5-flash-image").is_ok());
    }

    #[test]
    fn model_set_resolves_aliases() {
        let set = ModelSet {
            visual: "nano-banana-pro".into(),
            vision: "gemini-pro".into(),
            edit: "nano-banana".into(),
        };
        let resolved = set.resolved().unwrap();
        assert_eq!(resolved, ModelSet::default());
    }

    #[test]
    fn model_set_reports_bad_slot() {
        let set = ModelSet { vision: "dall-e-3".into(), ..ModelSet::default() };
        let err = set.resolved().unwrap_err();
        assert!(err.contains("dall-e-3"));
    }
}
