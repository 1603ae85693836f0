//! Prompt assembly: negative-prompt baseline, composition, and fixed instructions.

/// Constraints sent with every generated image. Callers may extend it, never replace it.
pub const GLOBAL_NEGATIVE_PROMPT: &str = "no logos reales, no marcas registradas, no texto legible, \
no nombres de empresas, no placas de vehículos detalladas, no caras hiperrealistas de personas \
famosas, no violencia, no armas, no contenido sexual, no desnudos, no gestos ofensivos, no \
escenas borrosas, no ojos deformes, no manos deformes, no proporciones corporales extrañas, no \
baja resolución, no ruido digital excesivo, no estilo caricatura, no ilustración, no 3D, solo \
fotografía hiperrealista limpia y bien iluminada";

/// Instruction sent alongside a group photo for a package recommendation.
pub const ANALYSIS_PROMPT: &str = "Analiza esta foto de grupo. Dime aproximadamente cuántas \
personas ves y qué tipo de paquete de PartyBus en Guadalajara les recomendarías (Renta por hora, \
Tour Tequila, etc) basándote en su vibra. Responde de forma divertida y vendedora.";

/// Returned by photo analysis whenever the model cannot produce an answer.
pub const ANALYSIS_FALLBACK: &str = "¡Vaya! Parece que la fiesta está tan buena que no pude \
contar a todos. ¡Mejor escríbenos por WhatsApp!";

/// Classification instruction for the community gallery upload gate.
pub const VALIDATION_PROMPT: &str = "Eres el filtro de la galería de fotos de PartyBus \
Guadalajara. ¿Esta foto muestra un ambiente de fiesta, celebración o grupo de amigos divirtiéndose, \
sin desnudos, violencia ni contenido ofensivo? Responde únicamente con una palabra: SI o NO.";

/// Shown to the user when a preview could not be generated.
pub const FAILURE_NOTICE: &str =
    "Hubo un problema generando tu vista previa de lujo. Intenta de nuevo.";

/// Prefix of every artifact produced by the gateway.
pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Effective negative prompt: the baseline, optionally extended by `fragment`.
///
/// Blank fragments are ignored; others are appended unchanged.
#[must_use]
pub fn compose_negative(fragment: Option<&str>) -> String {
    match fragment {
        Some(extra) if !extra.trim().is_empty() => format!("{GLOBAL_NEGATIVE_PROMPT}, {extra}"),
        _ => GLOBAL_NEGATIVE_PROMPT.to_string(),
    }
}

/// Single prompt string with the negative constraints embedded.
#[must_use]
pub fn visual_prompt(subject: &str, negative: &str) -> String {
    format!("{subject}. Negative prompt: {negative}")
}

/// Instruction for restyling a party photo.
#[must_use]
pub fn edit_prompt(instruction: &str) -> String {
    format!(
        "Edita esta foto de fiesta: {instruction}. Haz que se vea lujosa y llena de luces neón \
         tipo antro en Guadalajara."
    )
}

/// Interpret a validation reply. Only an explicit yes passes.
#[must_use]
pub fn parse_verdict(reply: &str) -> bool {
    let first = reply
        .trim()
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .find(|w| !w.is_empty())
        .unwrap_or_default()
        .to_uppercase();
    matches!(first.as_str(), "SI" | "SÍ" | "YES")
}

/// Wrap a base64 payload as an embeddable data URI.
#[must_use]
pub fn data_uri(payload: &str) -> String {
    format!("{DATA_URI_PREFIX}{payload}")
}
