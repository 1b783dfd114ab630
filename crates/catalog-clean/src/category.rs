// Category mapping from Thema subject codes to storefront labels.

use crate::text::normalize;

pub const UNCATEGORIZED: &str = "Sin Categoría";
pub const OTHER: &str = "Otros";

/// Thema subject prefixes and their storefront labels.
const THEMA_LABELS: &[(&str, &str)] = &[
    ("F", "Ficción"),
    ("FA", "Ficción Moderna y Contemporánea"),
    ("FB", "Ficción Clásica"),
    ("FC", "Ficción: Géneros y Estilos"),
    ("FD", "Ficción: Ciencia Ficción y Fantasía"),
    ("FF", "Ficción: Crimen y Misterio"),
    ("FH", "Ficción: Suspense y Thriller"),
    ("FJ", "Ficción: Bélica"),
    ("FK", "Ficción: Terror y Sobrenatural"),
    ("FL", "Ficción: Erótica"),
    ("FM", "Ficción: Relatos Cortos"),
    ("FN", "Ficción: Histórica"),
    ("FP", "Ficción: Humorística"),
    ("FR", "Ficción: Romántica"),
    ("FS", "Ficción: De Aventuras"),
    ("FT", "Ficción: Deportes y Juegos"),
    ("FU", "Ficción: Distópica"),
    ("FV", "Ficción: Familiar"),
    ("FW", "Ficción: Religiosa y Espiritual"),
    ("FX", "Ficción: Narrativa Gráfica"),
    ("J", "Infantil, Juvenil y Didáctico"),
    ("JA", "Infantil y Juvenil: Ficción de Interés General"),
    ("JB", "Infantil y Juvenil: Ficción de Género"),
    ("Y", "Educación y Textos de Enseñanza"),
    ("P", "Matemáticas y Ciencia"),
    ("Q", "Filosofía y Religión"),
    ("R", "Tierra, Geografía, Medio Ambiente"),
    ("S", "Deportes y Actividades de Ocio"),
    ("T", "Tecnología, Ingeniería, Agricultura"),
    ("U", "Computación e Informática"),
    ("V", "Salud y Cuestiones Personales"),
    ("W", "Estilo de Vida, Deporte y Ocio"),
];

/// Map a raw category column to a storefront label.
///
/// Thema codes (`"FB"`, `"jab"`, `"FXL2"`) resolve by longest known prefix,
/// falling back to [`OTHER`]. Anything that doesn't look like a code is
/// free text and comes back normalized. Empty input is [`UNCATEGORIZED`].
pub fn map_category(raw: &str) -> String {
    let text = normalize(raw);
    if text.is_empty() {
        return UNCATEGORIZED.to_string();
    }
    if !looks_like_thema_code(&text) {
        return text;
    }
    thema_label(&text).unwrap_or(OTHER).to_string()
}

/// Label for the longest known prefix of a Thema code, if any.
pub fn thema_label(code: &str) -> Option<&'static str> {
    let code = code.trim().to_ascii_uppercase();
    (1..=code.len()).rev().find_map(|len| {
        let prefix = code.get(..len)?;
        THEMA_LABELS
            .iter()
            .find(|(key, _)| *key == prefix)
            .map(|(_, label)| *label)
    })
}

/// Thema codes are short and alphanumeric. Longer words are only treated
/// as codes when written in capitals, so "Poesía" or "Arte" stay free text.
fn looks_like_thema_code(text: &str) -> bool {
    let len = text.len();
    if len == 0 || len > 6 || !text.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }
    if !text.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return false;
    }
    len <= 3 || text.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_code() {
        assert_eq!(map_category("FB"), "Ficción Clásica");
        assert_eq!(map_category("U"), "Computación e Informática");
    }

    #[test]
    fn test_prefix_fallback() {
        assert_eq!(map_category("JAB"), "Infantil y Juvenil: Ficción de Interés General");
        assert_eq!(map_category("FXL2"), "Ficción: Narrativa Gráfica");
        assert_eq!(map_category("PD"), "Matemáticas y Ciencia");
    }

    #[test]
    fn test_case_insensitive_codes() {
        assert_eq!(map_category(" fb "), "Ficción Clásica");
        assert_eq!(map_category("jab"), "Infantil y Juvenil: Ficción de Interés General");
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(map_category("XQ"), OTHER);
        assert_eq!(map_category("ZZZ9"), OTHER);
    }

    #[test]
    fn test_empty() {
        assert_eq!(map_category(""), UNCATEGORIZED);
        assert_eq!(map_category("   "), UNCATEGORIZED);
        assert_eq!(map_category("<p></p>"), UNCATEGORIZED);
    }

    #[test]
    fn test_free_text_passes_through_normalized() {
        assert_eq!(map_category("Poesía"), "Poesía");
        assert_eq!(map_category("  Novela   negra "), "Novela negra");
        assert_eq!(map_category("Arte"), "Arte");
        assert_eq!(map_category("Historia de Espa\u{c3}\u{b1}a"), "Historia de España");
    }

    #[test]
    fn test_thema_label_direct() {
        assert_eq!(thema_label("FK"), Some("Ficción: Terror y Sobrenatural"));
        assert_eq!(thema_label("9"), None);
    }
}
