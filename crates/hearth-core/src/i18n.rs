//! Label lookup for the handful of strings the core produces itself.

pub const DEFAULT_LANGUAGE: &str = "en";

const GLOBAL_SETTINGS: &[(&str, &str)] = &[
    ("en", "Global Settings"),
    ("de", "Globale Einstellungen"),
    ("es", "Configuración global"),
    ("fr", "Paramètres globaux"),
    ("pt", "Configurações globais"),
];

/// Title of the default-scope settings screen. Unknown languages fall back to English.
pub fn global_settings_label(language: &str) -> &'static str {
    let base = language.split(['-', '_']).next().unwrap_or(language);
    GLOBAL_SETTINGS
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(base))
        .or_else(|| GLOBAL_SETTINGS.first())
        .map(|(_, label)| *label)
        .unwrap_or("Global Settings")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_suffix_is_ignored() {
        assert_eq!(global_settings_label("de_DE"), "Globale Einstellungen");
        assert_eq!(global_settings_label("pt-BR"), "Configurações globais");
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        assert_eq!(global_settings_label("xx"), "Global Settings");
    }
}
