//! Locale resolution and localized error messages.
//!
//! Exists so error payloads and the language constraint handed to the
//! model always agree. No state, no side effects.

use serde::{Deserialize, Serialize};

/// Supported response languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
}

impl Language {
    /// Lowercase two-letter tag (`"en"` / `"es"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }

    /// Uppercase tag for prompt text (`"EN"` / `"ES"`).
    pub fn as_upper(self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Es => "ES",
        }
    }

    /// Parse the first two characters of a language tag (`"es-UY"` -> `Es`).
    pub fn from_tag(tag: &str) -> Option<Language> {
        let mut prefix = tag.chars().take(2).collect::<String>();
        prefix.make_ascii_lowercase();
        match prefix.as_str() {
            "en" => Some(Language::En),
            "es" => Some(Language::Es),
            _ => None,
        }
    }

    /// Pick a response language.
    ///
    /// Priority: explicit request field (first two characters, if it names
    /// a supported locale), then an `Accept-Language`-style header hint
    /// starting with `es`, then English.
    pub fn resolve(explicit: Option<&str>, header_hint: Option<&str>) -> Language {
        if let Some(lang) = explicit.and_then(Language::from_tag) {
            return lang;
        }
        if header_hint.is_some_and(|h| h.to_ascii_lowercase().starts_with("es")) {
            return Language::Es;
        }
        Language::En
    }
}

/// Stable identifiers for every client-visible error condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    StorageConfig,
    InvalidJson,
    NoImage,
    NoRequestText,
    ImageTooLarge,
    LimitUser,
    LimitGuest,
    ApiKey,
    AiEmpty,
    DbUrl,
    StorageFail,
    ProcessFail,
    Unauthorized,
    Forbidden,
    NotFound,
}

impl ErrorCode {
    /// Snake-case key used in logs and diagnostics.
    pub fn key(self) -> &'static str {
        match self {
            ErrorCode::StorageConfig => "storage_config",
            ErrorCode::InvalidJson => "invalid_json",
            ErrorCode::NoImage => "no_image",
            ErrorCode::NoRequestText => "no_request_text",
            ErrorCode::ImageTooLarge => "image_too_large",
            ErrorCode::LimitUser => "limit_user",
            ErrorCode::LimitGuest => "limit_guest",
            ErrorCode::ApiKey => "api_key",
            ErrorCode::AiEmpty => "ai_empty",
            ErrorCode::DbUrl => "db_url",
            ErrorCode::StorageFail => "storage_fail",
            ErrorCode::ProcessFail => "process_fail",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::Forbidden => "forbidden",
            ErrorCode::NotFound => "not_found",
        }
    }
}

/// Human-readable message for an error code in the given language.
///
/// Spanish strings fall back to English for codes without a translation;
/// the enum makes a missing English string unrepresentable, so the
/// raw-code fallback of the original table never fires in practice.
pub fn error_message(code: ErrorCode, lang: Language) -> &'static str {
    match lang {
        Language::En => english_message(code),
        Language::Es => spanish_message(code).unwrap_or_else(|| english_message(code)),
    }
}

fn english_message(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::StorageConfig => "Missing storage configuration",
        ErrorCode::InvalidJson => "Invalid JSON",
        ErrorCode::NoImage => "No image provided",
        ErrorCode::NoRequestText => "Missing image or text",
        ErrorCode::ImageTooLarge => "Image exceeds 6 MB limit",
        ErrorCode::LimitUser => "Daily limit reached. Try again tomorrow.",
        ErrorCode::LimitGuest => "Guest limit reached. Please sign up to continue!",
        ErrorCode::ApiKey => "Missing API Key",
        ErrorCode::AiEmpty => "Empty response from AI",
        ErrorCode::DbUrl => "Missing DATABASE_URL",
        ErrorCode::StorageFail => "Storage upload failed",
        ErrorCode::ProcessFail => "Failed to process outfit",
        ErrorCode::Unauthorized => "Unauthorized",
        ErrorCode::Forbidden => "Unauthorized to delete this scan",
        ErrorCode::NotFound => "Scan not found",
    }
}

fn spanish_message(code: ErrorCode) -> Option<&'static str> {
    match code {
        ErrorCode::StorageConfig => Some("Configuración de almacenamiento faltante"),
        ErrorCode::InvalidJson => Some("JSON inválido"),
        ErrorCode::NoImage => Some("No se proporcionó ninguna imagen"),
        ErrorCode::NoRequestText => Some("Falta la imagen o el texto"),
        ErrorCode::ImageTooLarge => Some("La imagen excede el límite de 6 MB"),
        ErrorCode::LimitUser => Some("Límite diario alcanzado. Intenta de nuevo mañana."),
        ErrorCode::LimitGuest => Some("¡Límite de invitado alcanzado! Regístrate para continuar."),
        ErrorCode::ApiKey => Some("Falta la clave de API"),
        ErrorCode::AiEmpty => Some("Respuesta vacía de la IA"),
        ErrorCode::DbUrl => Some("Falta DATABASE_URL"),
        ErrorCode::StorageFail => Some("Error al subir al almacenamiento"),
        ErrorCode::ProcessFail => Some("Error al procesar el outfit"),
        ErrorCode::Unauthorized => Some("No autorizado"),
        ErrorCode::Forbidden => Some("No autorizado para eliminar este escaneo"),
        ErrorCode::NotFound => Some("Escaneo no encontrado"),
    }
}
