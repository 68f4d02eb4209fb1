use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::RelayError,
    summarize::sanitize::{
        BACK_TRANSLATE_DEFAULT, MAX_TEXT_CHARS, MAX_TOKENS, REPEAT_PENALTY, TEMPERATURE, TOP_K,
        TOP_P, clamp_or_min, coerce_float, coerce_int, truthy,
    },
};

/// A sanitized summarization request, ready to forward upstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummarizeRequest {
    pub text: String,
    pub max_tokens: i64,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: i64,
    pub repeat_penalty: f64,
    pub back_translate: bool,
    /// Members we don't recognize are forwarded as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SummarizeRequest {
    /// Applies defaults, coercion and clamping, then validates `text`.
    pub fn from_json(payload: Value) -> Result<Self, RelayError> {
        let Value::Object(mut fields) = payload else {
            return Err(RelayError::BadRequest("JSON body must be an object".into()));
        };

        let max_tokens = match fields.remove("max_tokens") {
            Some(v) => clamp_or_min(coerce_int(&v), &MAX_TOKENS),
            None => MAX_TOKENS.default,
        };
        let temperature = match fields.remove("temperature") {
            Some(v) => clamp_or_min(coerce_float(&v), &TEMPERATURE),
            None => TEMPERATURE.default,
        };
        let top_p = match fields.remove("top_p") {
            Some(v) => clamp_or_min(coerce_float(&v), &TOP_P),
            None => TOP_P.default,
        };
        let top_k = match fields.remove("top_k") {
            Some(v) => clamp_or_min(coerce_int(&v), &TOP_K),
            None => TOP_K.default,
        };
        let repeat_penalty = match fields.remove("repeat_penalty") {
            Some(v) => clamp_or_min(coerce_float(&v), &REPEAT_PENALTY),
            None => REPEAT_PENALTY.default,
        };
        let back_translate = fields
            .remove("back_translate")
            .map_or(BACK_TRANSLATE_DEFAULT, |v| truthy(&v));

        let text = match fields.remove("text") {
            Some(Value::String(text)) if !text.trim().is_empty() => text,
            _ => return Err(RelayError::EmptyText),
        };
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(RelayError::TextTooLong);
        }

        Ok(Self {
            text,
            max_tokens,
            temperature,
            top_p,
            top_k,
            repeat_penalty,
            back_translate,
            extra: fields,
        })
    }
}
