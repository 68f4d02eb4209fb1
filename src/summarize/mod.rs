mod sanitize;
mod types;

pub use sanitize::{
    BACK_TRANSLATE_DEFAULT, Bounds, MAX_TEXT_CHARS, MAX_TOKENS, REPEAT_PENALTY, TEMPERATURE,
    TOP_K, TOP_P, clamp_or_min, coerce_float, coerce_int, truthy,
};
pub use types::SummarizeRequest;
