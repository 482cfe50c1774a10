// Resume Response Parsing Engine.
// Turns an unstructured block of model-generated text into typed, cleaned
// fields. Everything here is a pure function of text in, value out — no I/O,
// no shared state, safe to call concurrently across documents.

pub mod experience;
pub mod fields;
pub mod normalize;
pub mod phone;

/// Sentinel for a single-value field that could not be extracted.
/// Multi-line fields degrade to the empty string instead.
pub const NOT_AVAILABLE: &str = "N/A";
