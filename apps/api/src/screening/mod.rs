// Screening pipeline: document text → model call → parsed record → category
// → cache, plus the export/shortlist surfaces over cached results.
// All LLM calls go through llm_client — no direct Anthropic SDK calls here.

pub mod export;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
