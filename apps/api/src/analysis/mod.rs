// Analysis Client: builds the analysis prompt, calls the model backend once,
// and shapes the answer. All model access goes through llm_client.

pub mod analyzer;
pub mod failure;
pub mod form;
pub mod grounding;
pub mod handlers;
