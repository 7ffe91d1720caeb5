// Résumé audit: untrusted extractor output in, deterministic scored result out.
// Only `gateway` talks to the model (through llm_client); everything from
// `extraction` to `reconciler` is synchronous and side-effect free.

pub mod extraction;
pub mod feedback;
pub mod gateway;
pub mod handlers;
pub mod prompts;
pub mod reconciler;
pub mod scoring;
pub mod signals;
pub mod status;
