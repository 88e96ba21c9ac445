//! Word-frequency core: tokenizer, chunked aggregation, result cache and the
//! pure dashboard state machine.
mod cache;
mod effect;
mod frequency;
mod msg;
mod policy;
mod run;
mod state;
mod summary;
mod tokenize;
mod update;
mod view_model;

pub use cache::ResultCache;
pub use effect::Effect;
pub use frequency::{count_chunk, FrequencyTable};
pub use msg::Msg;
pub use policy::{
    ChunkPolicy, PolicyError, DEFAULT_INITIAL_CHUNK, DEFAULT_MAX_CHUNK, DEFAULT_MIN_CHUNK,
    DEFAULT_TARGET_LATENCY,
};
pub use run::{ChunkRequest, Run, RunError, RunId, RunPhase, RunStep};
pub use state::AppState;
pub use summary::{format_result, summarize, AnalysisResult, Extreme, Summary, NO_WORDS_TEXT};
pub use tokenize::tokenize;
pub use update::update;
pub use view_model::{AppViewModel, Outcome};
