pub mod corpus;
pub mod modality;
pub mod record;
pub mod session;
mod util;

pub use corpus::{Corpus, SkippedRecord, TraceSource};
pub use modality::{Classifier, Modality, ToolType, classify_tool};
pub use record::ActionRecord;
pub use session::Session;
pub use util::{estimate_tokens, extract_file_references, parse_timestamp, short_digest};
