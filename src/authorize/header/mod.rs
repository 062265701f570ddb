mod bearer_extractor;

pub use bearer_extractor::{BearerExtractor, DefaultBearerExtractor};
