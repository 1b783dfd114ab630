pub mod category;
pub mod columns;
pub mod config;
pub mod encoding;
pub mod markup;
pub mod pipeline;
pub mod price;
pub mod score;
pub mod seo;
pub mod stock;
pub mod text;

pub use config::{ConfigError, PipelineConfig, RepairConfig, ScoreWeights, SeoConfig};
pub use encoding::{repair, SingleByteEncoding};
pub use markup::strip;
pub use pipeline::{process_batch, process_row, Pipeline, ProcessedRow, RowError};
pub use score::score;
pub use seo::{synthesize, SeoFields};
pub use stock::classify;
pub use text::normalize;
