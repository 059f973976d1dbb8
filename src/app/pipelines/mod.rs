pub mod api_pipeline;
pub mod web_pipeline;

pub use api_pipeline::ApiPipeline;
pub use web_pipeline::WebPipeline;
