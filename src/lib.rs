pub mod config;
pub mod error;
pub mod relay;
pub mod server;
pub mod summarize;
pub mod upstream;

pub use config::AppConfig;
pub use error::RelayError;
pub use server::build_router;
pub use summarize::SummarizeRequest;
pub use upstream::UpstreamClient;
