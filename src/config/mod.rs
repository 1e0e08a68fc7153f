pub mod dedup;
pub mod env;
pub mod provider;

pub use dedup::DedupConfig;
pub use env::EnvConfig;
pub use provider::ProviderSettings;
