use clap::ValueEnum;
use rigging_config::BundlingStrategy;

/// Bundling strategy override
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum Bundling {
    /// Single self-executing script
    #[value(name = "bundle")]
    Bundle,

    /// Code-split ES modules plus the single bundle
    #[value(name = "dynamic")]
    Dynamic,
}

impl From<Bundling> for BundlingStrategy {
    fn from(value: Bundling) -> Self {
        match value {
            Bundling::Bundle => BundlingStrategy::Bundle,
            Bundling::Dynamic => BundlingStrategy::Dynamic,
        }
    }
}
