pub mod config;
pub mod gateway;
pub mod search;

pub use config::{GatewayConfig, GatewaySettings};
pub use gateway::PortfolioGateway;
pub use search::{SearchAsYouType, SearchOutcome};
