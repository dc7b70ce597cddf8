pub mod gateway;

pub use gateway::{GatewayOutcome, RecommendationGateway};
