pub mod configuration;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod registry;
pub mod startup;
pub mod utils;
