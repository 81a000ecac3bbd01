pub mod gateway;
pub mod kotlin;
pub mod language;
pub mod liquid;
pub mod policy;
pub mod swift;
pub mod walker;

pub use gateway::ParserGateway;
pub use language::LanguageId;