mod client;
mod errors;
mod query;
mod user_agent;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::query::DayQuery;
