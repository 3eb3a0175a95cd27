mod key;
mod models;

pub use key::RateKey;
pub use models::RateRecord;
