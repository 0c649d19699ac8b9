pub mod api_key;
pub mod partner;

pub use api_key::{IssuedKey, NewApiKey, PartnerApiKey};
pub use partner::{NewPartner, Partner, PartnerStatus, UnknownPartnerStatus};
