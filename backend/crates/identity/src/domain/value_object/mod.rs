pub mod account_status;
pub mod nida_status;
pub mod phone;
pub mod role;

pub use account_status::{AccountStatus, UnknownAccountStatus};
pub use nida_status::{InvalidNidaNumber, NidaNumber, NidaStatus, UnknownNidaStatus};
pub use phone::{PhoneE164, PhoneFormatError};
pub use role::{ROLE_CITIZEN, ROLE_PLATFORM_ADMIN, Role};
