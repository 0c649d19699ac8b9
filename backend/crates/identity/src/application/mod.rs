pub mod bootstrap;
pub mod config;
pub mod current_session;
pub mod login;
pub mod logout;
pub mod register;
pub mod roles;
pub mod session_token;
pub mod update_profile;

pub use bootstrap::{BootstrapAdminUseCase, BootstrapInput, BootstrapOutput};
pub use config::IdentityConfig;
pub use current_session::{CurrentAccount, CurrentSessionUseCase};
pub use login::{LoginInput, LoginOutcome, LoginSuccess, LoginUseCase};
pub use logout::LogoutUseCase;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use roles::ManageRolesUseCase;
pub use update_profile::UpdateProfileUseCase;
