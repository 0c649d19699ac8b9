pub mod accounts;
pub mod api_keys;
pub mod overview;
pub mod partners;

pub use accounts::SearchAccountsUseCase;
pub use api_keys::{IssueApiKeyUseCase, RevokeApiKeyUseCase, VerifyApiKeyUseCase};
pub use overview::{Overview, OverviewUseCase, PlatformStatus};
pub use partners::ManagePartnersUseCase;
