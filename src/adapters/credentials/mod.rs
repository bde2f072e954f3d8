//! Credential providers for `get_password`

pub mod env;
pub mod factory;
pub mod file;
pub mod traits;

pub use env::EnvCredentialProvider;
pub use factory::create_credential_providers;
pub use file::FileCredentialProvider;
pub use traits::CredentialProvider;
