pub mod classifier;
pub mod credentials;
pub mod db;

pub use classifier::HuggingFaceClassifier;
pub use credentials::Argon2CredentialAdapter;
pub use db::DbAdapter;
