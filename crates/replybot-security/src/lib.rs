pub mod allowlist;
pub mod validation;

pub use allowlist::{Allowlist, AllowlistMode};
pub use validation::TokenValidator;
