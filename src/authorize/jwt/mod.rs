mod claims;
pub mod jwk_set;
mod token_verifier;
mod validation;

pub use claims::{Audience, Claims};
pub use token_verifier::{JwtVerifier, TokenVerifier};
pub use validation::{issuer_for, Validation};
