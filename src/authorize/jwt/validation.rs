use std::collections::HashSet;

use jsonwebtoken::{Algorithm, Validation as JsonWebTokenValidation};

/// What a token must satisfy besides a valid signature.
///
/// Refer to the [`Validation`](jsonwebtoken::Validation) struct from the [`jsonwebtoken`] crate for more information.
#[derive(Debug, Clone)]
pub struct Validation {
    algorithms: Vec<Algorithm>,
    required_spec_claims: HashSet<String>,
    aud: Option<HashSet<String>>,
    iss: Option<HashSet<String>>,
}

impl Default for Validation {
    fn default() -> Self {
        Self {
            algorithms: vec![Algorithm::RS256],
            required_spec_claims: ["exp", "iss", "aud"].into_iter().map(Into::into).collect(),
            aud: None,
            iss: None,
        }
    }
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issuer and audience as the identity provider issues them for an API.
    pub fn for_provider(domain: &str, audience: &str) -> Self {
        Self::new().iss(&[issuer_for(domain)]).aud(&[audience])
    }

    pub fn algorithms(mut self, algorithms: Vec<Algorithm>) -> Self {
        self.algorithms = algorithms;
        self
    }

    pub fn aud<T: ToString>(mut self, aud: &[T]) -> Self {
        self.aud = Some(aud.iter().map(|a| a.to_string()).collect());
        self
    }

    pub fn iss<T: ToString>(mut self, iss: &[T]) -> Self {
        self.iss = Some(iss.iter().map(|i| i.to_string()).collect());
        self
    }

    pub fn accepts(&self, algorithm: Algorithm) -> bool {
        self.algorithms.contains(&algorithm)
    }

    pub fn to_jsonwebtoken_validation(&self) -> JsonWebTokenValidation {
        let mut validation = JsonWebTokenValidation::new(Algorithm::RS256);

        validation.algorithms = self.algorithms.clone();
        validation.required_spec_claims = self.required_spec_claims.clone();
        // No clock skew allowance.
        validation.leeway = 0;

        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.validate_aud = self.aud.is_some();

        validation.aud = self.aud.clone();
        validation.iss = self.iss.clone();

        validation
    }
}

/// The identity provider signs its tokens as `https://<domain>/`.
pub fn issuer_for(domain: &str) -> String {
    format!("https://{domain}/")
}
