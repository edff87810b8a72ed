//! Per-inforequest reply addresses.
//!
//! Every inforequest gets its own address so inbound mail can be routed back
//! to it. Addresses are a short random token rendered through a template such
//! as `{token}@mail.example.org`.

use rand::Rng;

use crate::domain::foundation::ValidationError;

/// Characters that cannot be confused with each other when read aloud or typed.
const READABLE_ALPHABET: &[u8] = b"abcdefghijkmnpqrstuvwxyz23456789";

/// Shortest token tried first.
pub const MIN_TOKEN_LENGTH: usize = 4;

/// Longest token tried before giving up.
pub const MAX_TOKEN_LENGTH: usize = 10;

/// Returns a random token of `length` readable characters.
pub fn random_readable<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| READABLE_ALPHABET[rng.gen_range(0..READABLE_ALPHABET.len())] as char)
        .collect()
}

/// Renders tokens into addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyAddressTemplate {
    template: String,
}

impl ReplyAddressTemplate {
    pub const PLACEHOLDER: &'static str = "{token}";

    pub fn new(template: impl Into<String>) -> Result<Self, ValidationError> {
        let template = template.into();
        if !template.contains(Self::PLACEHOLDER) {
            return Err(ValidationError::invalid_format(
                "unique_email_template",
                "must contain {token}",
            ));
        }
        if !template.contains('@') {
            return Err(ValidationError::invalid_format(
                "unique_email_template",
                "must contain @",
            ));
        }
        Ok(Self { template })
    }

    pub fn render(&self, token: &str) -> String {
        self.template.replace(Self::PLACEHOLDER, token)
    }
}

/// Candidate lengths in the order they are tried; each is attempted a few
/// times before growing.
pub fn candidate_lengths() -> impl Iterator<Item = usize> {
    (MIN_TOKEN_LENGTH..=MAX_TOKEN_LENGTH).flat_map(|len| std::iter::repeat(len).take(3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn token_uses_readable_alphabet_only() {
        let mut rng = StdRng::seed_from_u64(7);
        let token = random_readable(&mut rng, 64);
        assert_eq!(token.len(), 64);
        assert!(token.bytes().all(|b| READABLE_ALPHABET.contains(&b)));
        assert!(!token.contains('0') && !token.contains('l'));
    }

    #[test]
    fn template_requires_placeholder_and_domain() {
        assert!(ReplyAddressTemplate::new("fixed@mail.example.org").is_err());
        assert!(ReplyAddressTemplate::new("{token}").is_err());
        let t = ReplyAddressTemplate::new("{token}@mail.example.org").unwrap();
        assert_eq!(t.render("ab2c"), "ab2c@mail.example.org");
    }

    #[test]
    fn lengths_grow_from_four_to_ten() {
        let lengths: Vec<_> = candidate_lengths().collect();
        assert_eq!(lengths.first(), Some(&4));
        assert_eq!(lengths.last(), Some(&10));
        assert!(lengths.windows(2).all(|w| w[0] <= w[1]));
    }
}
