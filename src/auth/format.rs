//! Stored secret classification
//!
//! A stored secret is either a scheme-tagged hash or legacy plain text. The
//! classification is made once here and consumed everywhere by matching on
//! [`SecretFormat`].

/// Hash schemes recognised by their leading tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    Bcrypt2a,
    Bcrypt2b,
    Bcrypt2y,
}

impl HashScheme {
    pub const ALL: [HashScheme; 3] = [
        HashScheme::Bcrypt2a,
        HashScheme::Bcrypt2b,
        HashScheme::Bcrypt2y,
    ];

    /// The prefix that identifies this scheme in a stored secret
    pub fn tag(self) -> &'static str {
        match self {
            HashScheme::Bcrypt2a => "$2a$",
            HashScheme::Bcrypt2b => "$2b$",
            HashScheme::Bcrypt2y => "$2y$",
        }
    }
}

/// Storage format of a secret, borrowing the stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretFormat<'a> {
    Hashed { scheme: HashScheme, value: &'a str },
    PlainText(&'a str),
}

impl<'a> SecretFormat<'a> {
    /// Classifies a stored secret by its scheme tag.
    ///
    /// Anything without a recognised tag, including the empty string, is plain text.
    pub fn classify(stored: &'a str) -> Self {
        HashScheme::ALL
            .into_iter()
            .find(|scheme| stored.starts_with(scheme.tag()))
            .map(|scheme| SecretFormat::Hashed {
                scheme,
                value: stored,
            })
            .unwrap_or(SecretFormat::PlainText(stored))
    }

    pub fn is_hashed(&self) -> bool {
        matches!(self, SecretFormat::Hashed { .. })
    }
}
