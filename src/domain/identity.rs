/// Opaque session credential bound to one [`Identity`] at issuance.
///
/// Exactly one token is live per client process; it is written once at login
/// and cleared once at logout or on server-side rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The authenticated user's profile record.
///
/// `id`, `username` and `phone` are immutable after registration;
/// `display_name`, `position`, `department` and the avatar are mutable by the
/// owning identity only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub phone: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub avatar_initials: String,
    pub avatar_url: Option<String>,
    pub online: bool,
}

/// An authenticated session: the token plus the identity it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub identity: Identity,
}

impl Session {
    pub fn new(token: SessionToken, identity: Identity) -> Self {
        Self { token, identity }
    }

    /// Replaces the identity wholesale with a server-confirmed record.
    ///
    /// Profile updates never patch individual fields; the last confirmed
    /// response wins on the whole object.
    pub fn merge_identity(&mut self, confirmed: Identity) {
        self.identity = confirmed;
    }
}

/// Derives avatar initials: upper-cased first letters of the first two name
/// words, falling back to the first two characters of a single word.
pub fn make_initials(display_name: &str) -> String {
    let mut words = display_name.split_whitespace();
    match (words.next(), words.next()) {
        (Some(first), Some(second)) => first
            .chars()
            .take(1)
            .chain(second.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect(),
        (Some(only), None) => only.chars().take(2).flat_map(char::to_uppercase).collect(),
        _ => "??".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(display_name: &str) -> Identity {
        Identity {
            id: 1,
            username: "9001234567".to_owned(),
            display_name: display_name.to_owned(),
            phone: "+79001234567".to_owned(),
            position: None,
            department: None,
            avatar_initials: make_initials(display_name),
            avatar_url: None,
            online: true,
        }
    }

    #[test]
    fn initials_take_first_letters_of_two_words() {
        assert_eq!(make_initials("Иван Петров"), "ИП");
        assert_eq!(make_initials("anna schmidt"), "AS");
    }

    #[test]
    fn initials_fall_back_to_two_chars_of_single_word() {
        assert_eq!(make_initials("Иван"), "ИВ");
    }

    #[test]
    fn initials_for_empty_name_are_placeholder() {
        assert_eq!(make_initials("   "), "??");
    }

    #[test]
    fn merge_identity_replaces_the_whole_record() {
        let mut session = Session::new(SessionToken::new("t0ken"), identity("Иван Петров"));
        let mut confirmed = identity("Иван Петров");
        confirmed.position = Some("Финансовый директор".to_owned());
        confirmed.department = Some("Финансы".to_owned());

        session.merge_identity(confirmed.clone());

        assert_eq!(session.identity, confirmed);
        assert_eq!(session.token.as_str(), "t0ken");
    }
}
