/// Session context handed to the form at construction. There is no global
/// user state: whoever builds the form decides who is signed in.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user: Option<SessionUser>,
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SessionUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }
}

impl SessionUser {
    /// "prenom nom", trimmed when either part is empty.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
