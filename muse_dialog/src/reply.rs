use crate::gateway::FALLBACK_TEXT;
use crate::token::CallbackToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub token: CallbackToken,
}

impl Button {
    pub fn new(label: impl Into<String>, token: CallbackToken) -> Self {
        Self {
            label: label.into(),
            token,
        }
    }
}

/// Rows of inline buttons attached to a reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    pub rows: Vec<Vec<Button>>,
}

impl Menu {
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    #[must_use]
    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        if !buttons.is_empty() {
            self.rows.push(buttons);
        }
        self
    }

    #[must_use]
    pub fn button(self, label: impl Into<String>, token: CallbackToken) -> Self {
        self.row(vec![Button::new(label, token)])
    }

    pub fn tokens(&self) -> impl Iterator<Item = &CallbackToken> {
        self.rows.iter().flatten().map(|button| &button.token)
    }
}

/// One outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Image reference; transports fall back to text when it cannot be sent.
    pub photo: Option<String>,
    pub menu: Option<Menu>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            photo: None,
            menu: None,
        }
    }

    /// The user-facing message for a failed generation.
    #[must_use]
    pub fn apology() -> Self {
        Self::text(FALLBACK_TEXT)
    }

    #[must_use]
    pub fn with_menu(mut self, menu: Menu) -> Self {
        self.menu = Some(menu);
        self
    }

    #[must_use]
    pub fn with_photo(mut self, photo: Option<String>) -> Self {
        self.photo = photo;
        self
    }
}
