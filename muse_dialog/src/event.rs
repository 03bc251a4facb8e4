use muse_core::UserId;

/// Entry points reachable from the main menu or a slash command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    RandomFact,
    Chat,
    Talk,
    Quiz,
    Translate,
    Recommend,
}

impl Feature {
    pub const ALL: [Self; 6] = [
        Self::RandomFact,
        Self::Chat,
        Self::Talk,
        Self::Quiz,
        Self::Translate,
        Self::Recommend,
    ];

    /// Command name and token key of the feature.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::RandomFact => "random",
            Self::Chat => "gpt",
            Self::Talk => "talk",
            Self::Quiz => "quiz",
            Self::Translate => "translate",
            Self::Recommend => "recommend",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|feature| feature.key() == key)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RandomFact => "🎲 Random Fact",
            Self::Chat => "🤖 ChatGPT",
            Self::Talk => "👥 Talk to Personality",
            Self::Quiz => "🧠 Quiz",
            Self::Translate => "🌐 Translate",
            Self::Recommend => "🎬 Recommendations",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::RandomFact => "Get a random interesting fact",
            Self::Chat => "Chat with the assistant",
            Self::Talk => "Talk to a famous personality",
            Self::Quiz => "Test your knowledge",
            Self::Translate => "Translate text",
            Self::Recommend => "Get movie and book recommendations",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Cancel,
    Stats,
    Open(Feature),
}

impl Command {
    /// Parse a slash command, accepting any `@botname` suffix and ignoring
    /// anything after the first word.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        Self::parse_addressed(text, None)
    }

    /// Like [`Command::parse`], but when `bot_username` is known a command
    /// addressed to a different bot (`/start@otherbot`) is not ours.
    #[must_use]
    pub fn parse_addressed(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let word = word.strip_prefix('/')?;
        let (name, addressee) = match word.split_once('@') {
            Some((name, addressee)) => (name, Some(addressee)),
            None => (word, None),
        };
        if let (Some(addressee), Some(bot)) = (addressee, bot_username) {
            if !addressee.eq_ignore_ascii_case(bot.trim_start_matches('@')) {
                return None;
            }
        }

        match name.to_lowercase().as_str() {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            "cancel" => Some(Self::Cancel),
            "stats" => Some(Self::Stats),
            other => Feature::from_key(other).map(Self::Open),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Help => "help",
            Self::Cancel => "cancel",
            Self::Stats => "stats",
            Self::Open(feature) => feature.key(),
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Start => "Show the main menu",
            Self::Help => "Show available commands",
            Self::Cancel => "Leave the current activity",
            Self::Stats => "Show your quiz statistics",
            Self::Open(feature) => feature.description(),
        }
    }

    /// Every command in menu order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        let mut commands = vec![Self::Start];
        commands.extend(Feature::ALL.into_iter().map(Self::Open));
        commands.extend([Self::Stats, Self::Cancel, Self::Help]);
        commands
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Command(Command),
    FreeText(String),
    /// A slash command this bot does not handle. Never reaches a flow.
    UnknownCommand(String),
    /// Raw callback data; decoded by the router.
    ButtonPress(String),
}

impl EventKind {
    /// Classify an incoming text message. Anything whose first word starts
    /// with `/` is a command, known or not, and is never flow input.
    #[must_use]
    pub fn from_message(text: &str, bot_username: Option<&str>) -> Self {
        if let Some(command) = Command::parse_addressed(text, bot_username) {
            return Self::Command(command);
        }
        match text.split_whitespace().next() {
            Some(word) if word.starts_with('/') => Self::UnknownCommand(word.to_string()),
            _ => Self::FreeText(text.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub kind: EventKind,
}

impl InboundEvent {
    #[must_use]
    pub const fn new(user_id: UserId, kind: EventKind) -> Self {
        Self {
            user_id,
            display_name: None,
            kind,
        }
    }

    #[must_use]
    pub const fn command(user_id: UserId, command: Command) -> Self {
        Self::new(user_id, EventKind::Command(command))
    }

    #[must_use]
    pub fn text(user_id: UserId, text: impl Into<String>) -> Self {
        Self::new(user_id, EventKind::FreeText(text.into()))
    }

    #[must_use]
    pub fn button(user_id: UserId, data: impl Into<String>) -> Self {
        Self::new(user_id, EventKind::ButtonPress(data.into()))
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}
