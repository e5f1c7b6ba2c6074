//! Section visibility as a pure function of the session.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Welcome,
    Login,
    Register,
    LanguageSelection,
    Dashboard,
    Tasks,
    Vocab,
    Quiz,
    Assignments,
}

impl Section {
    pub const AUTH: [Section; 3] = [Section::Welcome, Section::Login, Section::Register];
    pub const MAIN: [Section; 5] = [
        Section::Dashboard,
        Section::Tasks,
        Section::Vocab,
        Section::Quiz,
        Section::Assignments,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Welcome => "Welcome",
            Section::Login => "Sign in",
            Section::Register => "Create account",
            Section::LanguageSelection => "Choose a language",
            Section::Dashboard => "Dashboard",
            Section::Tasks => "Tasks",
            Section::Vocab => "Vocabulary",
            Section::Quiz => "Quiz",
            Section::Assignments => "Assignments",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visibility {
    sections: BTreeSet<Section>,
    pub logout: bool,
}

impl Visibility {
    pub fn is_visible(&self, section: Section) -> bool {
        self.sections.contains(&section)
    }

    pub fn sections(&self) -> impl Iterator<Item = Section> + '_ {
        self.sections.iter().copied()
    }
}

pub fn visibility(authenticated: bool, has_language: bool) -> Visibility {
    let sections: BTreeSet<Section> = match (authenticated, has_language) {
        (false, _) => Section::AUTH.into_iter().collect(),
        (true, false) => [Section::LanguageSelection].into_iter().collect(),
        (true, true) => Section::MAIN.into_iter().collect(),
    };

    Visibility {
        sections,
        logout: authenticated,
    }
}

/// Which of the three auth sections is in front while signed out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthPane {
    #[default]
    Welcome,
    Login,
    Register,
}

impl AuthPane {
    pub fn section(&self) -> Section {
        match self {
            AuthPane::Welcome => Section::Welcome,
            AuthPane::Login => Section::Login,
            AuthPane::Register => Section::Register,
        }
    }
}
