use std::{fmt, str::FromStr};

use compact_str::CompactString;

use crate::error::AppError;

/// Screen addresses, printed and parsed as URL-like paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Documents,
    Document(CompactString),
    Counterparties,
    Invitations,
    AddDocument,
}

impl Route {
    /// Sidebar entry highlighted while this route is shown.
    pub fn menu_section(&self) -> MenuSection {
        match self {
            Self::Documents | Self::Document(_) | Self::AddDocument => MenuSection::Documents,
            Self::Counterparties | Self::Invitations => MenuSection::Counterparties,
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Self::Documents => "Документы",
            Self::Document(_) => "Документ",
            Self::Counterparties => "Контрагенты",
            Self::Invitations => "Приглашения вас",
            Self::AddDocument => "Добавить документ",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Documents => f.write_str("/"),
            Self::Document(id) => write!(f, "/document/{id}"),
            Self::Counterparties => f.write_str("/counterparties"),
            Self::Invitations => f.write_str("/invitations"),
            Self::AddDocument => f.write_str("/add-document"),
        }
    }
}

impl FromStr for Route {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let path = trimmed.trim_end_matches('/');

        let route = match path {
            "" => Self::Documents,
            "/counterparties" => Self::Counterparties,
            "/invitations" => Self::Invitations,
            "/add-document" => Self::AddDocument,
            _ => match path.strip_prefix("/document/") {
                Some(id) if !id.is_empty() && !id.contains('/') => Self::Document(id.into()),
                _ => return Err(AppError::UnknownRoute(trimmed.to_string())),
            },
        };
        Ok(route)
    }
}

/// Top-level sidebar menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuSection {
    Documents,
    Counterparties,
    Profile,
    Tariffs,
}

impl MenuSection {
    pub const ALL: [Self; 4] = [
        Self::Documents,
        Self::Counterparties,
        Self::Profile,
        Self::Tariffs,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Documents => "Документы",
            Self::Counterparties => "Контрагенты",
            Self::Profile => "Профиль компании",
            Self::Tariffs => "Тарифы",
        }
    }

    /// Screen opened from the menu; profile and tariffs have none.
    pub fn route(self) -> Option<Route> {
        match self {
            Self::Documents => Some(Route::Documents),
            Self::Counterparties => Some(Route::Counterparties),
            Self::Profile | Self::Tariffs => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_screen() {
        let cases = [
            ("/", Route::Documents),
            ("/document/42", Route::Document("42".into())),
            ("/counterparties", Route::Counterparties),
            ("/invitations/", Route::Invitations),
            ("/add-document", Route::AddDocument),
        ];
        for (path, route) in cases {
            assert_eq!(path.parse::<Route>().ok(), Some(route.clone()), "{path}");
        }
    }

    #[test]
    fn display_is_parseable() {
        for route in [
            Route::Documents,
            Route::Document("9".into()),
            Route::Counterparties,
            Route::Invitations,
            Route::AddDocument,
        ] {
            assert_eq!(route.to_string().parse::<Route>().ok(), Some(route));
        }
    }

    #[test]
    fn rejects_unknown_paths() {
        for bad in ["/tariffs", "/document/", "/document/1/edit", "documents"] {
            assert!(matches!(bad.parse::<Route>(), Err(AppError::UnknownRoute(_))), "{bad}");
        }
    }
}
