//! Typed allow-list of filterable fields.
//!
//! Callers hand in loosely typed `(key, value)` pairs (query strings, CLI
//! flags). [`Filter::parse`] resolves each key against the closed
//! [`FilterField`] set and parses the value for that field's type. Pairs that
//! do not resolve are dropped with a warning rather than failing the query.

/// How a header column is compared against the filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Equals,
    /// Case-insensitive `%value%` match.
    Substring,
}

/// Type of value a field expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Bool,
}

/// Every field a game query may be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Id,
    Title,
    Description,
    ReleaseDate,
    Genre,
    Cloud,
    SeriesX,
    XboxOne,
    Windows,
    CrossplatMultiplayer,
    CrossplatCoop,
    Favorite,
    /// Keeps games with at least one player mode of this name.
    Mode,
}

impl FilterField {
    pub const ALL: [FilterField; 13] = [
        Self::Id,
        Self::Title,
        Self::Description,
        Self::ReleaseDate,
        Self::Genre,
        Self::Cloud,
        Self::SeriesX,
        Self::XboxOne,
        Self::Windows,
        Self::CrossplatMultiplayer,
        Self::CrossplatCoop,
        Self::Favorite,
        Self::Mode,
    ];

    /// Resolve a caller-supplied key.
    ///
    /// Matching ignores ASCII case, `_` and `-`, so `releaseDate`,
    /// `release_date` and `RELEASEDATE` are the same field. The older key
    /// names `name`, `desc`, `xbone` and `playerType` are accepted too.
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized: String = key
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let field = match normalized.as_str() {
            "id" => Self::Id,
            "title" | "name" => Self::Title,
            "description" | "desc" => Self::Description,
            "releasedate" => Self::ReleaseDate,
            "genre" => Self::Genre,
            "cloud" => Self::Cloud,
            "seriesx" => Self::SeriesX,
            "xboxone" | "xbone" => Self::XboxOne,
            "windows" => Self::Windows,
            "crossplatmultiplayer" => Self::CrossplatMultiplayer,
            "crossplatcoop" => Self::CrossplatCoop,
            "favorite" => Self::Favorite,
            "mode" | "playertype" => Self::Mode,
            _ => return None,
        };
        Some(field)
    }

    /// Header column for this field, or `None` for [`FilterField::Mode`],
    /// which filters through the child table instead.
    pub fn column(self) -> Option<&'static str> {
        match self {
            Self::Id => Some("id"),
            Self::Title => Some("title"),
            Self::Description => Some("description"),
            Self::ReleaseDate => Some("release_date"),
            Self::Genre => Some("genre"),
            Self::Cloud => Some("cloud"),
            Self::SeriesX => Some("series_x"),
            Self::XboxOne => Some("xbox_one"),
            Self::Windows => Some("windows"),
            Self::CrossplatMultiplayer => Some("crossplat_multiplayer"),
            Self::CrossplatCoop => Some("crossplat_coop"),
            Self::Favorite => Some("favorite"),
            Self::Mode => None,
        }
    }

    /// Lowercased copy of the column used for substring matching. SQLite's
    /// `LIKE` folds ASCII only, so the stored copy is folded in Rust.
    pub fn folded_column(self) -> Option<&'static str> {
        match self {
            Self::Title => Some("title_folded"),
            _ => None,
        }
    }

    pub fn match_mode(self) -> MatchMode {
        match self {
            Self::Title => MatchMode::Substring,
            _ => MatchMode::Equals,
        }
    }

    pub fn value_kind(self) -> ValueKind {
        match self {
            Self::Cloud
            | Self::SeriesX
            | Self::XboxOne
            | Self::Windows
            | Self::CrossplatMultiplayer
            | Self::CrossplatCoop
            | Self::Favorite => ValueKind::Bool,
            _ => ValueKind::Text,
        }
    }
}

/// A parsed filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Bool(bool),
}

/// One `(field, value)` restriction on a game query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: FilterField,
    pub value: FilterValue,
}

impl Filter {
    pub fn text(field: FilterField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: FilterValue::Text(value.into()),
        }
    }

    pub fn flag(field: FilterField, value: bool) -> Self {
        Self {
            field,
            value: FilterValue::Bool(value),
        }
    }

    /// Games whose title contains `needle`, ignoring case.
    pub fn title_contains(needle: impl Into<String>) -> Self {
        Self::text(FilterField::Title, needle)
    }

    /// Games that support `mode`.
    pub fn has_mode(mode: impl Into<String>) -> Self {
        Self::text(FilterField::Mode, mode)
    }

    /// Parse a loosely typed pair. Returns `None` for unknown keys and for
    /// values that do not fit the field's type.
    pub fn parse(key: &str, value: &str) -> Option<Self> {
        let Some(field) = FilterField::from_key(key) else {
            tracing::warn!(key, "ignoring filter on unknown field");
            return None;
        };
        match field.value_kind() {
            ValueKind::Text => Some(Self::text(field, value)),
            ValueKind::Bool => match parse_bool(value) {
                Some(b) => Some(Self::flag(field, b)),
                None => {
                    tracing::warn!(key, value, "ignoring filter with non-boolean value");
                    None
                }
            },
        }
    }

    /// Parse every pair, keeping the ones that resolve.
    pub fn parse_pairs<I, K, V>(pairs: I) -> Vec<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        pairs
            .into_iter()
            .filter_map(|(k, v)| Self::parse(k.as_ref(), v.as_ref()))
            .collect()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
