/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Maximum number of characters accepted in a post body
pub const MAX_POST_CONTENT_CHARS: usize = 450;

// Column widths of the users table
pub const MAX_NAME_CHARS: usize = 45;
pub const MAX_NICKNAME_CHARS: usize = 45;
pub const MAX_PHONE_CHARS: usize = 20;
pub const MAX_EMAIL_CHARS: usize = 100;

/// Lifecycle status stored in every `status` column (TEXT, 'ACTIVE' | 'INACTIVE')
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Active,
    Inactive, // soft-deleted, hidden from active queries
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "ACTIVE",
            Status::Inactive => "INACTIVE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ACTIVE" => Some(Status::Active),
            "INACTIVE" => Some(Status::Inactive),
            _ => None,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of characters (not bytes) in a piece of user text
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
