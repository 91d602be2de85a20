//! Enumerated domain values shared by forms and records.
//!
//! Wire and storage values are the lowercase snake_case strings the backend
//! uses (`multiple_choice`, `published`, ...).

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $t:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $t {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $t {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$t] = &[ $( $t::$variant ),+ ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $t::$variant => $wire ),+
                }
            }

            /// Wire strings of every variant, in declaration order.
            pub fn wire_values() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok($t::$variant), )+
                    other => Err(DomainError::unknown_variant($kind, other)),
                }
            }
        }
    };
}

wire_enum! {
    /// Publication state of a course.
    CourseStatus, "course status" {
        Draft => "draft",
        Published => "published",
        Archived => "archived",
    }
}

wire_enum! {
    /// Difficulty level advertised for a course.
    CourseLevel, "course level" {
        Beginner => "beginner",
        Intermediate => "intermediate",
        Advanced => "advanced",
    }
}

wire_enum! {
    /// Kind of content a lesson carries.
    LessonType, "lesson type" {
        Video => "video",
        Document => "document",
        Quiz => "quiz",
        Assignment => "assignment",
    }
}

wire_enum! {
    QuizType, "quiz type" {
        MultipleChoice => "multiple_choice",
        TrueFalse => "true_false",
        ShortAnswer => "short_answer",
    }
}

wire_enum! {
    /// Account state managed by administrators.
    UserStatus, "user status" {
        Active => "active",
        Inactive => "inactive",
        /// Suspended accounts cannot sign in.
        Suspended => "suspended",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&QuizType::MultipleChoice).unwrap();
        assert_eq!(json, "\"multiple_choice\"");

        let level: CourseLevel = serde_json::from_str("\"intermediate\"").unwrap();
        assert_eq!(level, CourseLevel::Intermediate);
    }

    #[test]
    fn from_str_matches_serde_names() {
        for status in UserStatus::ALL {
            assert_eq!(status.as_str().parse::<UserStatus>().unwrap(), *status);
        }
        for kind in LessonType::ALL {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn unknown_wire_value_names_the_kind() {
        let err = "expert".parse::<CourseLevel>().unwrap_err();
        assert_eq!(err.to_string(), "unknown course level 'expert'");
    }

    #[test]
    fn wire_values_are_in_declaration_order() {
        assert_eq!(
            CourseStatus::wire_values(),
            vec!["draft", "published", "archived"]
        );
    }
}
