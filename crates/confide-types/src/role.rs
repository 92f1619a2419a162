//! Participant roles.
//!
//! The role is the whole access model: a peer whose client identifier equals
//! the configured counselor id is the Counselor, everyone else is a Student.
//! There is no credential check.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Client identifier reserved for the counselor unless configured otherwise.
pub const DEFAULT_COUNSELOR_ID: &str = "1234";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Counselor,
    Student,
}

impl Role {
    /// Derive the role for a client identifier. Exact string match only.
    pub fn for_client(client_id: &str, counselor_id: &str) -> Self {
        if client_id == counselor_id {
            Role::Counselor
        } else {
            Role::Student
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Counselor => "Counselor",
            Role::Student => "Student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Counselor" => Ok(Role::Counselor),
            "Student" => Ok(Role::Student),
            other => Err(format!("invalid role: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counselor_id_maps_to_counselor() {
        assert_eq!(Role::for_client("1234", DEFAULT_COUNSELOR_ID), Role::Counselor);
    }

    #[test]
    fn test_other_ids_map_to_student() {
        for id in ["42", "", "12345", " 1234", "1234 ", "counselor", "0001234"] {
            assert_eq!(
                Role::for_client(id, DEFAULT_COUNSELOR_ID),
                Role::Student,
                "id {id:?} should be a student"
            );
        }
    }

    #[test]
    fn test_custom_counselor_id() {
        assert_eq!(Role::for_client("desk", "desk"), Role::Counselor);
        assert_eq!(Role::for_client("1234", "desk"), Role::Student);
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(Role::Counselor.to_string(), "Counselor");
        assert_eq!(Role::Student.to_string(), "Student");
        assert_eq!("Student".parse::<Role>().unwrap(), Role::Student);
        assert!("student".parse::<Role>().is_err());
    }
}
