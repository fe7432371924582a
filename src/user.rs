/*!
Users: roles and the identity record carried by a logged-in session.
*/
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Parent,
    Accountant,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Teacher,
        Role::Student,
        Role::Parent,
        Role::Accountant,
    ];

    /// Capitalized name for display in badges and headings.
    pub fn title(&self) -> &'static str {
        match self {
            Role::Admin      => "Admin",
            Role::Teacher    => "Teacher",
            Role::Student    => "Student",
            Role::Parent     => "Parent",
            Role::Accountant => "Accountant",
        }
    }

    /// One-line description of what the role can get at.
    pub fn access_summary(&self) -> &'static str {
        match self {
            Role::Admin      => "Full system access",
            Role::Teacher    => "Teaching & class management",
            Role::Student    => "Academic resources",
            Role::Parent     => "Child progress tracking",
            Role::Accountant => "Financial management",
        }
    }

    /// Stylesheet class used to colour the role badge.
    pub fn badge_class(&self) -> &'static str {
        match self {
            Role::Admin      => "badge-red",
            Role::Teacher    => "badge-blue",
            Role::Student    => "badge-green",
            Role::Parent     => "badge-purple",
            Role::Accountant => "badge-yellow",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let token = match self {
            Role::Admin      => "admin",
            Role::Teacher    => "teacher",
            Role::Student    => "student",
            Role::Parent     => "parent",
            Role::Accountant => "accountant",
        };

        write!(f, "{}", token)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin"      => Ok(Role::Admin),
            "teacher"    => Ok(Role::Teacher),
            "student"    => Ok(Role::Student),
            "parent"     => Ok(Role::Parent),
            "accountant" => Ok(Role::Accountant),
            _ => Err(format!("{:?} is not a valid Role.", s)),
        }
    }
}

/**
The authenticated user of a session.

This is what gets written to the record store on login, so the serialized
field names are part of the persisted format.
*/
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    /// Display name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Class the student belongs to. Students only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    /// `id`s of the students this user is responsible for. Parents only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub student_ids: Vec<String>,
}

impl Identity {
    /**
    Check that this `Identity` is internally consistent.

    Required text fields must be nonempty, and the role-specific fields may
    only be present on the roles they belong to.
    */
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("empty id".to_owned());
        }
        if self.username.trim().is_empty() {
            return Err("empty username".to_owned());
        }
        if self.name.trim().is_empty() {
            return Err("empty name".to_owned());
        }
        if self.class_id.is_some() && self.role != Role::Student {
            return Err(format!("class id present on {} record", &self.role));
        }
        if !self.student_ids.is_empty() && self.role != Role::Parent {
            return Err(format!("student ids present on {} record", &self.role));
        }

        Ok(())
    }

    /// Deserialize and validate a persisted identity record.
    pub fn from_record(record: &str) -> Result<Identity, String> {
        let ident: Identity = serde_json::from_str(record)
            .map_err(|e| format!("Unable to deserialize identity record: {}", &e))?;
        ident.validate()
            .map_err(|e| format!("Invalid identity record: {}", &e))?;
        Ok(ident)
    }

    pub fn to_record(&self) -> Result<String, String> {
        serde_json::to_string(self)
            .map_err(|e| format!("Unable to serialize identity {:?}: {}", &self.username, &e))
    }

    /// First letter of each part of the display name ("Bob Parent" => "BP").
    pub fn initials(&self) -> String {
        self.name.split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ensure_logging;

    fn parent() -> Identity {
        Identity {
            id: "4".to_owned(),
            username: "parent1".to_owned(),
            email: "parent@school.com".to_owned(),
            role: Role::Parent,
            name: "Bob Parent".to_owned(),
            phone: Some("+1234567893".to_owned()),
            class_id: None,
            student_ids: vec!["3".to_owned()],
        }
    }

    #[test]
    fn role_tokens() {
        for role in Role::ALL.iter() {
            let token = role.to_string();
            assert_eq!(token.parse::<Role>().unwrap(), *role);
            assert_eq!(token, token.to_lowercase());
        }
        assert!("Admin".parse::<Role>().is_err());
        assert!("janitor".parse::<Role>().is_err());
    }

    #[test]
    fn record_uses_camel_case() {
        ensure_logging();
        let rec = parent().to_record().unwrap();
        log::trace!("parent record: {}", &rec);
        assert!(rec.contains("\"studentIds\":[\"3\"]"));
        assert!(rec.contains("\"role\":\"parent\""));
        assert!(!rec.contains("classId"));
        assert_eq!(Identity::from_record(&rec).unwrap(), parent());
    }

    #[test]
    fn malformed_records() {
        ensure_logging();
        assert!(Identity::from_record("").is_err());
        assert!(Identity::from_record("not json").is_err());
        assert!(Identity::from_record("{}").is_err());
        assert!(Identity::from_record(
            r#"{"id":"9","username":"x","email":"","role":"janitor","name":"X"}"#
        ).is_err());
        assert!(Identity::from_record(
            r#"{"id":"","username":"x","email":"","role":"admin","name":"X"}"#
        ).is_err());
        // Parent-only field on a teacher.
        assert!(Identity::from_record(
            r#"{"id":"2","username":"t","email":"","role":"teacher","name":"T","studentIds":["3"]}"#
        ).is_err());
        // Student-only field on a parent.
        assert!(Identity::from_record(
            r#"{"id":"4","username":"p","email":"","role":"parent","name":"P","classId":"class-1"}"#
        ).is_err());
    }

    #[test]
    fn optional_fields_default() {
        let ident = Identity::from_record(
            r#"{"id":"1","username":"admin","email":"admin@school.com","role":"admin","name":"School Administrator"}"#
        ).unwrap();
        assert_eq!(ident.phone, None);
        assert!(ident.student_ids.is_empty());
        assert_eq!(ident.initials(), "SA");
    }
}
