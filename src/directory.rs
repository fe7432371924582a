/*!
The account directory that logins are checked against.

Every account in a directory shares one secret. This is demonstration
behavior, not a credential scheme; `Directory::new()` takes the secret so
deployments can at least change it.
*/
use std::collections::HashMap;
use std::io::Read;

use crate::user::{Identity, Role};

pub const DEMO_SECRET: &str = "password";

/// Compare two secrets in time that depends only on their lengths.
fn secrets_match(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[derive(Debug)]
pub struct Directory {
    accounts: HashMap<String, Identity>,
    secret: String,
}

fn demo_account(
    id: &str,
    username: &str,
    email: &str,
    role: Role,
    name: &str,
    phone: &str,
) -> Identity {
    Identity {
        id: id.to_owned(),
        username: username.to_owned(),
        email: email.to_owned(),
        role,
        name: name.to_owned(),
        phone: Some(phone.to_owned()),
        class_id: None,
        student_ids: Vec::new(),
    }
}

/**
Account directory .csv rows should look like this

```csv
#id, username, email,              role,    name,          phone,       class,   dependents
3,   student1, student@school.com, student, Alice Student, +1234567892, class-1,
4,   parent1,  parent@school.com,  parent,  Bob Parent,    +1234567893,        , 3;7
```

Empty `phone` and `class` fields mean "none"; `dependents` is a
semicolon-separated list of student `id`s.
*/
fn identity_from_csv_line(row: &csv::StringRecord) -> Result<Identity, String> {
    log::trace!("identity_from_csv_line( {:?} ) called.", row);

    let field = |n: usize, what: &str| -> Result<String, String> {
        match row.get(n) {
            Some(s) => Ok(s.to_owned()),
            None => Err(format!("no {}", what)),
        }
    };
    let optional = |n: usize| -> Option<String> {
        match row.get(n) {
            Some(s) if !s.is_empty() => Some(s.to_owned()),
            _ => None,
        }
    };

    let role: Role = field(3, "role")?.parse()?;
    let student_ids: Vec<String> = match row.get(7) {
        Some(s) => s.split(';')
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(|id| id.to_owned())
            .collect(),
        None => Vec::new(),
    };

    let ident = Identity {
        id: field(0, "id")?,
        username: field(1, "username")?,
        email: field(2, "email address")?,
        role,
        name: field(4, "name")?,
        phone: optional(5),
        class_id: optional(6),
        student_ids,
    };
    ident.validate()?;
    Ok(ident)
}

impl Directory {
    /// An empty directory whose accounts all use `secret`.
    pub fn new(secret: String) -> Self {
        log::trace!("Directory::new( [ {} byte secret ] ) called.", secret.len());
        Self { accounts: HashMap::new(), secret }
    }

    /// The five built-in demonstration accounts, one per role.
    pub fn demo() -> Self {
        Directory::demo_with_secret(DEMO_SECRET.to_owned())
    }

    /// The demonstration accounts, but sharing `secret`.
    pub fn demo_with_secret(secret: String) -> Self {
        let mut d = Directory::new(secret);

        d.insert(demo_account(
            "1", "admin", "admin@school.com", Role::Admin,
            "School Administrator", "+1234567890",
        ));
        d.insert(demo_account(
            "2", "teacher1", "teacher@school.com", Role::Teacher,
            "John Teacher", "+1234567891",
        ));
        let mut student = demo_account(
            "3", "student1", "student@school.com", Role::Student,
            "Alice Student", "+1234567892",
        );
        student.class_id = Some("class-1".to_owned());
        d.insert(student);
        let mut parent = demo_account(
            "4", "parent1", "parent@school.com", Role::Parent,
            "Bob Parent", "+1234567893",
        );
        parent.student_ids = vec!["3".to_owned()];
        d.insert(parent);
        d.insert(demo_account(
            "5", "accountant", "accountant@school.com", Role::Accountant,
            "Carol Accountant", "+1234567894",
        ));

        d
    }

    pub fn from_csv_reader<R: Read>(r: R, secret: String) -> Result<Directory, String> {
        log::trace!("Directory::from_csv_reader(...) called.");

        let mut csv_reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .flexible(true)
            .has_headers(false)
            .from_reader(r);

        let mut d = Directory::new(secret);

        for (n, res) in csv_reader.records().enumerate() {
            let record = res.map_err(|e| match e.position() {
                Some(p) => format!("Error on line {}: {}", p.line(), &e),
                None => format!("Error in CSV record {}: {}", &n, &e),
            })?;
            let ident = identity_from_csv_line(&record).map_err(|e| {
                match record.position() {
                    Some(p) => format!("Error on line {}: {}", p.line(), &e),
                    None => format!("Error in CSV record {}: {}", &n, &e),
                }
            })?;
            if let Some(old) = d.insert(ident) {
                return Err(format!(
                    "Error in CSV record {}: duplicate username {:?}",
                    &n, &old.username
                ));
            }
        }

        log::trace!(
            "Directory::from_csv_reader() returns {} accounts.",
            d.accounts.len()
        );
        Ok(d)
    }

    /// Adds an account, returning any account it replaces.
    pub fn insert(&mut self, ident: Identity) -> Option<Identity> {
        self.accounts.insert(ident.username.clone(), ident)
    }

    pub fn get(&self, username: &str) -> Option<&Identity> {
        self.accounts.get(username)
    }

    pub fn len(&self) -> usize { self.accounts.len() }

    pub fn is_empty(&self) -> bool { self.accounts.is_empty() }

    pub fn uses_demo_secret(&self) -> bool { self.secret == DEMO_SECRET }

    /**
    Return the matching account if `username` exists and `secret` is the
    directory's secret.

    Unknown users and wrong secrets both just return `None`.
    */
    pub fn authenticate(&self, username: &str, secret: &str) -> Option<Identity> {
        log::trace!("Directory::authenticate( {:?}, [ secret ] ) called.", username);

        // Compared before the lookup so unknown users cost the same.
        let secret_ok = secrets_match(secret, &self.secret);

        match self.accounts.get(username) {
            Some(ident) if secret_ok => Some(ident.clone()),
            Some(_) => {
                log::debug!("Bad secret for {:?}.", username);
                None
            },
            None => {
                log::debug!("No account {:?}.", username);
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ensure_logging;

    #[test]
    fn demo_logins() {
        ensure_logging();
        let d = Directory::demo();
        assert_eq!(d.len(), 5);
        assert!(d.uses_demo_secret());

        let admin = d.authenticate("admin", "password").unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(d.authenticate("admin", "wrong").is_none());
        assert!(d.authenticate("nobody", "password").is_none());

        for (uname, role) in [
            ("teacher1", Role::Teacher),
            ("student1", Role::Student),
            ("parent1", Role::Parent),
            ("accountant", Role::Accountant),
        ] {
            assert_eq!(d.authenticate(uname, DEMO_SECRET).unwrap().role, role);
        }

        assert_eq!(d.get("student1").unwrap().class_id.as_deref(), Some("class-1"));
        assert_eq!(d.get("parent1").unwrap().student_ids, vec!["3".to_owned()]);
    }

    #[test]
    fn secret_comparison() {
        assert!(secrets_match("hunter2", "hunter2"));
        assert!(secrets_match("", ""));
        assert!(!secrets_match("hunter2", "hunter3"));
        assert!(!secrets_match("hunter2", "hunter"));
        assert!(!secrets_match("hunter", "hunter2"));
        assert!(!secrets_match("", "password"));

        let d = Directory::demo_with_secret("hunter2".to_owned());
        assert!(d.authenticate("admin", "hunter2").is_some());
        assert!(d.authenticate("admin", "Hunter2").is_none());
        assert!(d.authenticate("admin", "hunter22").is_none());
        assert!(d.authenticate("admin", "password").is_none());
    }

    #[test]
    fn accounts_from_csv() {
        ensure_logging();
        let f = std::fs::File::open("test/good_accounts_0.csv").unwrap();
        let d = Directory::from_csv_reader(f, "hunter2".to_owned()).unwrap();
        log::trace!("Directory:\n{:#?}", &d);

        assert_eq!(d.len(), 4);
        assert!(!d.uses_demo_secret());
        assert!(d.authenticate("jenny", DEMO_SECRET).is_none());

        let p = d.authenticate("mpark", "hunter2").unwrap();
        assert_eq!(p.role, Role::Parent);
        assert_eq!(p.student_ids, vec!["s-10".to_owned(), "s-11".to_owned()]);
        assert_eq!(p.phone, None);

        let s = d.get("lkim").unwrap();
        assert_eq!(s.class_id.as_deref(), Some("class-2"));
    }

    #[test]
    fn bad_csv_rows() {
        ensure_logging();
        let bad_role = "1, jdoe, jdoe@school.com, janitor, Jane Doe, , ,\n";
        let e = Directory::from_csv_reader(bad_role.as_bytes(), DEMO_SECRET.to_owned())
            .unwrap_err();
        assert!(e.contains("janitor"));

        let dup = "1, jdoe, a@b, admin, Jane Doe, , ,\n2, jdoe, c@d, teacher, Jane Doe, , ,\n";
        let e = Directory::from_csv_reader(dup.as_bytes(), DEMO_SECRET.to_owned())
            .unwrap_err();
        assert!(e.contains("duplicate"));

        let short = "1, jdoe, a@b\n";
        assert!(Directory::from_csv_reader(short.as_bytes(), DEMO_SECRET.to_owned()).is_err());

        let misplaced = "1, jdoe, a@b, teacher, Jane Doe, , class-1,\n";
        assert!(Directory::from_csv_reader(misplaced.as_bytes(), DEMO_SECRET.to_owned()).is_err());
    }
}
