//! Line-oriented parsing of credential and role files.
//!
//! ```text
//! #$REALM_NAME=realm$
//! anil=anilPwd
//! marcus=marcusPwd
//! ```
//!
//! Each record line splits on its first `=`. Whitespace around the key and
//! before the value is dropped; trailing whitespace is part of the value.
//! Lines starting with `#` or `!` are comments, except that a realm header on the first non-blank line of a
//! credential file sets the realm.

use usersroles_core::{Principal, Realm, RecordSource, StoreError, StoreResult};

use crate::roles::{RoleSet, split_roles};

/// One `principal=secret` line of a credential file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub principal: Principal,
    pub secret: String,
    /// 1-based source line.
    pub line: usize,
}

/// One `principal=role1,role2` line of a role file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    pub principal: Principal,
    pub roles: RoleSet,
    pub line: usize,
}

/// Parsed credential file: resolved realm plus records in file order.
///
/// Records are kept in order, duplicates included; consumers apply them
/// top to bottom so a later line for the same principal wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUsers {
    pub realm: Realm,
    pub records: Vec<CredentialRecord>,
}

/// Parse a credential file.
///
/// The realm is taken from a header on the first non-blank line; otherwise
/// `default_realm` is used, or the empty realm.
pub fn parse_users(text: &str, default_realm: Option<&Realm>) -> StoreResult<ParsedUsers> {
    let mut header_realm = None;
    let mut records = Vec::new();
    let mut seen_content = false;

    for (line, key, value) in record_lines(text, RecordSource::Users, |content| {
        let first = !seen_content;
        seen_content = true;
        if first {
            if let Some(realm) = Realm::from_header_line(content) {
                header_realm = Some(realm);
                return true;
            }
        }
        false
    })? {
        if value.is_empty() {
            return Err(StoreError::parse(RecordSource::Users, line, "empty secret"));
        }
        records.push(CredentialRecord {
            principal: Principal::new(key),
            secret: value.to_string(),
            line,
        });
    }

    let realm = header_realm
        .or_else(|| default_realm.cloned())
        .unwrap_or_default();

    Ok(ParsedUsers { realm, records })
}

/// Parse a role file. A principal with an empty value holds no roles.
pub fn parse_roles(text: &str) -> StoreResult<Vec<RoleRecord>> {
    Ok(record_lines(text, RecordSource::Roles, |_| false)?
        .into_iter()
        .map(|(line, key, value)| RoleRecord {
            principal: Principal::new(key),
            roles: split_roles(value),
            line,
        })
        .collect())
}

/// Split `text` into `(line, key, value)` triples.
///
/// `intercept` sees every non-blank line before comment handling and returns
/// true to consume it.
fn record_lines<'a, F>(
    text: &'a str,
    source: RecordSource,
    mut intercept: F,
) -> StoreResult<Vec<(usize, &'a str, &'a str)>>
where
    F: FnMut(&str) -> bool,
{
    let mut out = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.trim_start();

        if content.is_empty() || intercept(content.trim_end()) {
            continue;
        }
        if content.starts_with('#') || content.starts_with('!') {
            continue;
        }

        let (key, value) = content
            .split_once('=')
            .ok_or_else(|| StoreError::parse(source, line, "missing '=' separator"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(StoreError::parse(source, line, "empty principal"));
        }

        out.push((line, key, value.trim_start()));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;

    #[test]
    fn realm_header_is_extracted_and_skipped() {
        let parsed = parse_users("#$REALM_NAME=realm$\nanil=anilPwd\nmarcus=marcusPwd", None).unwrap();
        assert_eq!(parsed.realm, Realm::new("realm"));
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].principal, Principal::new("anil"));
        assert_eq!(parsed.records[0].secret, "anilPwd");
        assert_eq!(parsed.records[0].line, 2);
    }

    #[test]
    fn header_after_leading_blank_lines_counts_as_first() {
        let parsed = parse_users("\n   \n#$REALM_NAME=realm$\nanil=anilPwd", None).unwrap();
        assert_eq!(parsed.realm, Realm::new("realm"));
        assert_eq!(parsed.records[0].line, 4);
    }

    #[test]
    fn header_beyond_first_line_is_a_comment() {
        let parsed = parse_users("anil=anilPwd\n#$REALM_NAME=realm$", None).unwrap();
        assert!(parsed.realm.is_default());
        assert_eq!(parsed.records.len(), 1);
    }

    #[test]
    fn missing_header_falls_back_to_default_realm() {
        let fallback = Realm::new("ApplicationRealm");
        let parsed = parse_users("anil=anilPwd", Some(&fallback)).unwrap();
        assert_eq!(parsed.realm, fallback);

        let parsed = parse_users("anil=anilPwd", None).unwrap();
        assert!(parsed.realm.is_default());
    }

    #[test]
    fn header_wins_over_default_realm() {
        let fallback = Realm::new("ApplicationRealm");
        let parsed = parse_users("#$REALM_NAME=realm$\nanil=anilPwd", Some(&fallback)).unwrap();
        assert_eq!(parsed.realm, Realm::new("realm"));
    }

    #[test]
    fn value_splits_on_first_equals_only() {
        let parsed = parse_users("anil=kAuw+Og/P2L8cLHz0miZrA==", None).unwrap();
        assert_eq!(parsed.records[0].secret, "kAuw+Og/P2L8cLHz0miZrA==");
    }

    #[test]
    fn trailing_whitespace_belongs_to_the_secret() {
        let parsed = parse_users("anil = pwd  \r\nmarcus=\tmarcusPwd", None).unwrap();
        assert_eq!(parsed.records[0].principal, Principal::new("anil"));
        assert_eq!(parsed.records[0].secret, "pwd  ");
        assert_eq!(parsed.records[1].secret, "marcusPwd");
    }

    #[test]
    fn whitespace_only_secret_is_empty() {
        let err = parse_users("anil=   ", None).unwrap_err();
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn duplicates_are_kept_in_file_order() {
        let parsed = parse_users("anil=first\nanil=second", None).unwrap();
        let secrets: Vec<&str> = parsed.records.iter().map(|r| r.secret.as_str()).collect();
        assert_eq!(secrets, vec!["first", "second"]);
    }

    #[test]
    fn comments_are_skipped() {
        let parsed = parse_users("# users\n! legacy comment\nanil=anilPwd", None).unwrap();
        assert_eq!(parsed.records.len(), 1);
    }

    #[test]
    fn malformed_line_reports_its_number() {
        let err = parse_users("#$REALM_NAME=realm$\nanil=anilPwd\nmarcus\n", None).unwrap_err();
        assert_eq!(err.line(), Some(3));

        let err = parse_users("=secret", None).unwrap_err();
        assert_eq!(err.line(), Some(1));

        let err = parse_users("anil=", None).unwrap_err();
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn roles_are_split_into_sets() {
        let records = parse_roles("anil=gooduser\nmarcus=testRole, other ,testRole\nnobody=").unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].roles.contains(&Role::new("gooduser")));
        assert_eq!(records[1].roles.len(), 2);
        assert!(records[2].roles.is_empty());
    }

    #[test]
    fn role_file_has_no_realm_header() {
        let records = parse_roles("#$REALM_NAME=realm$\nanil=gooduser").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line, 2);
    }

    #[test]
    fn malformed_role_line_fails() {
        let err = parse_roles("anil=gooduser\nmarcus testRole").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Parse {
                source_kind: RecordSource::Roles,
                line: 2,
                ..
            }
        ));
    }
}
