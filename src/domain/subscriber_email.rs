use std::fmt;

use validator::ValidateEmail;

/// Width of the `subscribers.email` column.
const MAX_EMAIL_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(s: String) -> Result<Self, String> {
        if !s.validate_email() || !is_dot_atom_address(&s) {
            return Err("Invalid email address".into());
        }
        if s.chars().count() > MAX_EMAIL_LENGTH {
            return Err("Email address is too long".into());
        }
        Ok(Self(s))
    }
}

/// Tightens `validate_email` to dot-atom addresses on a dotted host name.
///
/// Rejects quoted local parts, stray dots in the local part, single-label domains and
/// address literals such as `[127.0.0.1]`.
fn is_dot_atom_address(s: &str) -> bool {
    let Some((local, domain)) = s.rsplit_once('@') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && !local.contains('"');

    let labels: Vec<&str> = domain.split('.').collect();
    let domain_ok = labels.len() >= 2
        && labels.iter().all(|label| is_host_label(label))
        && labels
            .last()
            .is_some_and(|tld| !tld.chars().all(|c| c.is_ascii_digit()));

    local_ok && domain_ok
}

fn is_host_label(label: &str) -> bool {
    !label.is_empty()
        && label.chars().count() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_alphanumeric() || c == '-')
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for SubscriberEmail {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        SubscriberEmail::parse(value)
    }
}
