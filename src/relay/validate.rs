//! Inbound submission parsing, escaping and validation.

use serde::{Deserialize, Deserializer};

use crate::dialogue::Answers;
use crate::error::RelayError;

/// Message returned when name or email is unusable.
pub const INVALID_SUBMISSION: &str = "Invalid name or email.";

fn not_provided() -> String {
    "N/A".to_string()
}

// A JSON `null` reads the same as an absent field.
fn null_as_empty<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

fn null_as_not_provided<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(de)?.unwrap_or_else(not_provided))
}

/// A relay request body, as loosely as the site's forms send it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub looking_for: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default = "not_provided", deserialize_with = "null_as_not_provided")]
    pub company: String,
    #[serde(default = "not_provided", deserialize_with = "null_as_not_provided")]
    pub role: String,
    /// The contact form posts its free text as `message`.
    #[serde(default, alias = "message", deserialize_with = "null_as_empty")]
    pub details: String,
}

impl LeadSubmission {
    /// Parse a raw request body. Anything that is not a JSON object reads as an
    /// empty submission, which then fails validation.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice(body) {
            Ok(submission) => submission,
            Err(e) => {
                tracing::debug!(error = %e, "Unparseable relay body");
                Self {
                    company: not_provided(),
                    role: not_provided(),
                    ..Self::default()
                }
            }
        }
    }

    /// Trim every field and check name and email. Text fields are escaped; the
    /// email is kept verbatim since it is used as a mail address.
    pub fn validate(self) -> Result<ValidLead, RelayError> {
        let name = self.name.trim();
        let email = self.email.trim();

        if name.is_empty() || !is_valid_email(email) {
            return Err(RelayError::Invalid(INVALID_SUBMISSION.to_string()));
        }

        Ok(ValidLead {
            looking_for: escape_html(self.looking_for.trim()),
            name: escape_html(name),
            email: email.to_string(),
            company: escape_html(self.company.trim()),
            role: escape_html(self.role.trim()),
            details: escape_html(self.details.trim()),
        })
    }
}

impl From<&Answers> for LeadSubmission {
    fn from(answers: &Answers) -> Self {
        Self {
            looking_for: answers.looking_for.clone(),
            name: answers.name.clone(),
            email: answers.email.clone(),
            company: answers.company.clone(),
            role: answers.role.clone(),
            details: answers.details.clone(),
        }
    }
}

/// A submission that passed validation. Every field is trimmed; all but `email`
/// are HTML-escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLead {
    pub looking_for: String,
    pub name: String,
    pub email: String,
    pub company: String,
    pub role: String,
    pub details: String,
}

/// Whether `email` is a single well-formed mailbox address.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    let dotted_domain =
        domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.');
    !local.is_empty() && dotted_domain && email.parse::<lettre::Address>().is_ok()
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, email: &str) -> LeadSubmission {
        LeadSubmission {
            name: name.into(),
            email: email.into(),
            ..LeadSubmission::from_body(b"{}")
        }
    }

    #[test]
    fn missing_optional_fields_default() {
        let parsed = LeadSubmission::from_body(br#"{"name":"Jane","email":"jane@example.com"}"#);
        assert_eq!(parsed.company, "N/A");
        assert_eq!(parsed.role, "N/A");
        assert_eq!(parsed.looking_for, "");
        assert_eq!(parsed.details, "");
    }

    #[test]
    fn message_is_an_alias_for_details() {
        let parsed = LeadSubmission::from_body(
            br#"{"name":"Jane","email":"jane@example.com","message":"Hello there"}"#,
        );
        assert_eq!(parsed.details, "Hello there");
    }

    #[test]
    fn null_fields_read_as_missing() {
        let parsed = LeadSubmission::from_body(
            br#"{"name":"Jane","email":"jane@example.com","company":null,"role":null,"lookingFor":null,"details":null}"#,
        );
        assert_eq!(parsed.company, "N/A");
        assert_eq!(parsed.role, "N/A");
        assert_eq!(parsed.looking_for, "");
        assert_eq!(parsed.details, "");

        let lead = parsed.validate().unwrap();
        assert_eq!(lead.company, "N/A");
    }

    #[test]
    fn null_name_is_an_invalid_submission() {
        let parsed = LeadSubmission::from_body(br#"{"name":null,"email":"jane@example.com"}"#);
        assert_eq!(parsed.name, "");
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn garbage_body_fails_validation() {
        let parsed = LeadSubmission::from_body(b"not json at all");
        assert_eq!(parsed.company, "N/A");
        let err = parsed.validate().unwrap_err();
        assert_eq!(err.to_string(), INVALID_SUBMISSION);
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(submission("   ", "jane@example.com").validate().is_err());
    }

    #[test]
    fn bad_email_is_rejected() {
        for email in ["", "jane", "jane@", "@example.com", "jane doe@example.com", "N/A"] {
            assert!(
                submission("Jane", email).validate().is_err(),
                "{email:?} should be rejected"
            );
        }
    }

    #[test]
    fn valid_lead_is_trimmed_and_escaped() {
        let lead = LeadSubmission {
            looking_for: " <b>work</b> ".into(),
            name: "  Jane O'Neil ".into(),
            email: " jane@example.com ".into(),
            company: "A & B".into(),
            role: "\"lead\"".into(),
            details: "".into(),
        }
        .validate()
        .unwrap();

        assert_eq!(lead.looking_for, "&lt;b&gt;work&lt;/b&gt;");
        assert_eq!(lead.name, "Jane O&#039;Neil");
        assert_eq!(lead.email, "jane@example.com");
        assert_eq!(lead.company, "A &amp; B");
        assert_eq!(lead.role, "&quot;lead&quot;");
    }

    #[test]
    fn email_is_kept_verbatim() {
        for email in ["o'neil@example.com", "r&d@example.com"] {
            let lead = submission("Pat", email).validate().unwrap();
            assert_eq!(lead.email, email);
            assert!(lead.email.parse::<lettre::Address>().is_ok());
        }
    }

    #[test]
    fn answers_convert_field_for_field() {
        let answers = Answers {
            looking_for: "a job".into(),
            name: "Jane".into(),
            email: "jane@example.com".into(),
            company: "N/A".into(),
            role: "N/A".into(),
            details: "hi".into(),
        };
        let submission = LeadSubmission::from(&answers);
        assert_eq!(submission.looking_for, "a job");
        assert_eq!(submission.details, "hi");
        assert!(submission.validate().is_ok());
    }
}
