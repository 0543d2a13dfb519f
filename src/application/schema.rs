//! Tiered validation rules for link submissions.
//!
//! [`LinkPolicy::schema_for`] builds an immutable [`LinkSchema`] for one
//! caller class. The schema validates and normalizes a raw
//! [`LinkSubmission`] into a [`ValidLink`], collecting every field error
//! instead of stopping at the first one.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;
use validator::{ValidationError, ValidationErrors};

use crate::domain::ttl::{TtlCeiling, TtlPolicy, TtlStep};
use crate::utils::ip_ranges::has_private_literal_host;
use crate::utils::url_normalizer::{UrlNormalizationError, normalize_link};

/// Upper bound on a submitted link, in characters.
pub const MAX_LINK_LENGTH: usize = 2048;

/// Short codes that collide with the service's own routes.
pub const DEFAULT_RESERVED_CODES: [&str; 6] = ["login", "cleanup", "about", "setup", "api", "health"];

static SHORT_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("short code pattern is valid"));

/// Raw creation input as submitted by the caller.
///
/// Numeric fields stay as `f64` so that non-integers reach validation
/// instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkSubmission {
    pub link: String,
    pub passphrase: Option<String>,
    pub call_limit: Option<f64>,
    pub short: Option<String>,
    pub ttl: Option<f64>,
}

/// A submission that passed every field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLink {
    pub url: Url,
    /// Trimmed and non-empty, or absent.
    pub passphrase: Option<String>,
    pub call_limit: Option<i64>,
    /// Trimmed custom code, absent when blank.
    pub short: Option<String>,
    /// `None` means the link never expires.
    pub ttl: Option<TtlStep>,
}

/// Operator policy the rule sets are built from.
#[derive(Debug, Clone)]
pub struct LinkPolicy {
    pub ttl: TtlPolicy,
    pub allow_private_links: bool,
    reserved_codes: HashSet<String>,
}

impl LinkPolicy {
    /// Creates a policy. `extra_reserved` is added to [`DEFAULT_RESERVED_CODES`].
    pub fn new<I, S>(ttl: TtlPolicy, allow_private_links: bool, extra_reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let reserved_codes = DEFAULT_RESERVED_CODES
            .iter()
            .map(|code| code.to_string())
            .chain(
                extra_reserved
                    .into_iter()
                    .map(|code| code.as_ref().trim().to_lowercase())
                    .filter(|code| !code.is_empty()),
            )
            .collect();

        Self {
            ttl,
            allow_private_links,
            reserved_codes,
        }
    }

    /// Case-insensitive reserved-word test.
    pub fn is_reserved(&self, code: &str) -> bool {
        self.reserved_codes.contains(&code.to_lowercase())
    }

    /// Builds the rule set for a caller class.
    pub fn schema_for(&self, privileged: bool) -> LinkSchema<'_> {
        LinkSchema {
            policy: self,
            ceiling: self.ttl.ceiling_for(privileged),
        }
    }
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self::new(TtlPolicy::default(), false, std::iter::empty::<&str>())
    }
}

/// Validation rules for one caller class.
#[derive(Debug, Clone, Copy)]
pub struct LinkSchema<'p> {
    policy: &'p LinkPolicy,
    ceiling: TtlCeiling,
}

impl LinkSchema<'_> {
    /// Ladder steps this class may pick from, in ascending order.
    pub fn ttl_tiers(&self) -> &'static [TtlStep] {
        self.ceiling.tiers()
    }

    pub fn is_unbounded(&self) -> bool {
        self.ceiling.is_unbounded()
    }

    /// TTL used when the submission has none.
    pub fn default_ttl(&self) -> Option<TtlStep> {
        self.ceiling.default_ttl()
    }

    pub fn ceiling(&self) -> TtlCeiling {
        self.ceiling
    }

    /// Validates and normalizes a submission.
    ///
    /// # Errors
    ///
    /// Returns every failing field keyed by `link`, `passphrase`,
    /// `callLimit`, `short` or `ttl`.
    pub fn validate(&self, submission: &LinkSubmission) -> Result<ValidLink, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let url = self.check_link(&submission.link, &mut errors);
        let call_limit = check_call_limit(submission.call_limit, &mut errors);
        let short = self.check_short(submission.short.as_deref(), &mut errors);
        let ttl = self.check_ttl(submission.ttl, &mut errors);

        let passphrase = submission
            .passphrase
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        match url {
            Some(url) if errors.is_empty() => Ok(ValidLink {
                url,
                passphrase,
                call_limit,
                short,
                ttl,
            }),
            _ => Err(errors),
        }
    }

    fn check_link(&self, link: &str, errors: &mut ValidationErrors) -> Option<Url> {
        if link.trim().chars().count() > MAX_LINK_LENGTH {
            errors.add(
                "link",
                field_error(
                    "too_long",
                    format!("Link must be at most {MAX_LINK_LENGTH} characters"),
                ),
            );
            return None;
        }

        let url = match normalize_link(link) {
            Ok(url) => url,
            Err(e) => {
                let code = match e {
                    UrlNormalizationError::TooShort => "too_short",
                    _ => "invalid_url",
                };
                errors.add("link", field_error(code, e.to_string()));
                return None;
            }
        };

        if !self.policy.allow_private_links && has_private_literal_host(&url) {
            errors.add(
                "link",
                field_error("private_link", "Links to private networks are not allowed"),
            );
            return None;
        }

        Some(url)
    }

    fn check_short(&self, short: Option<&str>, errors: &mut ValidationErrors) -> Option<String> {
        let code = short.map(str::trim).filter(|s| !s.is_empty())?;

        let mut valid = true;
        if self.policy.is_reserved(code) {
            errors.add(
                "short",
                field_error("reserved", format!("'{code}' is a reserved word")),
            );
            valid = false;
        }
        if !SHORT_CODE_PATTERN.is_match(code) {
            errors.add(
                "short",
                field_error(
                    "invalid_format",
                    "Short code may only contain letters, digits, '_' and '-'",
                ),
            );
            valid = false;
        }

        valid.then(|| code.to_string())
    }

    fn check_ttl(&self, ttl: Option<f64>, errors: &mut ValidationErrors) -> Option<TtlStep> {
        let Some(ms) = ttl else {
            return self.ceiling.default_ttl();
        };

        let step = whole_number(ms).and_then(TtlStep::from_duration_ms);
        match step {
            None => {
                errors.add(
                    "ttl",
                    field_error("unsupported_duration", "TTL must be one of the offered durations"),
                );
                None
            }
            Some(step) if !self.ceiling.permits(step) => {
                let mut error = field_error(
                    "max_exceeded",
                    format!("TTL may be at most {}", self.ceiling),
                );
                if let Some(max) = self.ceiling.default_ttl() {
                    error.add_param(Cow::Borrowed("max"), &max.duration_ms());
                }
                errors.add("ttl", error);
                None
            }
            Some(step) => Some(step),
        }
    }
}

fn check_call_limit(limit: Option<f64>, errors: &mut ValidationErrors) -> Option<i64> {
    let value = limit?;
    match whole_number(value) {
        Some(n) if n >= 1 => Some(n),
        _ => {
            errors.add(
                "callLimit",
                field_error("range", "Call limit must be a whole number of at least 1"),
            );
            None
        }
    }
}

/// Converts `value` to an integer if it has no fractional part and fits.
fn whole_number(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ttl::{DAY_IN_MS, HOUR_IN_MS, MONTH_IN_MS, WEEK_IN_MS};

    fn submission(link: &str) -> LinkSubmission {
        LinkSubmission {
            link: link.to_string(),
            ..Default::default()
        }
    }

    fn codes(errors: &ValidationErrors, field: &str) -> Vec<String> {
        errors
            .field_errors()
            .into_iter()
            .filter(|(name, _)| name.to_string() == field)
            .flat_map(|(_, errs)| errs.iter().map(|e| e.code.to_string()).collect::<Vec<_>>())
            .collect()
    }

    #[test]
    fn test_link_gets_default_scheme() {
        let policy = LinkPolicy::default();
        let valid = policy
            .schema_for(false)
            .validate(&submission("  example.com/page "))
            .unwrap();

        assert_eq!(valid.url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_invalid_link_rejected() {
        let policy = LinkPolicy::default();
        let errors = policy
            .schema_for(false)
            .validate(&submission("http://"))
            .unwrap_err();

        assert_eq!(codes(&errors, "link"), vec!["invalid_url"]);
    }

    #[test]
    fn test_short_link_rejected() {
        let policy = LinkPolicy::default();
        let errors = policy.schema_for(false).validate(&submission("a")).unwrap_err();
        assert_eq!(codes(&errors, "link"), vec!["too_short"]);
    }

    #[test]
    fn test_overlong_link_rejected() {
        let policy = LinkPolicy::default();
        let link = format!("example.com/{}", "a".repeat(MAX_LINK_LENGTH));
        let errors = policy.schema_for(true).validate(&submission(&link)).unwrap_err();
        assert_eq!(codes(&errors, "link"), vec!["too_long"]);
    }

    #[test]
    fn test_private_literal_ip_rejected() {
        let policy = LinkPolicy::default();
        let errors = policy
            .schema_for(true)
            .validate(&submission("http://192.168.1.5"))
            .unwrap_err();

        assert_eq!(codes(&errors, "link"), vec!["private_link"]);
    }

    #[test]
    fn test_ipv6_embedding_private_ipv4_rejected() {
        let policy = LinkPolicy::default();
        let schema = policy.schema_for(true);

        for link in [
            "http://[::127.0.0.1]/",
            "http://[::10.0.0.1]/",
            "http://[64:ff9b::7f00:1]/",
            "http://[2002:c0a8:0105::1]/",
        ] {
            let errors = schema.validate(&submission(link)).unwrap_err();
            assert_eq!(codes(&errors, "link"), vec!["private_link"], "{link}");
        }
    }

    #[test]
    fn test_private_literal_ip_allowed_by_policy() {
        let policy = LinkPolicy::new(TtlPolicy::default(), true, std::iter::empty::<&str>());
        let valid = policy
            .schema_for(false)
            .validate(&submission("http://10.0.0.1/admin"))
            .unwrap();

        assert_eq!(valid.url.host_str(), Some("10.0.0.1"));
    }

    #[test]
    fn test_hostname_not_resolved() {
        let policy = LinkPolicy::default();
        assert!(
            policy
                .schema_for(false)
                .validate(&submission("intranet.local"))
                .is_ok()
        );
    }

    #[test]
    fn test_reserved_short_code_case_insensitive() {
        let policy = LinkPolicy::default();
        let mut input = submission("example.com");
        input.short = Some("CleanUp".to_string());

        let errors = policy.schema_for(true).validate(&input).unwrap_err();

        assert_eq!(codes(&errors, "short"), vec!["reserved"]);
    }

    #[test]
    fn test_configured_reserved_code() {
        let policy = LinkPolicy::new(TtlPolicy::default(), false, [" Admin ", ""]);
        assert!(policy.is_reserved("admin"));
        assert!(policy.is_reserved("LOGIN"));
        assert!(!policy.is_reserved(""));
        assert!(!policy.is_reserved("my-link"));
    }

    #[test]
    fn test_malformed_short_code() {
        let policy = LinkPolicy::default();
        let mut input = submission("example.com");
        input.short = Some("has space".to_string());

        let errors = policy.schema_for(false).validate(&input).unwrap_err();

        assert_eq!(codes(&errors, "short"), vec!["invalid_format"]);
    }

    #[test]
    fn test_blank_short_code_is_absent() {
        let policy = LinkPolicy::default();
        let mut input = submission("example.com");
        input.short = Some("   ".to_string());

        let valid = policy.schema_for(false).validate(&input).unwrap();

        assert!(valid.short.is_none());
    }

    #[test]
    fn test_short_code_trimmed() {
        let policy = LinkPolicy::default();
        let mut input = submission("example.com");
        input.short = Some(" my_Link-1 ".to_string());

        let valid = policy.schema_for(false).validate(&input).unwrap();

        assert_eq!(valid.short.as_deref(), Some("my_Link-1"));
    }

    #[test]
    fn test_call_limit_rules() {
        let policy = LinkPolicy::default();
        let schema = policy.schema_for(false);

        for bad in [0.0, -3.0, 1.5] {
            let mut input = submission("example.com");
            input.call_limit = Some(bad);
            let errors = schema.validate(&input).unwrap_err();
            assert_eq!(codes(&errors, "callLimit"), vec!["range"], "value {bad}");
        }

        let mut input = submission("example.com");
        input.call_limit = Some(3.0);
        assert_eq!(schema.validate(&input).unwrap().call_limit, Some(3));
    }

    #[test]
    fn test_passphrase_trimmed_and_blank_dropped() {
        let policy = LinkPolicy::default();
        let schema = policy.schema_for(false);

        let mut input = submission("example.com");
        input.passphrase = Some("  s3cret ".to_string());
        assert_eq!(
            schema.validate(&input).unwrap().passphrase.as_deref(),
            Some("s3cret")
        );

        input.passphrase = Some("   ".to_string());
        assert!(schema.validate(&input).unwrap().passphrase.is_none());
    }

    #[test]
    fn test_temporary_ttl_defaults_to_max_tier() {
        let policy = LinkPolicy::default();
        let valid = policy
            .schema_for(false)
            .validate(&submission("example.com"))
            .unwrap();

        assert_eq!(valid.ttl, Some(TtlStep::Week));
    }

    #[test]
    fn test_temporary_ttl_at_max_accepted() {
        let policy = LinkPolicy::default();
        let mut input = submission("example.com");
        input.ttl = Some(WEEK_IN_MS as f64);

        let valid = policy.schema_for(false).validate(&input).unwrap();

        assert_eq!(valid.ttl, Some(TtlStep::Week));
    }

    #[test]
    fn test_temporary_ttl_above_max_rejected() {
        let policy = LinkPolicy::default();
        let mut input = submission("example.com");
        input.ttl = Some(MONTH_IN_MS as f64);

        let errors = policy.schema_for(false).validate(&input).unwrap_err();

        assert_eq!(codes(&errors, "ttl"), vec!["max_exceeded"]);
        let ttl_errors = errors.field_errors();
        let param = ttl_errors
            .iter()
            .find(|(name, _)| name.to_string() == "ttl")
            .map(|(_, errs)| errs[0].params.get("max").cloned())
            .unwrap();
        assert_eq!(param, Some(serde_json::json!(WEEK_IN_MS)));
    }

    #[test]
    fn test_off_ladder_ttl_rejected() {
        let policy = LinkPolicy::default();
        let mut input = submission("example.com");
        input.ttl = Some((DAY_IN_MS + 1) as f64);

        let errors = policy.schema_for(true).validate(&input).unwrap_err();

        assert_eq!(codes(&errors, "ttl"), vec!["unsupported_duration"]);
    }

    #[test]
    fn test_registered_unbounded_has_no_default_expiry() {
        let policy = LinkPolicy::default();
        let schema = policy.schema_for(true);

        assert!(schema.is_unbounded());
        assert_eq!(schema.ttl_tiers().len(), 5);

        let valid = schema.validate(&submission("example.com")).unwrap();
        assert!(valid.ttl.is_none());
    }

    #[test]
    fn test_temporary_tiers_up_to_ceiling() {
        let policy = LinkPolicy::new(
            TtlPolicy {
                temporary: TtlCeiling::Step(TtlStep::Day),
                registered: TtlCeiling::Step(TtlStep::Year),
            },
            false,
            std::iter::empty::<&str>(),
        );

        let schema = policy.schema_for(false);
        assert!(!schema.is_unbounded());
        assert_eq!(schema.ttl_tiers(), &[TtlStep::Hour, TtlStep::Day]);

        let mut input = submission("example.com");
        input.ttl = Some(HOUR_IN_MS as f64);
        assert_eq!(schema.validate(&input).unwrap().ttl, Some(TtlStep::Hour));
    }

    #[test]
    fn test_all_field_errors_collected() {
        let policy = LinkPolicy::default();
        let input = LinkSubmission {
            link: "ftp://example.com".to_string(),
            passphrase: None,
            call_limit: Some(0.0),
            short: Some("about".to_string()),
            ttl: Some(42.0),
        };

        let errors = policy.schema_for(false).validate(&input).unwrap_err();
        let fields = errors.field_errors();

        assert_eq!(fields.len(), 4);
        assert_eq!(codes(&errors, "link"), vec!["invalid_url"]);
        assert_eq!(codes(&errors, "short"), vec!["reserved"]);
    }
}
