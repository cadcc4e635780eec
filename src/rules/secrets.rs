//! Secret detection rules for proposed file content
//!
//! Rules are evaluated in declaration order, but every match is collected
//! before a decision is made, so the order never changes the outcome.

use crate::rules::{DetectionRule, Validator};

/// Built-in detection table
pub const BUILTIN_RULES: &[DetectionRule] = &[
    // Cloud provider credentials
    DetectionRule::new(
        "aws-access-key",
        r"\b(?:AKIA|ASIA|ABIA|ACCA)[0-9A-Z]{16}\b",
        "AWS access key ID",
    ),
    DetectionRule::new(
        "aws-secret-key",
        r#"(?i)aws_?secret_?access_?key["']?\s*[:=]\s*["']?(?P<secret>[A-Za-z0-9/+=]{40})"#,
        "AWS secret access key",
    )
    .with_keywords(&["aws"]),
    DetectionRule::new(
        "google-api-key",
        r"\bAIza[0-9A-Za-z_\-]{35}",
        "Google API key",
    ),
    DetectionRule::new(
        "heroku-api-key",
        r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b",
        "Heroku API key",
    )
    .with_context(r"(?i)heroku", None)
    .with_keywords(&["heroku"]),
    // Source hosting and SaaS tokens
    DetectionRule::new(
        "github-token",
        r"\bgh[pousr]_[A-Za-z0-9]{36,255}\b",
        "GitHub token",
    ),
    DetectionRule::new(
        "github-fine-grained-token",
        r"\bgithub_pat_[A-Za-z0-9_]{22,255}\b",
        "GitHub fine-grained personal access token",
    ),
    DetectionRule::new(
        "anthropic-api-key",
        r"\bsk-ant-[A-Za-z0-9_\-]{20,}",
        "Anthropic API key",
    ),
    DetectionRule::new(
        "openai-api-key",
        r"\bsk-(?:(?:proj|svcacct|admin)-[A-Za-z0-9_\-]{40,}|[A-Za-z0-9]{48}\b)",
        "OpenAI API key",
    ),
    DetectionRule::new(
        "stripe-key",
        r"\b[sr]k_(?:live|test)_[A-Za-z0-9]{10,99}\b",
        "Stripe API key",
    ),
    DetectionRule::new(
        "slack-token",
        r"\bxox[abposr]-[A-Za-z0-9\-]{10,}",
        "Slack token",
    ),
    // Key material and structured tokens
    DetectionRule::new(
        "private-key",
        r"-----BEGIN (?:RSA |EC |DSA |OPENSSH |ENCRYPTED |PGP )?PRIVATE KEY(?: BLOCK)?-----",
        "Private key block",
    )
    .with_keywords(&["private key"]),
    DetectionRule::new(
        "jwt",
        r"\beyJ[A-Za-z0-9_\-]{10,}\.eyJ[A-Za-z0-9_\-]{10,}\.[A-Za-z0-9_\-]{10,}",
        "JSON Web Token",
    )
    .with_validator(Validator::StructuredToken)
    .with_keywords(&["eyj"]),
    DetectionRule::new(
        "database-url",
        r#"(?i)\b(?:postgres(?:ql)?|mysql|mariadb|mongodb(?:\+srv)?|rediss?|amqps?|mssql)://[^\s:/@'"]*:(?P<secret>[^\s@'"]+)@[^\s'"]+"#,
        "Database connection string with embedded password",
    )
    .with_keywords(&["://"]),
    // Personal data
    DetectionRule::new(
        "credit-card",
        r"\b(?:4\d{3}|5[1-5]\d{2}|2[2-7]\d{2}|6(?:011|5\d{2}))(?:[ -]?\d{4}){3}\b|\b3[47]\d{2}[ -]?\d{6}[ -]?\d{5}\b",
        "Payment card number",
    )
    .with_validator(Validator::Luhn),
    DetectionRule::new(
        "us-ssn",
        r"\b\d{3}-\d{2}-\d{4}\b",
        "US Social Security number",
    )
    .with_context(
        r"(?i)(?:^|[^a-z])(?:ssn|social[\s_-]*security)(?:[^a-z]|$)",
        None,
    )
    .with_keywords(&["ssn", "social"]),
    // Generic assignments and obfuscated forms
    DetectionRule::new(
        "generic-secret-assignment",
        r#"(?i)(?:api[_-]?key|secret[_-]?key|client[_-]?secret|access[_-]?token|auth[_-]?token|private[_-]?key|password|passwd|secret)["']?\s*[:=]\s*(?P<open>["'`])(?P<secret>[^"'`\s]{8,})(?P<close>["'`])"#,
        "Hardcoded secret assignment",
    )
    .with_validator(Validator::BalancedDelimiter),
    DetectionRule::new(
        "base64-encoded-secret",
        r"(?P<secret>[A-Za-z0-9+/_\-]{40,}={0,2})",
        "Base64-encoded credential",
    )
    .with_validator(Validator::Base64Rescan),
];
