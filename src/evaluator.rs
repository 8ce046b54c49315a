//! Password policy evaluator - main evaluation logic.

use secrecy::SecretString;

#[cfg(feature = "async")]
use std::time::Duration;

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::sections::{
    digit_section, length_section, lowercase_section, special_section, uppercase_section,
    SectionResult,
};
use crate::types::{PolicyResult, StrengthTier};

/// Number of rules in the policy.
pub const RULE_COUNT: usize = 5;

type SectionFn = fn(&SecretString) -> SectionResult;

/// Policy rules in evaluation order. Violations are reported in this order.
static RULES: [(&str, SectionFn); RULE_COUNT] = [
    ("length", length_section),
    ("uppercase", uppercase_section),
    ("lowercase", lowercase_section),
    ("digit", digit_section),
    ("special", special_section),
];

/// Evaluates a password against the fixed policy.
///
/// Every rule is checked, so the violation list is always complete. Any
/// input is accepted: the empty string fails all five rules.
///
/// # Returns
/// A `PolicyResult` with the strength tier and the violated rules.
pub fn evaluate_policy(password: &SecretString) -> PolicyResult {
    let mut violations = Vec::with_capacity(RULE_COUNT);

    for (_rule_name, section_fn) in RULES.iter() {
        if let Some(violation) = section_fn(password) {
            #[cfg(feature = "tracing")]
            tracing::trace!("Policy rule '{}' not satisfied", _rule_name);
            violations.push(violation);
        }
    }

    let score = RULE_COUNT - violations.len();

    PolicyResult {
        tier: StrengthTier::from_score(score),
        violations,
    }
}

/// Async version that waits for `debounce`, then sends the evaluation via
/// channel.
///
/// Nothing is sent if `token` is cancelled before the debounce elapses.
#[cfg(feature = "async")]
pub async fn evaluate_policy_tx(
    password: &SecretString,
    debounce: Duration,
    token: CancellationToken,
    tx: mpsc::Sender<PolicyResult>,
) {
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            #[cfg(feature = "tracing")]
            tracing::debug!("Policy evaluation cancelled before start");
            return;
        }
        _ = tokio::time::sleep(debounce) => {}
    }

    #[cfg(feature = "tracing")]
    tracing::info!("Policy evaluation is about to start...");

    let evaluation = evaluate_policy(password);

    if let Err(_e) = tx.send(evaluation).await {
        #[cfg(feature = "tracing")]
        tracing::error!("Failed to send policy evaluation result: {}", _e);
    }
}

/// [`evaluate_policy_tx`] with the debounce from `PWD_HYGIENE_DEBOUNCE_MS`.
#[cfg(feature = "async")]
pub async fn evaluate_policy_debounced(
    password: &SecretString,
    token: CancellationToken,
    tx: mpsc::Sender<PolicyResult>,
) {
    evaluate_policy_tx(password, crate::config::get_debounce(), token, tx).await;
}
