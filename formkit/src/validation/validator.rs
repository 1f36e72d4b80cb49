//! Field validators.

use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::pin::Pin;
use std::sync::Arc;

use futures::FutureExt;

use crate::error::{ValidatorError, panic_message};
use crate::value::FieldValue;

/// Type alias for boxed futures used in async validation.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Type alias for sync validation closures.
type SyncCheck = Arc<dyn Fn(&FieldValue) -> Result<Validation, ValidatorError> + Send + Sync>;

/// Type alias for async validation closures.
type AsyncCheck =
    Arc<dyn Fn(FieldValue) -> BoxFuture<'static, Result<Validation, ValidatorError>> + Send + Sync>;

/// Outcome of a validator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// The value is acceptable.
    Valid,
    /// The value is rejected. Without a message the previously shown
    /// error (if any) stays on screen.
    Invalid {
        /// Message to show
        message: Option<String>,
    },
}

impl Validation {
    /// Invalid with a message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: Some(message.into()),
        }
    }

    /// Whether the outcome is `Valid`.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl From<bool> for Validation {
    fn from(valid: bool) -> Self {
        if valid {
            Self::Valid
        } else {
            Self::Invalid { message: None }
        }
    }
}

/// A validator invocation, either already finished or still running.
pub enum ValidatorCall {
    /// Sync validators finish immediately.
    Ready(Result<Validation, ValidatorError>),
    /// Async validators hand back a future to drive.
    Pending(BoxFuture<'static, Result<Validation, ValidatorError>>),
}

impl std::fmt::Debug for ValidatorCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// A validator attached to a field.
///
/// A validator that cannot reach a verdict reports it by returning
/// `Err(ValidatorError)`. The field logs the error at `warn` through `log`
/// and shows the field invalid, so nothing reaches the console.
///
/// Panics are caught as well and handled the same way, but the process
/// panic hook still runs first (by default it prints to stderr). Treat
/// panic capture as a backstop and return `Err` instead.
#[derive(Clone)]
pub enum Validator {
    /// Runs synchronously on every input.
    Sync(SyncCheck),
    /// Runs asynchronously; stale results are discarded.
    Async(AsyncCheck),
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("Validator::Sync(..)"),
            Self::Async(_) => f.write_str("Validator::Async(..)"),
        }
    }
}

impl Validator {
    /// A fallible sync validator.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&FieldValue) -> Result<Validation, ValidatorError> + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    /// A fallible async validator.
    pub fn new_async<F, Fut>(f: F) -> Self
    where
        F: Fn(FieldValue) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Validation, ValidatorError>> + Send + 'static,
    {
        Self::Async(Arc::new(
            move |value| -> BoxFuture<'static, Result<Validation, ValidatorError>> {
                Box::pin(f(value))
            },
        ))
    }

    /// A boolean check on the value with a fixed message.
    pub fn rule<F>(f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        let msg = msg.into();
        Self::new(move |v| {
            Ok(if f(v) {
                Validation::Valid
            } else {
                Validation::invalid(msg.clone())
            })
        })
    }

    /// A boolean check on the text of a single-value field.
    ///
    /// Multi-value fields are checked item by item; every item must pass.
    pub fn text<F>(f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::rule(
            move |v| match v {
                FieldValue::Single(s) => f(s),
                FieldValue::Multiple(items) => items.iter().all(|s| f(s)),
            },
            msg,
        )
    }

    /// An async boolean check with a fixed message.
    pub fn rule_async<F, Fut>(f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(FieldValue) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let msg = msg.into();
        Self::new_async(move |v| {
            let fut = f(v);
            let msg = msg.clone();
            async move {
                Ok::<_, ValidatorError>(if fut.await {
                    Validation::Valid
                } else {
                    Validation::invalid(msg)
                })
            }
        })
    }

    /// Run several validators in order; the first rejection wins.
    pub fn all(validators: Vec<Validator>) -> Self {
        if validators.iter().all(|v| matches!(v, Validator::Sync(_))) {
            let checks: Vec<SyncCheck> = validators
                .into_iter()
                .filter_map(|v| match v {
                    Validator::Sync(check) => Some(check),
                    Validator::Async(_) => None,
                })
                .collect();
            return Self::new(move |value| {
                for check in &checks {
                    let outcome = check(value)?;
                    if !outcome.is_valid() {
                        return Ok(outcome);
                    }
                }
                Ok(Validation::Valid)
            });
        }

        let validators = Arc::new(validators);
        Self::new_async(move |value| run_all(Arc::clone(&validators), value))
    }

    /// Whether this validator runs asynchronously.
    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }

    /// Invoke the validator, converting panics into `ValidatorError`.
    /// Returned errors pass through unchanged.
    pub fn call(&self, value: &FieldValue) -> ValidatorCall {
        match self {
            Self::Sync(check) => {
                let result = catch_unwind(AssertUnwindSafe(|| check(value)))
                    .unwrap_or_else(|panic| Err(ValidatorError::new(panic_message(&*panic))));
                ValidatorCall::Ready(result)
            }
            Self::Async(check) => {
                let value = value.clone();
                match catch_unwind(AssertUnwindSafe(|| check(value))) {
                    Ok(fut) => ValidatorCall::Pending(Box::pin(
                        AssertUnwindSafe(fut).catch_unwind().map(|result| {
                            result.unwrap_or_else(|panic| {
                                Err(ValidatorError::new(panic_message(&*panic)))
                            })
                        }),
                    )),
                    Err(panic) => {
                        ValidatorCall::Ready(Err(ValidatorError::new(panic_message(&*panic))))
                    }
                }
            }
        }
    }
}

/// Run validators in order, stopping at the first rejection or failure.
async fn run_all(
    validators: Arc<Vec<Validator>>,
    value: FieldValue,
) -> Result<Validation, ValidatorError> {
    for validator in validators.iter() {
        let outcome = match validator.call(&value) {
            ValidatorCall::Ready(result) => result?,
            ValidatorCall::Pending(fut) => fut.await?,
        };
        if !outcome.is_valid() {
            return Ok(outcome);
        }
    }
    Ok(Validation::Valid)
}

// Built-in rules
impl Validator {
    /// Require the field to be non-empty.
    ///
    /// Empty fields are always shown neutral, so this mostly matters for
    /// form-level checks.
    pub fn required(msg: impl Into<String>) -> Self {
        Self::rule(
            |v| match v {
                FieldValue::Single(s) => !s.trim().is_empty(),
                FieldValue::Multiple(items) => !items.is_empty(),
            },
            msg,
        )
    }

    /// Require minimum length (characters, or items for multi-value fields).
    pub fn min_length(min: usize, msg: impl Into<String>) -> Self {
        Self::rule(
            move |v| match v {
                FieldValue::Single(s) => s.chars().count() >= min,
                FieldValue::Multiple(items) => items.len() >= min,
            },
            msg,
        )
    }

    /// Require maximum length (characters, or items for multi-value fields).
    pub fn max_length(max: usize, msg: impl Into<String>) -> Self {
        Self::rule(
            move |v| match v {
                FieldValue::Single(s) => s.chars().count() <= max,
                FieldValue::Multiple(items) => items.len() <= max,
            },
            msg,
        )
    }

    /// Require the value to match a regex pattern.
    pub fn pattern(pattern: &str, msg: impl Into<String>) -> Result<Self, regex::Error> {
        let re = regex::Regex::new(pattern)?;
        Ok(Self::text(move |v| re.is_match(v), msg))
    }

    /// Require a valid email address.
    pub fn email(msg: impl Into<String>) -> Self {
        Self::text(
            |v| v.is_empty() || email_address::EmailAddress::is_valid(v),
            msg,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(call: ValidatorCall) -> Result<Validation, ValidatorError> {
        match call {
            ValidatorCall::Ready(result) => result,
            ValidatorCall::Pending(_) => panic!("expected a sync validator"),
        }
    }

    #[test]
    fn test_all_returns_first_rejection() {
        let v = Validator::all(vec![
            Validator::required("required"),
            Validator::min_length(3, "too short"),
            Validator::max_length(5, "too long"),
        ]);
        assert!(!v.is_async());
        assert_eq!(
            ready(v.call(&"ab".into())),
            Ok(Validation::invalid("too short"))
        );
        assert_eq!(ready(v.call(&"abcd".into())), Ok(Validation::Valid));
        assert_eq!(
            ready(v.call(&"abcdef".into())),
            Ok(Validation::invalid("too long"))
        );
    }

    #[test]
    fn test_panicking_validator_becomes_error() {
        let v = Validator::new(|value| {
            if !value.is_empty() {
                panic!("boom");
            }
            Ok(Validation::Valid)
        });
        let err = ready(v.call(&"x".into())).unwrap_err();
        assert_eq!(err.message, "boom");
    }

    #[test]
    fn test_returned_error_passes_through_all() {
        let v = Validator::all(vec![
            Validator::required("required"),
            Validator::new(|_| Err(ValidatorError::new("lookup unavailable"))),
            Validator::max_length(2, "never reached"),
        ]);
        let err = ready(v.call(&"abc".into())).unwrap_err();
        assert_eq!(err.message, "lookup unavailable");
    }

    #[test]
    fn test_email_and_pattern() {
        let email = Validator::email("bad email");
        assert_eq!(ready(email.call(&"a@b.c".into())), Ok(Validation::Valid));
        assert!(!ready(email.call(&"nope".into())).unwrap().is_valid());

        let digits = Validator::pattern(r"^\d+$", "digits only").unwrap();
        assert!(ready(digits.call(&"123".into())).unwrap().is_valid());
        assert!(!ready(digits.call(&"12a".into())).unwrap().is_valid());
        assert!(Validator::pattern("(", "broken").is_err());
    }

    #[tokio::test]
    async fn test_async_validator_panic_is_caught() {
        let v = Validator::new_async(|value: FieldValue| async move {
            if !value.is_empty() {
                panic!("async boom");
            }
            Ok::<_, ValidatorError>(Validation::Valid)
        });
        match v.call(&"x".into()) {
            ValidatorCall::Pending(fut) => {
                let err = fut.await.unwrap_err();
                assert_eq!(err.message, "async boom");
            }
            ValidatorCall::Ready(_) => panic!("expected a pending call"),
        }
    }
}
