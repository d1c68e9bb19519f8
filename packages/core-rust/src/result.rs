//! Tagged outcome of a wrapped invocation.
//!
//! Serializes as `{ "ok": true, "result": .. }` or `{ "ok": false, "error": .. }`.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// WrappedResult
// ---------------------------------------------------------------------------

/// Outcome of one call to a wrapped operation.
///
/// `Failure` carries the error value exactly as the operation (or the
/// `before`/`after` hook) produced it; the wrapper never maps or boxes it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum WrappedResult<T, E> {
    /// The operation and every guarded hook completed.
    Success(T),
    /// The operation, `before`, or `after` failed with this error.
    Failure(E),
}

impl<T, E> WrappedResult<T, E> {
    /// Returns `true` for the `Success` variant.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` for the `Failure` variant.
    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }

    /// Converts into the success payload, discarding a failure.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Success(result) => Some(result),
            Self::Failure(_) => None,
        }
    }

    /// Converts into the failure payload, discarding a success.
    pub fn err(self) -> Option<E> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    /// Borrows the payload without consuming the outcome.
    pub fn as_ref(&self) -> WrappedResult<&T, &E> {
        match self {
            Self::Success(result) => WrappedResult::Success(result),
            Self::Failure(error) => WrappedResult::Failure(error),
        }
    }

    /// Converts into a standard `Result` so `?` can be used on the outcome.
    ///
    /// # Errors
    ///
    /// Returns the captured error for the `Failure` variant.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Success(result) => Ok(result),
            Self::Failure(error) => Err(error),
        }
    }
}

impl<T, E> From<Result<T, E>> for WrappedResult<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(result) => Self::Success(result),
            Err(error) => Self::Failure(error),
        }
    }
}

impl<T, E> From<WrappedResult<T, E>> for Result<T, E> {
    fn from(outcome: WrappedResult<T, E>) -> Self {
        outcome.into_result()
    }
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

impl<T: Serialize, E: Serialize> Serialize for WrappedResult<T, E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("WrappedResult", 2)?;
        match self {
            Self::Success(result) => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("result", result)?;
            }
            Self::Failure(error) => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

/// Wire shape before the discriminant is checked. `None` means the field is
/// absent; a present `null` payload is `Some`.
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>, E: Deserialize<'de>"))]
struct RawWrappedResult<T, E> {
    ok: bool,
    #[serde(default, deserialize_with = "present")]
    result: Option<T>,
    #[serde(default, deserialize_with = "present")]
    error: Option<E>,
}

fn present<'de, D, V>(deserializer: D) -> Result<Option<V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    V::deserialize(deserializer).map(Some)
}

/// Exactly the payload named by `ok` must be present.
impl<'de, T: Deserialize<'de>, E: Deserialize<'de>> Deserialize<'de> for WrappedResult<T, E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawWrappedResult::<T, E>::deserialize(deserializer)?;
        match (raw.ok, raw.result, raw.error) {
            (true, Some(_), Some(_)) => {
                Err(de::Error::unknown_field("error", &["ok", "result"]))
            }
            (false, Some(_), Some(_)) => {
                Err(de::Error::unknown_field("result", &["ok", "error"]))
            }
            (true, Some(result), None) => Ok(Self::Success(result)),
            (true, None, _) => Err(de::Error::missing_field("result")),
            (false, None, Some(error)) => Ok(Self::Failure(error)),
            (false, _, None) => Err(de::Error::missing_field("error")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accessors_follow_the_variant() {
        let success: WrappedResult<u32, String> = WrappedResult::Success(5);
        assert!(success.is_ok());
        assert!(!success.is_err());
        assert_eq!(success.as_ref().ok(), Some(&5));
        assert_eq!(success.clone().err(), None);
        assert_eq!(success.into_result(), Ok(5));

        let failure: WrappedResult<u32, String> = WrappedResult::Failure("boom".to_string());
        assert!(failure.is_err());
        assert_eq!(failure.clone().ok(), None);
        assert_eq!(failure.err().as_deref(), Some("boom"));
    }

    #[test]
    fn converts_from_std_result() {
        let outcome: WrappedResult<i32, &str> = Err("nope").into();
        assert_eq!(outcome, WrappedResult::Failure("nope"));
        let back: Result<i32, &str> = WrappedResult::Success(1).into();
        assert_eq!(back, Ok(1));
    }

    #[test]
    fn serializes_with_ok_discriminant() {
        let success: WrappedResult<f64, String> = WrappedResult::Success(5.0);
        assert_eq!(
            serde_json::to_value(&success).unwrap(),
            json!({ "ok": true, "result": 5.0 })
        );

        let failure: WrappedResult<f64, String> =
            WrappedResult::Failure("divide by zero".to_string());
        assert_eq!(
            serde_json::to_value(&failure).unwrap(),
            json!({ "ok": false, "error": "divide by zero" })
        );
    }

    #[test]
    fn deserializes_by_discriminant() {
        let success: WrappedResult<u8, String> =
            serde_json::from_value(json!({ "ok": true, "result": 7 })).unwrap();
        assert_eq!(success, WrappedResult::Success(7));

        let failure: WrappedResult<u8, String> =
            serde_json::from_value(json!({ "ok": false, "error": "bad" })).unwrap();
        assert_eq!(failure, WrappedResult::Failure("bad".to_string()));
    }

    #[test]
    fn rejects_discriminant_without_payload() {
        let err = serde_json::from_value::<WrappedResult<u8, String>>(json!({ "ok": true }))
            .unwrap_err();
        assert!(err.to_string().contains("missing field `result`"));

        let err = serde_json::from_value::<WrappedResult<u8, String>>(json!({ "ok": false }))
            .unwrap_err();
        assert!(err.to_string().contains("missing field `error`"));
    }

    #[test]
    fn rejects_both_payloads() {
        let err = serde_json::from_value::<WrappedResult<u8, String>>(
            json!({ "ok": true, "result": 1, "error": "x" }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown field `error`"));

        let err = serde_json::from_value::<WrappedResult<u8, String>>(
            json!({ "ok": false, "result": 1, "error": "x" }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown field `result`"));
    }

    #[test]
    fn null_payloads_read_back() {
        let unit: WrappedResult<(), String> = WrappedResult::Success(());
        assert_eq!(
            serde_json::to_value(&unit).unwrap(),
            json!({ "ok": true, "result": null })
        );
        let back: WrappedResult<(), String> =
            serde_json::from_value(serde_json::to_value(&unit).unwrap()).unwrap();
        assert_eq!(back, unit);

        let none: WrappedResult<Option<u8>, String> = WrappedResult::Success(None);
        let back: WrappedResult<Option<u8>, String> =
            serde_json::from_value(serde_json::to_value(&none).unwrap()).unwrap();
        assert_eq!(back, none);

        let unit_err: WrappedResult<u8, ()> = WrappedResult::Failure(());
        let back: WrappedResult<u8, ()> =
            serde_json::from_value(serde_json::to_value(&unit_err).unwrap()).unwrap();
        assert_eq!(back, unit_err);
    }

    #[test]
    fn null_is_not_a_value_for_non_nullable_payload() {
        let err = serde_json::from_value::<WrappedResult<u8, String>>(
            json!({ "ok": true, "result": null }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid type: null"));
    }
}
