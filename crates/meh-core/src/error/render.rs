//! Rendering shared by every [`Encapsulated`] variant.

use super::{Cause, Encapsulated, Reason};
use chrono::SecondsFormat;
use serde_json::{Map, Value};
use std::fmt;

/// `"<Name>: <message>"`, followed by `" [<cause>; <cause>...]"` when causes exist.
pub(super) fn fmt_display<E>(err: &E, f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    E: Encapsulated + ?Sized,
{
    write!(f, "{}: {}", err.name(), err.message())?;

    match err.causes() {
        Cause::None => Ok(()),
        Cause::Single(reason) => write!(f, " [{reason}]"),
        Cause::Multiple(reasons) => {
            f.write_str(" [")?;
            for (index, reason) in reasons.iter().enumerate() {
                if index > 0 {
                    f.write_str("; ")?;
                }
                write!(f, "{reason}")?;
            }
            f.write_str("]")
        }
    }
}

pub(super) fn to_json<E>(err: &E) -> Value
where
    E: Encapsulated + ?Sized,
{
    let mut object = Map::new();
    object.insert("name".into(), Value::from(err.name()));
    object.insert("message".into(), Value::from(err.message()));
    object.insert("stack".into(), Value::from(err.stack()));

    match err.causes() {
        Cause::None => {}
        Cause::Single(reason) => {
            object.insert("reason".into(), render_reason(reason));
        }
        Cause::Multiple(reasons) => {
            let rendered = reasons.iter().map(render_reason).collect();
            object.insert("reason".into(), Value::Array(rendered));
        }
    }

    if let Some(details) = err.details() {
        object.insert("details".into(), details.clone());
    }

    if let Some(at) = err.next_retry() {
        object.insert(
            "nextRetry".into(),
            Value::from(at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        );
    }

    object.insert("retryable".into(), Value::from(err.is_retryable()));

    Value::Object(object)
}

/// Encapsulated reasons render recursively, foreign ones by their string form.
fn render_reason(reason: &Reason) -> Value {
    match reason {
        Reason::Encapsulated(err) => err.render(),
        Reason::Foreign(err) => Value::from(err.to_string()),
    }
}
