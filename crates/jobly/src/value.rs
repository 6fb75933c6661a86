//! Loosely-typed bind values.
//!
//! Caller input (JSON bodies, query strings) arrives without a schema, so
//! values are carried as [`SqlValue`] and converted to the column's declared
//! type only when the statement is bound. Text bound into a numeric column is
//! parsed, integral floats bind into integer columns, and everything else that
//! does not fit is reported as a bind error by `tokio-postgres`.

use crate::error::{JoblyError, JoblyResult};
use bytes::BytesMut;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::str::FromStr;
use tokio_postgres::types::{IsNull, ToSql, Type};

/// A single bound value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    /// Whether this is SQL `NULL`.
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Numeric coercion: numbers pass through, text is parsed (integer first).
    pub fn to_number(&self) -> Option<SqlValue> {
        match self {
            SqlValue::Int(_) => Some(self.clone()),
            SqlValue::Float(f) if f.is_finite() => Some(self.clone()),
            SqlValue::Text(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    return Some(SqlValue::Int(i));
                }
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(SqlValue::Float)
            }
            _ => None,
        }
    }

    /// Boolean interpretation of flag-style input.
    ///
    /// Text accepts `true`/`false`/`1`/`0` (any case) and the empty string.
    pub fn truthiness(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(b) => Some(*b),
            SqlValue::Int(i) => Some(*i != 0),
            SqlValue::Float(f) => Some(*f != 0.0),
            SqlValue::Text(s) => parse_flag(s),
            SqlValue::Null => None,
        }
    }

    /// Render as pattern text for `LIKE`-style matching.
    pub fn to_pattern_text(&self) -> Option<String> {
        match self {
            SqlValue::Text(s) => Some(s.clone()),
            SqlValue::Int(i) => Some(i.to_string()),
            SqlValue::Float(f) => Some(f.to_string()),
            _ => None,
        }
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false") {
        Some(false)
    } else if s == "1" || s.eq_ignore_ascii_case("true") {
        Some(true)
    } else {
        None
    }
}

// ─── Conversions ────────────────────────────────────────────────────────────

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v.into())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

impl TryFrom<serde_json::Value> for SqlValue {
    type Error = JoblyError;

    fn try_from(value: serde_json::Value) -> JoblyResult<Self> {
        use serde_json::Value;
        match value {
            Value::Null => Ok(SqlValue::Null),
            Value::Bool(b) => Ok(SqlValue::Bool(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(SqlValue::Int(i)),
                None => n
                    .as_f64()
                    .map(SqlValue::Float)
                    .ok_or_else(|| JoblyError::validation(format!("unsupported number: {n}"))),
            },
            Value::String(s) => Ok(SqlValue::Text(s)),
            Value::Array(_) | Value::Object(_) => Err(JoblyError::validation(
                "expected a scalar value, got an array or object",
            )),
        }
    }
}

// ─── ToSql ──────────────────────────────────────────────────────────────────

type BindResult = Result<IsNull, Box<dyn Error + Sync + Send>>;

fn is_text(ty: &Type) -> bool {
    <String as ToSql>::accepts(ty)
}

fn mismatch(kind: &str, ty: &Type) -> Box<dyn Error + Sync + Send> {
    format!("cannot bind {kind} value to column of type {ty}").into()
}

fn bind_int(v: i64, ty: &Type, out: &mut BytesMut) -> BindResult {
    match *ty {
        Type::INT2 => i16::try_from(v)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(v)?.to_sql(ty, out),
        Type::INT8 => v.to_sql(ty, out),
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::FLOAT8 => (v as f64).to_sql(ty, out),
        Type::NUMERIC => Decimal::from(v).to_sql(ty, out),
        _ if is_text(ty) => v.to_string().to_sql(ty, out),
        _ => Err(mismatch("integer", ty)),
    }
}

fn bind_float(v: f64, ty: &Type, out: &mut BytesMut) -> BindResult {
    match *ty {
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::FLOAT8 => v.to_sql(ty, out),
        Type::NUMERIC => Decimal::try_from(v)?.to_sql(ty, out),
        Type::INT2 | Type::INT4 | Type::INT8 if v.is_finite() && v.fract() == 0.0 => {
            bind_int(v as i64, ty, out)
        }
        _ if is_text(ty) => v.to_string().to_sql(ty, out),
        _ => Err(mismatch("float", ty)),
    }
}

fn bind_text(s: &str, ty: &Type, out: &mut BytesMut) -> BindResult {
    match *ty {
        _ if is_text(ty) => s.to_sql(ty, out),
        Type::INT2 | Type::INT4 | Type::INT8 => bind_int(s.trim().parse::<i64>()?, ty, out),
        Type::FLOAT4 | Type::FLOAT8 => bind_float(s.trim().parse::<f64>()?, ty, out),
        Type::NUMERIC => Decimal::from_str(s.trim())?.to_sql(ty, out),
        Type::BOOL => match parse_flag(s) {
            Some(b) => b.to_sql(ty, out),
            None => Err(format!("cannot parse {s:?} as boolean").into()),
        },
        _ => Err(mismatch("text", ty)),
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> BindResult {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Bool(b) => match *ty {
                Type::BOOL => b.to_sql(ty, out),
                _ if is_text(ty) => b.to_string().to_sql(ty, out),
                _ => Err(mismatch("boolean", ty)),
            },
            SqlValue::Int(v) => bind_int(*v, ty, out),
            SqlValue::Float(v) => bind_float(*v, ty, out),
            SqlValue::Text(s) => bind_text(s, ty, out),
        }
    }

    // Conversion is decided per column type in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_postgres::types::FromSql;

    fn encode(value: &SqlValue, ty: &Type) -> BytesMut {
        let mut buf = BytesMut::new();
        value.to_sql(ty, &mut buf).unwrap();
        buf
    }

    #[test]
    fn deserializes_json_scalars() {
        let values: Vec<SqlValue> =
            serde_json::from_str(r#"[null, true, 32, 2.5, "Aliya"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                SqlValue::Null,
                SqlValue::Bool(true),
                SqlValue::Int(32),
                SqlValue::Float(2.5),
                SqlValue::Text("Aliya".into()),
            ]
        );
    }

    #[test]
    fn json_containers_are_rejected() {
        let err = SqlValue::try_from(serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, JoblyError::Validation(_)));
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(SqlValue::from("2").to_number(), Some(SqlValue::Int(2)));
        assert_eq!(SqlValue::from(" 2.5 ").to_number(), Some(SqlValue::Float(2.5)));
        assert_eq!(SqlValue::Int(7).to_number(), Some(SqlValue::Int(7)));
        assert_eq!(SqlValue::from("many").to_number(), None);
        assert_eq!(SqlValue::from("NaN").to_number(), None);
        assert_eq!(SqlValue::Bool(true).to_number(), None);
        assert_eq!(SqlValue::Null.to_number(), None);
    }

    #[test]
    fn flag_truthiness() {
        assert_eq!(SqlValue::Bool(true).truthiness(), Some(true));
        assert_eq!(SqlValue::from("TRUE").truthiness(), Some(true));
        assert_eq!(SqlValue::from("false").truthiness(), Some(false));
        assert_eq!(SqlValue::from("").truthiness(), Some(false));
        assert_eq!(SqlValue::Int(0).truthiness(), Some(false));
        assert_eq!(SqlValue::from("yes please").truthiness(), None);
        assert_eq!(SqlValue::Null.truthiness(), None);
    }

    #[test]
    fn binds_int_into_int4() {
        let buf = encode(&SqlValue::Int(32), &Type::INT4);
        assert_eq!(i32::from_sql(&Type::INT4, &buf).unwrap(), 32);
    }

    #[test]
    fn binds_text_into_int4() {
        let buf = encode(&SqlValue::from("50000"), &Type::INT4);
        assert_eq!(i32::from_sql(&Type::INT4, &buf).unwrap(), 50000);
    }

    #[test]
    fn binds_text_into_numeric() {
        let buf = encode(&SqlValue::from("0.5"), &Type::NUMERIC);
        let d = Decimal::from_sql(&Type::NUMERIC, &buf).unwrap();
        assert_eq!(d, Decimal::from_str("0.5").unwrap());
    }

    #[test]
    fn binds_integral_float_into_int8() {
        let buf = encode(&SqlValue::Float(3.0), &Type::INT8);
        assert_eq!(i64::from_sql(&Type::INT8, &buf).unwrap(), 3);
    }

    #[test]
    fn binds_number_into_text() {
        let buf = encode(&SqlValue::Int(12), &Type::TEXT);
        assert_eq!(String::from_sql(&Type::TEXT, &buf).unwrap(), "12");
    }

    #[test]
    fn null_binds_as_null() {
        let mut buf = BytesMut::new();
        let is_null = SqlValue::Null.to_sql(&Type::INT4, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
        assert!(buf.is_empty());
    }

    #[test]
    fn rejects_out_of_range_and_mismatched_values() {
        let mut buf = BytesMut::new();
        assert!(SqlValue::Int(i64::MAX).to_sql(&Type::INT4, &mut buf).is_err());
        assert!(SqlValue::Float(1.5).to_sql(&Type::INT4, &mut buf).is_err());
        assert!(SqlValue::from("abc").to_sql(&Type::INT4, &mut buf).is_err());
        assert!(SqlValue::Bool(true).to_sql(&Type::INT4, &mut buf).is_err());
    }
}
