//! 请求校验模块
//!
//! 每个路由声明一组 `FieldRule`，每条规则由若干 (谓词, 错误信息) 子句组成。
//! 子句之间互不短路，每个失败的子句产生一条 `FieldError`，按声明顺序汇总。

use std::collections::HashMap;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
};
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::error::ApiError;

pub const MALFORMED_BODY: &str = "Malformed JSON body";

/// 字段来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Params,
    Body,
}

/// 单条校验错误
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldError {
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "field")]
    pub kind: &'static str,
    /// 字段缺失时不输出
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub value: Option<Value>,
    pub msg: String,
    pub path: String,
    pub location: Location,
}

impl FieldError {
    pub fn new(
        location: Location,
        path: impl Into<String>,
        value: Option<Value>,
        msg: impl Into<String>,
    ) -> Self {
        Self {
            kind: "field",
            value,
            msg: msg.into(),
            path: path.into(),
            location,
        }
    }
}

pub type Predicate = fn(Option<&Value>) -> bool;

struct Clause {
    predicate: Predicate,
    message: &'static str,
}

/// 单个字段的规则链
pub struct FieldRule {
    location: Location,
    field: &'static str,
    clauses: Vec<Clause>,
}

impl FieldRule {
    pub fn param(field: &'static str) -> Self {
        Self::new(Location::Params, field)
    }

    pub fn body(field: &'static str) -> Self {
        Self::new(Location::Body, field)
    }

    fn new(location: Location, field: &'static str) -> Self {
        Self {
            location,
            field,
            clauses: Vec::new(),
        }
    }

    /// 追加一个子句
    pub fn check(mut self, predicate: Predicate, message: &'static str) -> Self {
        self.clauses.push(Clause { predicate, message });
        self
    }
}

/// 校验输入：路径参数和 JSON 请求体
#[derive(Debug, Clone, Default)]
pub struct RequestInput {
    params: Map<String, Value>,
    body: Map<String, Value>,
}

impl RequestInput {
    pub fn new(params: HashMap<String, String>, body: Map<String, Value>) -> Self {
        let params = params
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        Self { params, body }
    }

    pub fn get(&self, location: Location, field: &str) -> Option<&Value> {
        match location {
            Location::Params => self.params.get(field),
            Location::Body => self.body.get(field),
        }
    }

    /// 读取已通过校验的字段
    pub fn require<T>(
        &self,
        location: Location,
        field: &str,
        read: fn(&Value) -> Option<T>,
    ) -> Result<T, ApiError> {
        let value = self.get(location, field);
        value.and_then(read).ok_or_else(|| {
            ApiError::Validation(vec![FieldError::new(
                location,
                field,
                value.cloned(),
                "Invalid value",
            )])
        })
    }
}

/// 一次请求的校验结果，每个请求重新计算
#[derive(Debug, Default)]
pub struct ValidationResult {
    errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(rules: &[FieldRule], input: &RequestInput) -> Self {
        let mut result = Self::new();
        for rule in rules {
            result.check(rule, input);
        }
        result
    }

    pub fn check(&mut self, rule: &FieldRule, input: &RequestInput) {
        let value = input.get(rule.location, rule.field);
        for clause in &rule.clauses {
            if !(clause.predicate)(value) {
                self.errors.push(FieldError::new(
                    rule.location,
                    rule.field,
                    value.cloned(),
                    clause.message,
                ));
            }
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}

/// 路由的规则集合，以及通过校验后如何构造输入
pub trait Rules: Sized + Send {
    fn rules() -> Vec<FieldRule>;

    fn extract(input: &RequestInput) -> Result<Self, ApiError>;
}

/// 在处理器之前执行 `T` 的规则集合，失败时直接返回 400
pub struct Validated<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: Rules,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();

        // 没有路径参数的路由按空集合处理
        let params = Path::<HashMap<String, String>>::from_request_parts(&mut parts, state)
            .await
            .map(|Path(params)| params)
            .unwrap_or_default();

        let json = is_json(&parts.headers);
        let bytes = Bytes::from_request(Request::from_parts(parts, body), state).await?;
        let body = if json { parse_body(&bytes)? } else { Map::new() };

        let input = RequestInput::new(params, body);
        ValidationResult::run(&T::rules(), &input).into_result()?;
        T::extract(&input).map(Validated)
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|content_type| {
            let essence = content_type
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            essence == "application/json" || essence.ends_with("+json")
        })
        .unwrap_or(false)
}

fn parse_body(bytes: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(_) => Err(ApiError::Validation(vec![FieldError::new(
            Location::Body,
            "",
            None,
            MALFORMED_BODY,
        )])),
    }
}

/// 通用谓词与取值函数
pub mod predicates {
    use serde_json::Value;

    /// 整数：可选符号，无前导零
    pub fn is_int(value: Option<&Value>) -> bool {
        match value {
            Some(Value::String(s)) => is_int_str(s),
            Some(Value::Number(n)) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            _ => false,
        }
    }

    /// 数字或数字字符串
    pub fn is_numeric(value: Option<&Value>) -> bool {
        match value {
            Some(Value::Number(_)) => true,
            Some(Value::String(s)) => is_numeric_str(s),
            _ => false,
        }
    }

    /// 存在且文本形式非空
    pub fn not_empty(value: Option<&Value>) -> bool {
        value
            .and_then(as_text)
            .is_some_and(|text| !text.is_empty())
    }

    pub fn is_boolean(value: Option<&Value>) -> bool {
        value.and_then(as_bool).is_some()
    }

    pub fn as_i64(value: &Value) -> Option<i64> {
        match value {
            Value::String(s) if is_int_str(s) => s.parse().ok(),
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            _ => None,
        }
    }

    pub fn as_f64(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) if is_numeric_str(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            Value::Number(n) => match n.as_i64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// 标量的文本形式；null、数组和对象没有
    pub fn as_text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn strip_sign(s: &str) -> &str {
        s.strip_prefix(&['+', '-'][..]).unwrap_or(s)
    }

    fn is_int_str(s: &str) -> bool {
        let digits = strip_sign(s);
        !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && (digits == "0" || !digits.starts_with('0'))
    }

    fn is_numeric_str(s: &str) -> bool {
        let unsigned = strip_sign(s);
        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => ("", unsigned),
        };
        !fraction.is_empty()
            && fraction.bytes().all(|b| b.is_ascii_digit())
            && whole.bytes().all(|b| b.is_ascii_digit())
    }
}
