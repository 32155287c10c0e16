//! 各路由的校验规则

use serde_json::Value;

use super::model::{NewProduct, ProductChanges, ProductId, ProductReplacement};
use crate::core::{
    error::ApiError,
    validation::{
        predicates::{as_bool, as_f64, as_i64, as_text, is_boolean, is_int, is_numeric, not_empty},
        FieldRule, Location, RequestInput, Rules,
    },
};

pub const INVALID_ID: &str = "Invalid ID";
pub const NAME_REQUIRED: &str = "Product name cannot be empty";
pub const PRICE_NOT_NUMERIC: &str = "Invalid value";
pub const PRICE_REQUIRED: &str = "Product price cannot be empty";
pub const PRICE_INVALID: &str = "Invalid price";
pub const AVAILABILITY_INVALID: &str = "Invalid availability value";

/// 非整数由整数子句负责，这里只判断整数是否为正
fn is_positive_id(value: Option<&Value>) -> bool {
    !is_int(value) || value.and_then(as_i64).is_some_and(|id| id > 0)
}

fn is_positive_number(value: Option<&Value>) -> bool {
    value.and_then(as_f64).is_some_and(|price| price > 0.0)
}

fn id_rule() -> FieldRule {
    FieldRule::param("id")
        .check(is_int, INVALID_ID)
        .check(is_positive_id, INVALID_ID)
}

fn name_rule() -> FieldRule {
    FieldRule::body("name").check(not_empty, NAME_REQUIRED)
}

fn price_rule() -> FieldRule {
    FieldRule::body("price")
        .check(is_numeric, PRICE_NOT_NUMERIC)
        .check(not_empty, PRICE_REQUIRED)
        .check(is_positive_number, PRICE_INVALID)
}

fn availability_rule() -> FieldRule {
    FieldRule::body("availability").check(is_boolean, AVAILABILITY_INVALID)
}

impl Rules for ProductId {
    fn rules() -> Vec<FieldRule> {
        vec![id_rule()]
    }

    fn extract(input: &RequestInput) -> Result<Self, ApiError> {
        input.require(Location::Params, "id", as_i64).map(ProductId)
    }
}

impl Rules for NewProduct {
    fn rules() -> Vec<FieldRule> {
        vec![name_rule(), price_rule()]
    }

    fn extract(input: &RequestInput) -> Result<Self, ApiError> {
        Ok(NewProduct {
            name: input.require(Location::Body, "name", as_text)?,
            price: input.require(Location::Body, "price", as_f64)?,
        })
    }
}

impl Rules for ProductReplacement {
    fn rules() -> Vec<FieldRule> {
        vec![id_rule(), name_rule(), price_rule(), availability_rule()]
    }

    fn extract(input: &RequestInput) -> Result<Self, ApiError> {
        Ok(ProductReplacement {
            id: ProductId::extract(input)?,
            changes: ProductChanges {
                name: input.require(Location::Body, "name", as_text)?,
                price: input.require(Location::Body, "price", as_f64)?,
                availability: input.require(Location::Body, "availability", as_bool)?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::{FieldError, ValidationResult};
    use serde_json::json;

    fn input(id: Option<&str>, body: Value) -> RequestInput {
        let params = id
            .map(|id| [("id".to_string(), id.to_string())].into_iter().collect())
            .unwrap_or_default();
        RequestInput::new(params, body.as_object().cloned().unwrap_or_default())
    }

    fn errors<T: Rules>(input: &RequestInput) -> Vec<FieldError> {
        ValidationResult::run(&T::rules(), input).errors().to_vec()
    }

    fn messages(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.msg.as_str()).collect()
    }

    #[test]
    fn test_create_with_empty_body_reports_four_errors() {
        let errors = errors::<NewProduct>(&input(None, json!({})));
        assert_eq!(
            messages(&errors),
            vec![NAME_REQUIRED, PRICE_NOT_NUMERIC, PRICE_REQUIRED, PRICE_INVALID]
        );
    }

    #[test]
    fn test_create_with_zero_price_reports_one_error() {
        let errors = errors::<NewProduct>(&input(None, json!({"name": "Cable", "price": 0})));
        assert_eq!(messages(&errors), vec![PRICE_INVALID]);
        assert_eq!(errors[0].value, Some(json!(0)));
    }

    #[test]
    fn test_create_with_text_price_reports_two_errors() {
        let errors = errors::<NewProduct>(&input(None, json!({"name": "Cable", "price": "hola"})));
        assert_eq!(messages(&errors), vec![PRICE_NOT_NUMERIC, PRICE_INVALID]);
    }

    #[test]
    fn test_non_numeric_scalar_price_fails_positivity_too() {
        for price in [json!(true), json!(" 5")] {
            let errors = errors::<NewProduct>(&input(None, json!({"name": "Cable", "price": price})));
            assert_eq!(messages(&errors), vec![PRICE_NOT_NUMERIC, PRICE_INVALID]);
        }
    }

    #[test]
    fn test_create_accepts_numeric_string_price() {
        let input = input(None, json!({"name": "Cable", "price": "12.5"}));
        assert!(errors::<NewProduct>(&input).is_empty());

        let product = NewProduct::extract(&input).unwrap();
        assert_eq!(product.name, "Cable");
        assert_eq!(product.price, 12.5);
    }

    #[test]
    fn test_update_with_empty_body_reports_five_errors() {
        let errors = errors::<ProductReplacement>(&input(Some("1"), json!({})));
        assert_eq!(
            messages(&errors),
            vec![
                NAME_REQUIRED,
                PRICE_NOT_NUMERIC,
                PRICE_REQUIRED,
                PRICE_INVALID,
                AVAILABILITY_INVALID
            ]
        );
    }

    #[test]
    fn test_update_extracts_all_fields() {
        let input = input(
            Some("3"),
            json!({"name": "Monitor", "price": 330, "availability": "false"}),
        );
        assert!(errors::<ProductReplacement>(&input).is_empty());

        let replacement = ProductReplacement::extract(&input).unwrap();
        assert_eq!(replacement.id, ProductId(3));
        assert_eq!(replacement.changes.price, 330.0);
        assert!(!replacement.changes.availability);
    }

    #[test]
    fn test_id_clauses_fail_independently() {
        let non_integer = errors::<ProductId>(&input(Some("not-valid-url"), json!({})));
        assert_eq!(messages(&non_integer), vec![INVALID_ID]);

        let zero = errors::<ProductId>(&input(Some("0"), json!({})));
        assert_eq!(messages(&zero), vec![INVALID_ID]);

        let negative = errors::<ProductId>(&input(Some("-4"), json!({})));
        assert_eq!(messages(&negative), vec![INVALID_ID]);

        let overflow = errors::<ProductId>(&input(Some("99999999999999999999"), json!({})));
        assert_eq!(messages(&overflow), vec![INVALID_ID]);

        assert!(errors::<ProductId>(&input(Some("12"), json!({}))).is_empty());
    }

    #[test]
    fn test_invalid_id_and_body_are_aggregated() {
        let errors = errors::<ProductReplacement>(&input(Some("abc"), json!({"name": ""})));
        assert_eq!(errors.len(), 6);
        assert_eq!(errors[0].location, Location::Params);
        assert_eq!(errors[1].path, "name");
    }
}
