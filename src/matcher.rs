//! Structural response matchers.
//!
//! A matcher wraps an example value together with the rule the actual
//! response must satisfy: exact equality, same type/shape, a regex-constrained
//! term, or a collection of N-or-more conforming elements. Matchers compose;
//! a collection matcher wraps an element matcher which may itself be an
//! object of nested matchers.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A structural-conformance rule around an example value.
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// The actual value must equal the example exactly.
    Exact(Value),
    /// The actual value must have the same type/shape as the example;
    /// the value itself may vary.
    Like(Value),
    /// The actual value must be a sequence of at least `minimum` elements,
    /// each conforming to `element`.
    EachLike {
        /// Rule every element must satisfy.
        element: Box<Matcher>,
        /// Minimum sequence length.
        minimum: usize,
    },
    /// The actual value must be a string matching `pattern`; `example` is
    /// what the mock provider serves.
    Term {
        /// Regex the actual string must match.
        pattern: String,
        /// Example string served by the mock.
        example: String,
    },
    /// An object whose members each carry their own rule. Members not
    /// declared here are ignored in the actual value.
    Object(BTreeMap<String, Matcher>),
}

/// A single point of divergence between an actual value and a matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// JSON path of the divergence, e.g. `$.body.price`.
    pub path: String,
    /// What the rule demanded.
    pub expected: String,
    /// What was actually found.
    pub actual: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.path, self.expected, self.actual
        )
    }
}

impl Matcher {
    /// Exact-value rule.
    pub fn exact(value: impl Into<Value>) -> Self {
        Matcher::Exact(value.into())
    }

    /// Type-level rule: same shape as the example, value free to vary.
    pub fn like(example: impl Into<Value>) -> Self {
        Matcher::Like(example.into())
    }

    /// Collection rule: a sequence of at least `minimum` elements, each
    /// conforming to `element`.
    pub fn each_like(element: Matcher, minimum: usize) -> Self {
        Matcher::EachLike {
            element: Box::new(element),
            minimum,
        }
    }

    /// Regex-constrained string rule.
    pub fn term(pattern: impl Into<String>, example: impl Into<String>) -> Self {
        Matcher::Term {
            pattern: pattern.into(),
            example: example.into(),
        }
    }

    /// Object rule from named member rules.
    pub fn object<I, K>(members: I) -> Self
    where
        I: IntoIterator<Item = (K, Matcher)>,
        K: Into<String>,
    {
        Matcher::Object(members.into_iter().map(|(k, m)| (k.into(), m)).collect())
    }

    /// The example value the mock provider serves for this rule.
    pub fn example(&self) -> Value {
        match self {
            Matcher::Exact(v) | Matcher::Like(v) => v.clone(),
            Matcher::EachLike { element, minimum } => {
                let count = (*minimum).max(1);
                Value::Array(vec![element.example(); count])
            }
            Matcher::Term { example, .. } => Value::String(example.clone()),
            Matcher::Object(members) => Value::Object(
                members
                    .iter()
                    .map(|(k, m)| (k.clone(), m.example()))
                    .collect(),
            ),
        }
    }

    /// Check an actual value against this rule, collecting every mismatch.
    pub fn matches(&self, actual: &Value) -> Result<(), Vec<Mismatch>> {
        let mut mismatches = Vec::new();
        self.check("$", actual, &mut mismatches);
        if mismatches.is_empty() {
            Ok(())
        } else {
            Err(mismatches)
        }
    }

    fn check(&self, path: &str, actual: &Value, out: &mut Vec<Mismatch>) {
        match self {
            Matcher::Exact(expected) => {
                if actual != expected {
                    out.push(Mismatch {
                        path: path.to_string(),
                        expected: expected.to_string(),
                        actual: actual.to_string(),
                    });
                }
            }
            Matcher::Like(example) => check_shape(path, example, actual, out),
            Matcher::EachLike { element, minimum } => match actual {
                Value::Array(items) => {
                    if items.len() < *minimum {
                        out.push(Mismatch {
                            path: path.to_string(),
                            expected: format!("at least {} elements", minimum),
                            actual: format!("{} elements", items.len()),
                        });
                    }
                    for (i, item) in items.iter().enumerate() {
                        element.check(&format!("{}[{}]", path, i), item, out);
                    }
                }
                other => out.push(Mismatch {
                    path: path.to_string(),
                    expected: "an array".to_string(),
                    actual: type_name(other).to_string(),
                }),
            },
            Matcher::Term { pattern, .. } => match actual {
                Value::String(s) => match Regex::new(pattern) {
                    Ok(re) if re.is_match(s) => {}
                    Ok(_) => out.push(Mismatch {
                        path: path.to_string(),
                        expected: format!("a string matching /{}/", pattern),
                        actual: format!("{:?}", s),
                    }),
                    Err(e) => out.push(Mismatch {
                        path: path.to_string(),
                        expected: format!("a valid pattern (/{}/ failed: {})", pattern, e),
                        actual: format!("{:?}", s),
                    }),
                },
                other => out.push(Mismatch {
                    path: path.to_string(),
                    expected: "a string".to_string(),
                    actual: type_name(other).to_string(),
                }),
            },
            Matcher::Object(members) => match actual {
                Value::Object(map) => {
                    for (key, rule) in members {
                        match map.get(key) {
                            Some(value) => {
                                rule.check(&format!("{}.{}", path, key), value, out);
                            }
                            None => out.push(Mismatch {
                                path: format!("{}.{}", path, key),
                                expected: "member to be present".to_string(),
                                actual: "missing".to_string(),
                            }),
                        }
                    }
                }
                other => out.push(Mismatch {
                    path: path.to_string(),
                    expected: "an object".to_string(),
                    actual: type_name(other).to_string(),
                }),
            },
        }
    }

    /// Emit the matching rules this rule contributes to the contract file,
    /// keyed by JSON path rooted at `path`.
    pub fn collect_rules(&self, path: &str, out: &mut BTreeMap<String, Value>) {
        match self {
            Matcher::Exact(_) => {}
            Matcher::Like(_) => {
                out.insert(path.to_string(), serde_json::json!({ "match": "type" }));
            }
            Matcher::EachLike { element, minimum } => {
                out.insert(
                    path.to_string(),
                    serde_json::json!({ "match": "type", "min": minimum }),
                );
                element.collect_rules(&format!("{}[*]", path), out);
            }
            Matcher::Term { pattern, .. } => {
                out.insert(
                    path.to_string(),
                    serde_json::json!({ "match": "regex", "regex": pattern }),
                );
            }
            Matcher::Object(members) => {
                for (key, rule) in members {
                    rule.collect_rules(&format!("{}.{}", path, key), out);
                }
            }
        }
    }
}

/// Type-level conformance: the actual value must mirror the example's shape.
fn check_shape(path: &str, example: &Value, actual: &Value, out: &mut Vec<Mismatch>) {
    match (example, actual) {
        (Value::Object(expected), Value::Object(found)) => {
            for (key, sub_example) in expected {
                match found.get(key) {
                    Some(sub_actual) => {
                        check_shape(&format!("{}.{}", path, key), sub_example, sub_actual, out);
                    }
                    None => out.push(Mismatch {
                        path: format!("{}.{}", path, key),
                        expected: "member to be present".to_string(),
                        actual: "missing".to_string(),
                    }),
                }
            }
        }
        (Value::Array(expected), Value::Array(found)) => {
            if let Some(first) = expected.first() {
                for (i, item) in found.iter().enumerate() {
                    check_shape(&format!("{}[{}]", path, i), first, item, out);
                }
            }
        }
        _ => {
            if type_name(example) != type_name(actual) {
                out.push(Mismatch {
                    path: path.to_string(),
                    expected: type_name(example).to_string(),
                    actual: type_name(actual).to_string(),
                });
            }
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_f64() {
                "decimal"
            } else {
                "integer"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exact_matching() {
        let matcher = Matcher::exact(json!({"id": 1}));
        assert!(matcher.matches(&json!({"id": 1})).is_ok());

        let err = matcher.matches(&json!({"id": 2})).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].path, "$");
    }

    #[test]
    fn test_like_accepts_same_shape() {
        let matcher = Matcher::like(json!({"name": "anything", "stock": 12}));

        assert!(matcher
            .matches(&json!({"name": "other", "stock": 99}))
            .is_ok());
    }

    #[test]
    fn test_like_rejects_type_change() {
        let matcher = Matcher::like(json!({"stock": 12}));

        let err = matcher.matches(&json!({"stock": "twelve"})).unwrap_err();
        assert_eq!(err[0].path, "$.stock");
        assert_eq!(err[0].expected, "integer");
    }

    #[test]
    fn test_like_rejects_missing_member() {
        let matcher = Matcher::like(json!({"name": "x", "price": 1.0}));

        let err = matcher.matches(&json!({"name": "y"})).unwrap_err();
        assert_eq!(err[0].path, "$.price");
        assert_eq!(err[0].actual, "missing");
    }

    #[test]
    fn test_like_ignores_extra_members() {
        let matcher = Matcher::like(json!({"name": "x"}));

        assert!(matcher.matches(&json!({"name": "y", "extra": true})).is_ok());
    }

    #[test]
    fn test_each_like_minimum() {
        let matcher = Matcher::each_like(Matcher::like(json!({"id": 1})), 3);

        let three = json!([{"id": 1}, {"id": 2}, {"id": 3}]);
        assert!(matcher.matches(&three).is_ok());

        let two = json!([{"id": 1}, {"id": 2}]);
        let err = matcher.matches(&two).unwrap_err();
        assert_eq!(err[0].expected, "at least 3 elements");
    }

    #[test]
    fn test_each_like_rejects_nonconforming_element() {
        let matcher = Matcher::each_like(Matcher::like(json!({"id": 1})), 1);

        let err = matcher
            .matches(&json!([{"id": 1}, {"id": "two"}]))
            .unwrap_err();
        assert_eq!(err[0].path, "$[1].id");
    }

    #[test]
    fn test_each_like_rejects_non_array() {
        let matcher = Matcher::each_like(Matcher::like(json!(1)), 1);

        let err = matcher.matches(&json!({"id": 1})).unwrap_err();
        assert_eq!(err[0].expected, "an array");
    }

    #[test]
    fn test_each_like_example_repeats_minimum() {
        let matcher = Matcher::each_like(Matcher::like(json!({"id": 1})), 3);

        let example = matcher.example();
        assert_eq!(example.as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_term_matching() {
        let matcher = Matcher::term(r"^\d{3}-\d{4}$", "555-1234");

        assert_eq!(matcher.example(), json!("555-1234"));
        assert!(matcher.matches(&json!("123-4567")).is_ok());
        assert!(matcher.matches(&json!("nope")).is_err());
        assert!(matcher.matches(&json!(42)).is_err());
    }

    #[test]
    fn test_object_composes_rules() {
        let matcher = Matcher::object([
            ("id", Matcher::like(json!(1))),
            ("status", Matcher::exact(json!("Not Found"))),
        ]);

        assert!(matcher
            .matches(&json!({"id": 9, "status": "Not Found"}))
            .is_ok());

        let err = matcher
            .matches(&json!({"id": 9, "status": "Gone"}))
            .unwrap_err();
        assert_eq!(err[0].path, "$.status");
    }

    #[test]
    fn test_collect_rules() {
        let matcher = Matcher::each_like(
            Matcher::object([
                ("id", Matcher::like(json!(1))),
                ("code", Matcher::exact(json!(404))),
            ]),
            2,
        );

        let mut rules = BTreeMap::new();
        matcher.collect_rules("$.body", &mut rules);

        assert_eq!(rules["$.body"], json!({"match": "type", "min": 2}));
        assert_eq!(rules["$.body[*].id"], json!({"match": "type"}));
        assert!(!rules.contains_key("$.body[*].code"));
    }
}
