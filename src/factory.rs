//! Example payload factories.
//!
//! Entity templates produce structurally complete example payloads with
//! deterministic defaults and caller-overridable fields. Defaults are a pure
//! function of (template name, field name), so repeated runs stage identical
//! interactions and the recorded contract stays stable.

use crate::error::ConfigurationError;
use crate::matcher::Matcher;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Word pool for generated names and descriptions.
const LEXICON: &[&str] = &[
    "amber", "basket", "canyon", "delta", "ember", "fabric", "garden", "harbor", "island",
    "juniper", "kettle", "lantern", "meadow", "nickel", "orchard", "pepper", "quarry", "ridge",
    "saddle", "timber", "umbrella", "velvet", "willow", "zephyr",
];

const BRANDS: &[&str] = &["Northwind", "Acme Corp", "Wilson Inc", "Fabrikam", "Contoso"];

const CATEGORIES: &[&str] = &["kitchen", "garden", "outdoor", "office", "apparel"];

/// Default-value generator attached to a template field.
#[derive(Debug, Clone)]
pub enum FieldDefault {
    /// Integer in an inclusive range.
    Integer {
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
    },
    /// Currency-like decimal in `[0, max)`, two decimal places.
    Money {
        /// Exclusive upper bound.
        max: f64,
    },
    /// Capitalized word sequence without terminal punctuation.
    Phrase {
        /// Word count.
        words: usize,
    },
    /// Capitalized word sequence ending in a period.
    Sentence {
        /// Word count.
        words: usize,
    },
    /// One token out of a fixed vocabulary.
    Token(&'static [&'static str]),
    /// A fixed value, identical in every instance.
    Fixed(Value),
}

impl FieldDefault {
    fn generate(&self, seed: u64) -> Value {
        let mut rng = StdRng::seed_from_u64(seed);
        match self {
            FieldDefault::Integer { min, max } => Value::from(rng.gen_range(*min..=*max)),
            FieldDefault::Money { max } => {
                let raw: f64 = rng.gen_range(0.0..*max);
                Value::from((raw * 100.0).round() / 100.0)
            }
            FieldDefault::Phrase { words } => Value::from(pick_words(&mut rng, *words)),
            FieldDefault::Sentence { words } => {
                Value::from(format!("{}.", pick_words(&mut rng, *words)))
            }
            FieldDefault::Token(vocabulary) => {
                Value::from(vocabulary[rng.gen_range(0..vocabulary.len())])
            }
            FieldDefault::Fixed(value) => value.clone(),
        }
    }
}

fn pick_words(rng: &mut StdRng, count: usize) -> String {
    let mut out = String::new();
    for i in 0..count {
        let word = LEXICON[rng.gen_range(0..LEXICON.len())];
        if i == 0 {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
                out.push_str(chars.as_str());
            }
        } else {
            out.push(' ');
            out.push_str(word);
        }
    }
    out
}

/// FNV-1a over template and field name; the per-field generator seed.
fn field_seed(template: &str, field: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in template.bytes().chain([b'.']).chain(field.bytes()) {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// A named record type with declared fields and their default generators.
#[derive(Debug, Clone)]
pub struct EntityTemplate {
    name: &'static str,
    fields: Vec<(&'static str, FieldDefault)>,
}

impl EntityTemplate {
    /// Template name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Build an entity with every field defaulted.
    pub fn create(&self) -> Entity {
        let mut values = Map::new();
        for (field, default) in &self.fields {
            values.insert(
                (*field).to_string(),
                default.generate(field_seed(self.name, field)),
            );
        }
        Entity {
            template: self.name,
            values,
        }
    }

    /// Build an entity with the named fields pinned and all others defaulted.
    ///
    /// Override keys must be declared by the template; an unknown key fails
    /// here, not at verification time.
    pub fn create_with(
        &self,
        overrides: &[(&str, Value)],
    ) -> Result<Entity, ConfigurationError> {
        let mut entity = self.create();
        for (field, value) in overrides {
            if !self.fields.iter().any(|(name, _)| name == field) {
                return Err(ConfigurationError::UnknownField {
                    template: self.name,
                    field: (*field).to_string(),
                });
            }
            entity.values.insert((*field).to_string(), value.clone());
        }
        Ok(entity)
    }
}

/// A structurally complete example payload produced by a template.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    template: &'static str,
    values: Map<String, Value>,
}

impl Entity {
    /// Field value, if declared.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Field value as a string slice.
    pub fn string(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(Value::as_str)
    }

    /// Field value as a float.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.values.get(field).and_then(Value::as_f64)
    }

    /// The payload as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }

    /// Type-level matcher: every field must be present with the same shape,
    /// values free to vary. The mock serves this entity's values verbatim.
    pub fn like(&self) -> Matcher {
        Matcher::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), Matcher::Like(v.clone())))
                .collect(),
        )
    }

    /// Exact-value matcher over the whole payload.
    pub fn exact(&self) -> Matcher {
        Matcher::Exact(self.to_value())
    }
}

/// Product in its current (v2/v3) API shape.
pub fn product() -> EntityTemplate {
    EntityTemplate {
        name: "product",
        fields: vec![
            ("id", FieldDefault::Integer { min: 1, max: 9999 }),
            ("name", FieldDefault::Phrase { words: 3 }),
            ("description", FieldDefault::Sentence { words: 8 }),
            ("price", FieldDefault::Money { max: 500.0 }),
            ("discount", FieldDefault::Money { max: 100.0 }),
            ("rating", FieldDefault::Money { max: 5.0 }),
            ("stock", FieldDefault::Integer { min: 0, max: 999 }),
            ("category_id", FieldDefault::Integer { min: 1, max: 50 }),
            ("brand_id", FieldDefault::Integer { min: 1, max: 50 }),
        ],
    }
}

/// Product in the legacy (v1) API shape.
pub fn legacy_product() -> EntityTemplate {
    EntityTemplate {
        name: "legacy_product",
        fields: vec![
            ("id", FieldDefault::Integer { min: 1, max: 9999 }),
            ("title", FieldDefault::Phrase { words: 4 }),
            ("description", FieldDefault::Sentence { words: 10 }),
            ("brand", FieldDefault::Token(BRANDS)),
            ("category", FieldDefault::Token(CATEGORIES)),
            ("price", FieldDefault::Money { max: 500.0 }),
            ("discount", FieldDefault::Money { max: 100.0 }),
            ("rating", FieldDefault::Money { max: 5.0 }),
            ("stock", FieldDefault::Integer { min: 0, max: 999 }),
        ],
    }
}

/// Body served with a 404.
pub fn not_found_error() -> EntityTemplate {
    EntityTemplate {
        name: "not_found_error",
        fields: vec![
            ("code", FieldDefault::Fixed(Value::from(404))),
            ("status", FieldDefault::Fixed(Value::from("Not Found"))),
        ],
    }
}

/// Body served with a 428.
pub fn precondition_required_error() -> EntityTemplate {
    EntityTemplate {
        name: "precondition_required_error",
        fields: vec![
            ("code", FieldDefault::Fixed(Value::from(428))),
            (
                "status",
                FieldDefault::Fixed(Value::from("Precondition Required")),
            ),
        ],
    }
}

/// List pagination metadata carried in the `X-Pagination` response header.
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    /// Total matching records.
    pub total: u32,
    /// Total pages at the current page size.
    pub total_pages: u32,
    /// First page number.
    pub first_page: u32,
    /// Last page number.
    pub last_page: u32,
    /// Current page number.
    pub page: u32,
}

impl Pagination {
    /// Metadata for an empty result set.
    pub fn empty() -> Self {
        Self {
            total: 0,
            total_pages: 0,
            first_page: 0,
            last_page: 0,
            page: 0,
        }
    }

    /// Metadata for `total` records fitting on one page.
    pub fn single_page(total: u32) -> Self {
        Self {
            total,
            total_pages: 1,
            first_page: 1,
            last_page: 1,
            page: 1,
        }
    }

    /// The JSON header value.
    pub fn header_value(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Baseline response-header set that individual tests extend or override.
#[derive(Debug, Clone, Default)]
pub struct HeadersTemplate {
    headers: BTreeMap<String, Matcher>,
}

impl HeadersTemplate {
    /// The baseline set: a JSON content type.
    pub fn baseline() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(
            "Content-Type".to_string(),
            Matcher::exact("application/json"),
        );
        Self { headers }
    }

    /// Attach pagination metadata.
    pub fn with_pagination(mut self, pagination: &Pagination) -> Self {
        self.headers.insert(
            "X-Pagination".to_string(),
            Matcher::exact(pagination.header_value()),
        );
        self
    }

    /// Set or replace a header rule.
    pub fn set(mut self, name: impl Into<String>, matcher: Matcher) -> Self {
        self.headers.insert(name.into(), matcher);
        self
    }

    /// The header rules, by name.
    pub fn entries(self) -> BTreeMap<String, Matcher> {
        self.headers
    }
}
