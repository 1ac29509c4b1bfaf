//! Condition trees selecting resources for protection groups and policy rules.
//!
//! The wire shape is a JSON object keyed by field name (or a `$and` / `$or`
//! combinator), each field mapping operators to operands:
//!
//! ```json
//! {"$and": [
//!     {"aws_tag": {"$eq": {"key": "Environment", "value": "Production"}}},
//!     {"aws_region": {"$in": ["us-west-2", "us-east-1"]}}
//! ]}
//! ```
//!
//! Parsing checks structure only. Which fields and operators are allowed
//! depends on where the tree is used, so that check lives in
//! [`ConditionTree::check`] and is run by the owning entity.

use crate::error::{Result, SynthError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Where a condition tree is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// S3 bucket selection of a protection group.
    Bucket,
    /// Entity selection of a policy rule.
    Entity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionField {
    AwsTag,
    AwsAccountNativeId,
    AwsRegion,
    EntityType,
}

impl ConditionField {
    pub fn as_str(self) -> &'static str {
        match self {
            ConditionField::AwsTag => "aws_tag",
            ConditionField::AwsAccountNativeId => "aws_account_native_id",
            ConditionField::AwsRegion => "aws_region",
            ConditionField::EntityType => "entity_type",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "aws_tag" => Some(ConditionField::AwsTag),
            "aws_account_native_id" => Some(ConditionField::AwsAccountNativeId),
            "aws_region" => Some(ConditionField::AwsRegion),
            "entity_type" => Some(ConditionField::EntityType),
            _ => None,
        }
    }

    /// Operators this field accepts in the given scope.
    pub fn operators(self, scope: RuleScope) -> &'static [Operator] {
        use Operator::*;
        match (self, scope) {
            (ConditionField::AwsTag, RuleScope::Bucket) => {
                &[Eq, NotEq, Contains, NotContains, All, NotAll, In, NotIn]
            }
            (ConditionField::AwsTag, RuleScope::Entity) => &[Eq, Contains, All, In],
            (ConditionField::EntityType, RuleScope::Bucket) => &[],
            _ => &[Eq, In],
        }
    }
}

impl fmt::Display for ConditionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    NotEq,
    Contains,
    NotContains,
    All,
    NotAll,
    In,
    NotIn,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "$eq",
            Operator::NotEq => "$not_eq",
            Operator::Contains => "$contains",
            Operator::NotContains => "$not_contains",
            Operator::All => "$all",
            Operator::NotAll => "$not_all",
            Operator::In => "$in",
            Operator::NotIn => "$not_in",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "$eq" => Some(Operator::Eq),
            "$not_eq" => Some(Operator::NotEq),
            "$contains" => Some(Operator::Contains),
            "$not_contains" => Some(Operator::NotContains),
            "$all" => Some(Operator::All),
            "$not_all" => Some(Operator::NotAll),
            "$in" => Some(Operator::In),
            "$not_in" => Some(Operator::NotIn),
            _ => None,
        }
    }

    /// Whether the operand is a list of values rather than a single value.
    fn takes_list(self) -> bool {
        matches!(
            self,
            Operator::All | Operator::NotAll | Operator::In | Operator::NotIn
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity types a policy rule can target.
pub const ENTITY_TYPES: [&str; 5] = [
    "aws_rds_instance",
    "aws_ebs_volume",
    "aws_ec2_instance",
    "aws_dynamodb_table",
    "aws_rds_cluster",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub operator: Operator,
    pub operand: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Field {
        field: ConditionField,
        predicates: Vec<Predicate>,
    },
    And(Vec<ConditionTree>),
    Or(Vec<ConditionTree>),
}

/// A parsed condition tree. Clauses at one level are implicitly and-ed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct ConditionTree {
    pub clauses: Vec<Clause>,
}

impl ConditionTree {
    /// Tree with a single `field: {operator: operand}` clause.
    pub fn field(field: ConditionField, operator: Operator, operand: Value) -> Self {
        Self {
            clauses: vec![Clause::Field {
                field,
                predicates: vec![Predicate { operator, operand }],
            }],
        }
    }

    /// The tree in its JSON wire shape.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for clause in &self.clauses {
            match clause {
                Clause::Field { field, predicates } => {
                    let ops: Map<String, Value> = predicates
                        .iter()
                        .map(|p| (p.operator.as_str().to_string(), p.operand.clone()))
                        .collect();
                    map.insert(field.as_str().to_string(), Value::Object(ops));
                }
                Clause::And(trees) => {
                    map.insert("$and".into(), trees.iter().map(Self::to_json).collect());
                }
                Clause::Or(trees) => {
                    map.insert("$or".into(), trees.iter().map(Self::to_json).collect());
                }
            }
        }
        Value::Object(map)
    }

    /// Check fields, operators, and operand shapes against `scope`.
    pub fn check(&self, scope: RuleScope) -> Result<()> {
        for clause in &self.clauses {
            match clause {
                Clause::Field { field, predicates } => {
                    for p in predicates {
                        check_predicate(*field, p, scope)
                            .map_err(|e| e.within(p.operator.as_str()).within(field.as_str()))?;
                    }
                }
                Clause::And(trees) | Clause::Or(trees) => {
                    let key = if matches!(clause, Clause::And(_)) { "$and" } else { "$or" };
                    for (i, tree) in trees.iter().enumerate() {
                        tree.check(scope)
                            .map_err(|e| e.within(&format!("[{i}]")).within(key))?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn check_predicate(field: ConditionField, p: &Predicate, scope: RuleScope) -> Result<()> {
    let allowed = field.operators(scope);
    if allowed.is_empty() {
        return Err(SynthError::schema(
            "",
            format!("field '{field}' is only valid in policy rule conditions"),
        ));
    }
    if !allowed.contains(&p.operator) {
        let names: Vec<&str> = allowed.iter().map(|o| o.as_str()).collect();
        return Err(SynthError::schema(
            "",
            format!(
                "operator '{}' is not supported for '{field}' (expected one of {})",
                p.operator,
                names.join(", ")
            ),
        ));
    }

    let check_one = |value: &Value| match field {
        ConditionField::AwsTag => check_tag(value),
        ConditionField::EntityType => match value.as_str() {
            Some(s) if ENTITY_TYPES.contains(&s) => Ok(()),
            _ => Err(format!(
                "expected one of {}, got {value}",
                ENTITY_TYPES.join(", ")
            )),
        },
        ConditionField::AwsAccountNativeId | ConditionField::AwsRegion => match value.as_str() {
            Some(s) if !s.trim().is_empty() => Ok(()),
            _ => Err(format!("expected a non-empty string, got {value}")),
        },
    };

    let outcome = if p.operator.takes_list() {
        match p.operand.as_array() {
            Some(items) if !items.is_empty() => items.iter().try_for_each(check_one),
            _ => Err(format!("expected a non-empty list, got {}", p.operand)),
        }
    } else {
        check_one(&p.operand)
    };
    outcome.map_err(|message| SynthError::schema("", message))
}

fn check_tag(value: &Value) -> std::result::Result<(), String> {
    let Some(obj) = value.as_object() else {
        return Err(format!("expected a tag object {{\"key\", \"value\"}}, got {value}"));
    };
    match obj.get("key") {
        Some(Value::String(k)) if !k.is_empty() => {}
        _ => return Err("tag requires a non-empty string 'key'".to_string()),
    }
    for (k, v) in obj {
        if k != "key" && k != "value" {
            return Err(format!("unknown tag field '{k}'"));
        }
        if !v.is_string() {
            return Err(format!("tag field '{k}' must be a string"));
        }
    }
    Ok(())
}

impl TryFrom<Value> for ConditionTree {
    type Error = String;

    fn try_from(value: Value) -> std::result::Result<Self, String> {
        let Value::Object(map) = value else {
            return Err(format!("condition must be an object, got {value}"));
        };
        if map.is_empty() {
            return Err("condition must name at least one field".to_string());
        }
        let mut clauses = Vec::with_capacity(map.len());
        for (key, value) in map {
            let clause = match key.as_str() {
                "$and" | "$or" => {
                    let Value::Array(items) = value else {
                        return Err(format!("'{key}' takes a list of conditions"));
                    };
                    if items.is_empty() {
                        return Err(format!("'{key}' needs at least one condition"));
                    }
                    let trees = items
                        .into_iter()
                        .map(ConditionTree::try_from)
                        .collect::<std::result::Result<Vec<_>, _>>()
                        .map_err(|e| format!("in '{key}': {e}"))?;
                    if key == "$and" { Clause::And(trees) } else { Clause::Or(trees) }
                }
                name => {
                    let field = ConditionField::parse(name)
                        .ok_or_else(|| format!("unknown condition field '{name}'"))?;
                    let Value::Object(ops) = value else {
                        return Err(format!("'{name}' must map operators to operands"));
                    };
                    if ops.is_empty() {
                        return Err(format!("'{name}' needs at least one operator"));
                    }
                    let predicates = ops
                        .into_iter()
                        .map(|(op, operand)| {
                            Operator::parse(&op)
                                .map(|operator| Predicate { operator, operand })
                                .ok_or_else(|| format!("unknown operator '{op}' for '{name}'"))
                        })
                        .collect::<std::result::Result<Vec<_>, _>>()?;
                    Clause::Field { field, predicates }
                }
            };
            clauses.push(clause);
        }
        Ok(Self { clauses })
    }
}

impl From<ConditionTree> for Value {
    fn from(tree: ConditionTree) -> Self {
        tree.to_json()
    }
}

impl JsonSchema for ConditionTree {
    fn schema_name() -> String {
        "ConditionTree".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        <Map<String, Value>>::json_schema(generator)
    }
}
