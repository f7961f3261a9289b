use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ConditionOperator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "<>")]
    NotEqual,
    #[serde(rename = "includesAny")]
    IncludesAny,
    #[serde(rename = "includesNone")]
    IncludesNone,
    #[serde(rename = "matchAlways")]
    MatchAlways,
    #[serde(rename = "isEmpty")]
    IsEmpty,
    #[serde(rename = "exists")]
    Exists,
}

impl std::str::FromStr for ConditionOperator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(ConditionOperator::Equal),
            "<>" => Ok(ConditionOperator::NotEqual),
            "includesAny" => Ok(ConditionOperator::IncludesAny),
            "includesNone" => Ok(ConditionOperator::IncludesNone),
            "matchAlways" => Ok(ConditionOperator::MatchAlways),
            "isEmpty" => Ok(ConditionOperator::IsEmpty),
            "exists" => Ok(ConditionOperator::Exists),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum StateSet {
    Single(String),
    Multiple(Vec<String>),
}

impl StateSet {
    fn contains(&self, state: &str) -> bool {
        match self {
            StateSet::Single(value) => value == state,
            StateSet::Multiple(values) => values.iter().any(|v| v == state),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OperatorCondition {
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: Option<StateSet>,
}

impl OperatorCondition {
    pub fn evaluate(&self, state: &str) -> bool {
        match self.operator {
            ConditionOperator::Equal | ConditionOperator::IncludesAny => {
                self.value.as_ref().is_some_and(|v| v.contains(state))
            }
            ConditionOperator::NotEqual | ConditionOperator::IncludesNone => {
                self.value.as_ref().is_some_and(|v| !v.contains(state))
            }
            ConditionOperator::MatchAlways | ConditionOperator::Exists => true,
            ConditionOperator::IsEmpty => false,
        }
    }

    pub fn evaluate_option(&self, state: Option<&str>) -> bool {
        match self.operator {
            ConditionOperator::IsEmpty => state.is_none(),
            ConditionOperator::Exists => state.is_some(),
            ConditionOperator::MatchAlways => true,
            _ => state.is_some_and(|s| self.evaluate(s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Pattern {
    pub pattern: String,
}

impl Pattern {
    /// Invalid expressions never match.
    pub fn is_match(&self, state: &str) -> bool {
        regex::Regex::new(&self.pattern)
            .map(|re| re.is_match(state))
            .unwrap_or(false)
    }
}

/// A condition on an entity's state string: a literal, a regex pattern or an operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum StateCondition {
    Value(String),
    Pattern(Pattern),
    Operator(OperatorCondition),
}

impl StateCondition {
    pub fn evaluate(&self, state: &str) -> bool {
        match self {
            StateCondition::Value(value) => value == state,
            StateCondition::Pattern(pattern) => pattern.is_match(state),
            StateCondition::Operator(condition) => condition.evaluate(state),
        }
    }

    pub fn evaluate_option(&self, state: Option<&str>) -> bool {
        match self {
            StateCondition::Value(value) => state == Some(value.as_str()),
            StateCondition::Pattern(pattern) => state.is_some_and(|s| pattern.is_match(s)),
            StateCondition::Operator(condition) => condition.evaluate_option(state),
        }
    }
}
