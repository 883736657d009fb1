//! Filter and ordering expressions for PostgrestClient

/// Sort direction for `order=`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// Operator for filter expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    /// Equal to
    Eq,

    /// Not equal to
    Neq,
}

impl FilterOperator {
    /// Convert the operator to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Neq => "neq",
        }
    }
}

/// A single `column=op.value` condition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Filter {
    pub column: String,
    pub operator: FilterOperator,
    pub value: String,
}

impl Filter {
    pub fn eq(column: &str, value: &str) -> Self {
        Self {
            column: column.to_string(),
            operator: FilterOperator::Eq,
            value: value.to_string(),
        }
    }

    pub fn neq(column: &str, value: &str) -> Self {
        Self {
            column: column.to_string(),
            operator: FilterOperator::Neq,
            value: value.to_string(),
        }
    }

    /// The query-string value, e.g. `eq.CON-001`
    pub fn to_param(&self) -> String {
        format!("{}.{}", self.operator.as_str(), self.value)
    }

    /// Evaluates the condition against an already stringified column value.
    pub fn matches(&self, actual: Option<&str>) -> bool {
        match self.operator {
            FilterOperator::Eq => actual == Some(self.value.as_str()),
            FilterOperator::Neq => actual != Some(self.value.as_str()),
        }
    }
}
