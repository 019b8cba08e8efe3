use serde::{Deserialize, Serialize};

/// Operator a condition node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Predicate {
    /// Equal (=)
    Eq,
    /// Not equal (<>)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// IN (inline literal list)
    In,
    /// NOT IN (inline literal list)
    NotIn,
    /// IS NULL
    IsNull,
    /// IS NOT NULL
    IsNotNull,
    /// Raw SQL fragment carried in the key, values bound from an array
    X,
    /// Parenthesized group of sub-conditions
    Sub,
}

impl Predicate {
    /// Returns the SQL keyword or symbol for this predicate.
    /// X and SUB have no token of their own.
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            Predicate::Eq => "=",
            Predicate::Ne => "<>",
            Predicate::Gt => ">",
            Predicate::Gte => ">=",
            Predicate::Lt => "<",
            Predicate::Lte => "<=",
            Predicate::In => "IN",
            Predicate::NotIn => "NOT IN",
            Predicate::IsNull => "IS NULL",
            Predicate::IsNotNull => "IS NOT NULL",
            Predicate::X | Predicate::Sub => "",
        }
    }

    /// `col OP ?` comparisons bound through a single placeholder.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Predicate::Eq
                | Predicate::Ne
                | Predicate::Gt
                | Predicate::Gte
                | Predicate::Lt
                | Predicate::Lte
        )
    }

    pub fn is_membership(&self) -> bool {
        matches!(self, Predicate::In | Predicate::NotIn)
    }

    pub fn is_null_check(&self) -> bool {
        matches!(self, Predicate::IsNull | Predicate::IsNotNull)
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::X => write!(f, "X"),
            Predicate::Sub => write!(f, "SUB"),
            p => write!(f, "{}", p.sql_symbol()),
        }
    }
}

/// Boolean joiner written in front of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Conjunction {
    And,
    Or,
    /// No joiner; the first condition of every group.
    #[default]
    None,
}

impl Conjunction {
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
            Conjunction::None => "",
        }
    }
}

impl std::fmt::Display for Conjunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sql_symbol())
    }
}
