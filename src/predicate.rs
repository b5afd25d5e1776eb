//! Immutable boolean expressions over a joined member/team row.
//!
//! A [`Predicate`] is either the match-all literal, an atomic comparison of a
//! [`Column`] against an [`Operand`], a range or membership test, a null
//! test, or a logical combination of other predicates. Operands are literal
//! [`Value`]s or uncorrelated subqueries over the member/team join.
//!
//! Predicates render to parameterised SQL through [`Predicate::to_sql`] and
//! can also be evaluated in memory against anything implementing [`Record`];
//! both paths follow SQL three-valued logic so they agree on rows holding
//! nulls. Subqueries need the rows they range over: use
//! [`Predicate::matches_within`], as [`Predicate::matches`] treats every
//! subquery as unknown.

use rusqlite::types::{ToSql, ToSqlOutput};
use std::cmp::Ordering;
use std::fmt;

/// Attributes of the member ⟕ team row that predicates may refer to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    MemberId,
    Username,
    Age,
    TeamId,
    TeamName,
}

impl Column {
    /// Qualified column reference inside the outermost member/team join.
    pub const fn sql(self) -> &'static str {
        match self {
            Column::MemberId => "m.member_id",
            Column::Username => "m.username",
            Column::Age => "m.age",
            Column::TeamId => "m.team_id",
            Column::TeamName => "t.name",
        }
    }

    const fn parts(self) -> (&'static str, &'static str) {
        match self {
            Column::MemberId => ("m", "member_id"),
            Column::Username => ("m", "username"),
            Column::Age => ("m", "age"),
            Column::TeamId => ("m", "team_id"),
            Column::TeamName => ("t", "name"),
        }
    }

    /// Reference at subquery nesting `depth`; each level gets its own aliases.
    fn sql_at(self, depth: usize) -> String {
        if depth == 0 {
            return self.sql().to_owned();
        }
        let (table, name) = self.parts();
        format!("{table}{depth}.{name}")
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

/// Literal operand of an atomic comparison.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Integer(i64),
    Text(String),
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Value::Integer(i) => i.to_sql(),
            Value::Text(s) => s.to_sql(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Text(s) => write!(f, "'{s}'"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}
impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}
impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

// values seen during in-memory evaluation; averages are real numbers
#[derive(Clone, Debug, PartialEq)]
enum Scalar {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Scalar {
    /// Numbers compare numerically; mixed numbers and text have no order.
    fn compare(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Integer(l), Scalar::Integer(r)) => Some(l.cmp(r)),
            (Scalar::Integer(l), Scalar::Real(r)) => (*l as f64).partial_cmp(r),
            (Scalar::Real(l), Scalar::Integer(r)) => l.partial_cmp(&(*r as f64)),
            (Scalar::Real(l), Scalar::Real(r)) => l.partial_cmp(r),
            (Scalar::Text(l), Scalar::Text(r)) => Some(l.as_bytes().cmp(r.as_bytes())),
            _ => None,
        }
    }
}

impl From<&Value> for Scalar {
    fn from(value: &Value) -> Self {
        match value {
            Value::Integer(i) => Scalar::Integer(*i),
            Value::Text(s) => Scalar::Text(s.clone()),
        }
    }
}

/// Comparison operator of an atomic predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    /// Substring test on text columns.
    Contains,
}

impl ComparisonOp {
    fn evaluate(self, left: &Scalar, right: &Scalar) -> Option<bool> {
        match self {
            ComparisonOp::Contains => match (left, right) {
                (Scalar::Text(haystack), Scalar::Text(needle)) => {
                    Some(haystack.contains(needle.as_str()))
                }
                _ => None,
            },
            ComparisonOp::Equal => left.compare(right).map(Ordering::is_eq),
            ComparisonOp::NotEqual => left.compare(right).map(Ordering::is_ne),
            ComparisonOp::LessThan => left.compare(right).map(Ordering::is_lt),
            ComparisonOp::LessThanOrEqual => left.compare(right).map(Ordering::is_le),
            ComparisonOp::GreaterThan => left.compare(right).map(Ordering::is_gt),
            ComparisonOp::GreaterThanOrEqual => left.compare(right).map(Ordering::is_ge),
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::NotEqual => "<>",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessThanOrEqual => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterThanOrEqual => ">=",
            ComparisonOp::Contains => "contains",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Aggregate {
    Max,
    Min,
    Avg,
}

impl Aggregate {
    const fn sql(self) -> &'static str {
        match self {
            Aggregate::Max => "max",
            Aggregate::Min => "min",
            Aggregate::Avg => "avg",
        }
    }

    // nulls are skipped; nothing left gives NULL
    fn apply(self, values: Vec<Scalar>) -> Option<Scalar> {
        match self {
            Aggregate::Max => values
                .into_iter()
                .reduce(|a, b| if b.compare(&a) == Some(Ordering::Greater) { b } else { a }),
            Aggregate::Min => values
                .into_iter()
                .reduce(|a, b| if b.compare(&a) == Some(Ordering::Less) { b } else { a }),
            Aggregate::Avg => {
                let mut sum = 0.0;
                let mut count = 0usize;
                for value in values {
                    match value {
                        Scalar::Integer(i) => sum += i as f64,
                        Scalar::Real(r) => sum += r,
                        // SQLite reads text as 0 here
                        Scalar::Text(_) => (),
                    }
                    count += 1;
                }
                (count > 0).then(|| Scalar::Real(sum / count as f64))
            }
        }
    }
}

/// `select <column> from member m left join team t … where <filter>`, uncorrelated.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subquery {
    pub column: Column,
    pub filter: Predicate,
}

impl Subquery {
    pub fn new(column: Column, filter: Predicate) -> Self {
        Self { column, filter }
    }

    fn write_sql(&self, select: &str, depth: usize, out: &mut String, params: &mut Vec<Value>) {
        let inner = depth + 1;
        out.push_str("(select ");
        out.push_str(select);
        out.push_str(&format!(" from member m{inner} left join team t{inner}"));
        out.push_str(&format!(" on t{inner}.team_id = m{inner}.team_id where "));
        self.filter.write_sql(inner, out, params);
        out.push(')');
    }

    fn values<R: Record>(&self, population: &[R]) -> Vec<Option<Scalar>> {
        population
            .iter()
            .filter(|r| self.filter.evaluate(*r, Some(population)) == Some(true))
            .map(|r| r.value(self.column).as_ref().map(Scalar::from))
            .collect()
    }
}

/// Right-hand side of an atomic comparison.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    Value(Value),
    /// A single aggregated value computed by a subquery.
    Scalar(Aggregate, Box<Subquery>),
}

impl Operand {
    fn write_sql(&self, depth: usize, out: &mut String, params: &mut Vec<Value>) {
        match self {
            Operand::Value(value) => {
                out.push('?');
                params.push(value.clone());
            }
            Operand::Scalar(aggregate, subquery) => {
                let select = format!("{}({})", aggregate.sql(), subquery.column.sql_at(depth + 1));
                subquery.write_sql(&select, depth, out, params);
            }
        }
    }

    fn evaluate<R: Record>(&self, population: Option<&[R]>) -> Option<Scalar> {
        match self {
            Operand::Value(value) => Some(Scalar::from(value)),
            Operand::Scalar(aggregate, subquery) => {
                let values = subquery.values(population?).into_iter().flatten().collect();
                aggregate.apply(values)
            }
        }
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}
impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::Value(Value::Integer(value))
    }
}
impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Operand::Value(Value::from(value))
    }
}
impl From<String> for Operand {
    fn from(value: String) -> Self {
        Operand::Value(Value::Text(value))
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(value) => write!(f, "{value}"),
            Operand::Scalar(aggregate, subquery) => write!(
                f,
                "{}({} where {})",
                aggregate.sql(),
                subquery.column,
                subquery.filter
            ),
        }
    }
}

/// Set tested by an `in` predicate.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum InSet {
    Values(Vec<Value>),
    Subquery(Box<Subquery>),
}

/// Row shape a predicate can be evaluated against without the database.
pub trait Record {
    /// `None` stands for SQL NULL.
    fn value(&self, column: Column) -> Option<Value>;
}

/// A `WHERE` clause body together with its positional parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// Matches every row.
    True,
    Compare {
        column: Column,
        op: ComparisonOp,
        operand: Operand,
    },
    /// Inclusive on both ends.
    Between {
        column: Column,
        low: Value,
        high: Value,
    },
    In {
        column: Column,
        set: InSet,
    },
    IsNull(Column),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn compare(column: Column, op: ComparisonOp, operand: impl Into<Operand>) -> Self {
        Predicate::Compare {
            column,
            op,
            operand: operand.into(),
        }
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, Predicate::True)
    }

    /// Conjunction; `True` is the identity and nested conjunctions are flattened.
    #[must_use]
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::True, p) | (p, Predicate::True) => p,
            (Predicate::And(mut left), Predicate::And(right)) => {
                left.extend(right);
                Predicate::And(left)
            }
            (Predicate::And(mut left), p) => {
                left.push(p);
                Predicate::And(left)
            }
            (p, Predicate::And(right)) => {
                let mut clauses = Vec::with_capacity(right.len() + 1);
                clauses.push(p);
                clauses.extend(right);
                Predicate::And(clauses)
            }
            (l, r) => Predicate::And(vec![l, r]),
        }
    }

    /// Disjunction; `True` absorbs and nested disjunctions are flattened.
    #[must_use]
    pub fn or(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::True, _) | (_, Predicate::True) => Predicate::True,
            (Predicate::Or(mut left), Predicate::Or(right)) => {
                left.extend(right);
                Predicate::Or(left)
            }
            (Predicate::Or(mut left), p) => {
                left.push(p);
                Predicate::Or(left)
            }
            (p, Predicate::Or(right)) => {
                let mut clauses = Vec::with_capacity(right.len() + 1);
                clauses.push(p);
                clauses.extend(right);
                Predicate::Or(clauses)
            }
            (l, r) => Predicate::Or(vec![l, r]),
        }
    }

    #[must_use]
    pub fn not(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }

    /// Left fold with AND over the present clauses; no clause at all gives `True`.
    pub fn all<I>(clauses: I) -> Predicate
    where
        I: IntoIterator<Item = Option<Predicate>>,
    {
        clauses
            .into_iter()
            .flatten()
            .fold(Predicate::True, Predicate::and)
    }

    /// Parameters appear in the order their placeholders do, subqueries included.
    pub fn to_sql(&self) -> SqlFragment {
        let mut sql = String::new();
        let mut params = Vec::new();
        self.write_sql(0, &mut sql, &mut params);
        SqlFragment { sql, params }
    }

    fn write_sql(&self, depth: usize, out: &mut String, params: &mut Vec<Value>) {
        match self {
            Predicate::True => out.push_str("1 = 1"),
            Predicate::Compare {
                column,
                op: ComparisonOp::Contains,
                operand,
            } => {
                out.push_str("instr(");
                out.push_str(&column.sql_at(depth));
                out.push_str(", ");
                operand.write_sql(depth, out, params);
                out.push_str(") > 0");
            }
            Predicate::Compare { column, op, operand } => {
                out.push_str(&column.sql_at(depth));
                out.push(' ');
                out.push_str(&op.to_string());
                out.push(' ');
                operand.write_sql(depth, out, params);
            }
            Predicate::Between { column, low, high } => {
                out.push_str(&column.sql_at(depth));
                out.push_str(" between ? and ?");
                params.push(low.clone());
                params.push(high.clone());
            }
            // an empty list never matches, not even a null
            Predicate::In {
                set: InSet::Values(values),
                ..
            } if values.is_empty() => out.push_str("1 = 0"),
            Predicate::In {
                column,
                set: InSet::Values(values),
            } => {
                out.push_str(&column.sql_at(depth));
                out.push_str(" in (");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push('?');
                    params.push(value.clone());
                }
                out.push(')');
            }
            Predicate::In {
                column,
                set: InSet::Subquery(subquery),
            } => {
                out.push_str(&column.sql_at(depth));
                out.push_str(" in ");
                subquery.write_sql(&subquery.column.sql_at(depth + 1), depth, out, params);
            }
            Predicate::IsNull(column) => {
                out.push_str(&column.sql_at(depth));
                out.push_str(" IS NULL");
            }
            Predicate::And(clauses) => {
                Self::write_joined(clauses, " AND ", "1 = 1", depth, out, params)
            }
            Predicate::Or(clauses) => {
                Self::write_joined(clauses, " OR ", "1 = 0", depth, out, params)
            }
            Predicate::Not(inner) => {
                out.push_str("NOT (");
                inner.write_sql(depth, out, params);
                out.push(')');
            }
        }
    }

    fn write_joined(
        clauses: &[Predicate],
        separator: &str,
        empty: &str,
        depth: usize,
        out: &mut String,
        params: &mut Vec<Value>,
    ) {
        if clauses.is_empty() {
            out.push_str(empty);
            return;
        }
        out.push('(');
        for (i, clause) in clauses.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            clause.write_sql(depth, out, params);
        }
        out.push(')');
    }

    /// True only when the predicate is definitely true for `record`.
    /// Subqueries have no rows to range over here and evaluate to unknown.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.evaluate(record, None) == Some(true)
    }

    /// Like [`matches`](Self::matches), with subqueries ranging over `population`.
    pub fn matches_within<R: Record>(&self, record: &R, population: &[R]) -> bool {
        self.evaluate(record, Some(population)) == Some(true)
    }

    // None is SQL's "unknown"
    fn evaluate<R: Record>(&self, record: &R, population: Option<&[R]>) -> Option<bool> {
        match self {
            Predicate::True => Some(true),
            Predicate::Compare { column, op, operand } => {
                let left = Scalar::from(&record.value(*column)?);
                let right = operand.evaluate(population)?;
                op.evaluate(&left, &right)
            }
            Predicate::Between { column, low, high } => {
                let value = Scalar::from(&record.value(*column)?);
                let above = value.compare(&Scalar::from(low))?.is_ge();
                let below = value.compare(&Scalar::from(high))?.is_le();
                Some(above && below)
            }
            Predicate::In { column, set } => {
                let candidates: Vec<Option<Scalar>> = match set {
                    InSet::Values(values) => values.iter().map(|v| Some(Scalar::from(v))).collect(),
                    InSet::Subquery(subquery) => subquery.values(population?),
                };
                if candidates.is_empty() {
                    return Some(false);
                }
                let value = Scalar::from(&record.value(*column)?);
                let mut unknown = false;
                for candidate in &candidates {
                    match candidate.as_ref().and_then(|c| value.compare(c)) {
                        Some(Ordering::Equal) => return Some(true),
                        None => unknown = true,
                        Some(_) => (),
                    }
                }
                if unknown { None } else { Some(false) }
            }
            Predicate::IsNull(column) => Some(record.value(*column).is_none()),
            Predicate::And(clauses) => {
                let mut unknown = false;
                for clause in clauses {
                    match clause.evaluate(record, population) {
                        Some(false) => return Some(false),
                        None => unknown = true,
                        Some(true) => (),
                    }
                }
                if unknown { None } else { Some(true) }
            }
            Predicate::Or(clauses) => {
                let mut unknown = false;
                for clause in clauses {
                    match clause.evaluate(record, population) {
                        Some(true) => return Some(true),
                        None => unknown = true,
                        Some(false) => (),
                    }
                }
                if unknown { None } else { Some(false) }
            }
            Predicate::Not(inner) => inner.evaluate(record, population).map(|b| !b),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::True => f.write_str("true"),
            Predicate::Compare { column, op, operand } => write!(f, "{column} {op} {operand}"),
            Predicate::Between { column, low, high } => {
                write!(f, "{column} between {low} and {high}")
            }
            Predicate::In {
                column,
                set: InSet::Values(values),
            } => {
                write!(f, "{column} in [")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            Predicate::In {
                column,
                set: InSet::Subquery(subquery),
            } => write!(f, "{column} in ({} where {})", subquery.column, subquery.filter),
            Predicate::IsNull(column) => write!(f, "{column} is null"),
            Predicate::And(clauses) | Predicate::Or(clauses) => {
                let separator = if let Predicate::And(_) = self { " && " } else { " || " };
                f.write_str("(")?;
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        f.write_str(separator)?;
                    }
                    write!(f, "{clause}")?;
                }
                f.write_str(")")
            }
            Predicate::Not(inner) => write!(f, "!({inner})"),
        }
    }
}
