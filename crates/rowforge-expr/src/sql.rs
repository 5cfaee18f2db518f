//! Translation of predicate expressions into SQL SELECT statements.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use rowforge_core::{Result, RowForgeError, RowShaped, Value};

use crate::expr::Expr;

/// Builds `SELECT ... FROM ... WHERE ...` statements for shaped types.
///
/// The column list of each shape is rendered once and cached; the cache is
/// owned by the builder, so its lifetime is the builder's.
#[derive(Debug, Default)]
pub struct SqlBuilder {
    column_cache: HashMap<TypeId, Arc<str>>,
}

impl SqlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders a SELECT over all columns of `T` filtered by `predicate`.
    ///
    /// # Errors
    ///
    /// `UnsupportedExpression` when the predicate contains a node with no SQL
    /// rendering; fatal to this call, nothing is partially translated.
    pub fn select<T: RowShaped + 'static>(&mut self, predicate: &Expr) -> Result<String> {
        let columns = self.columns::<T>();
        let where_clause = render_predicate(predicate)?;
        Ok(format!(
            "SELECT {} FROM {} WHERE {}",
            columns,
            T::SHAPE_NAME,
            where_clause
        ))
    }

    fn columns<T: RowShaped + 'static>(&mut self) -> Arc<str> {
        self.column_cache
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                debug!(shape = T::SHAPE_NAME, "rendering column list");
                let names: Vec<&str> = T::columns().iter().map(|c| c.name).collect();
                names.join(", ").into()
            })
            .clone()
    }
}

fn render_predicate(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Literal(v) => render_literal(v),

        Expr::Column(name) => Ok(name.to_string()),

        Expr::Eq(l, r) => binary(l, "=", r),
        Expr::Ne(l, r) => binary(l, "<>", r),
        Expr::Lt(l, r) => binary(l, "<", r),
        Expr::Le(l, r) => binary(l, "<=", r),
        Expr::Gt(l, r) => binary(l, ">", r),
        Expr::Ge(l, r) => binary(l, ">=", r),

        Expr::And(l, r) => Ok(format!(
            "({} AND {})",
            render_predicate(l)?,
            render_predicate(r)?
        )),
        Expr::Or(l, r) => Ok(format!(
            "({} OR {})",
            render_predicate(l)?,
            render_predicate(r)?
        )),
        Expr::Not(inner) => Ok(format!("(NOT {})", render_predicate(inner)?)),

        Expr::Add(l, r) => binary(l, "+", r),
        Expr::Sub(l, r) => binary(l, "-", r),
        Expr::Mul(l, r) => binary(l, "*", r),
        Expr::Div(l, r) => binary(l, "/", r),
        Expr::Mod(l, r) => binary(l, "%", r),

        Expr::IsNull(inner) => Ok(format!("({} IS NULL)", render_predicate(inner)?)),
        Expr::IsNotNull(inner) => Ok(format!("({} IS NOT NULL)", render_predicate(inner)?)),

        // Everything else has no SQL rendering here.
        other => Err(RowForgeError::UnsupportedExpression(format!(
            "expression kind '{}' cannot be translated to SQL",
            other.kind()
        ))),
    }
}

fn binary(left: &Expr, op: &str, right: &Expr) -> Result<String> {
    Ok(format!(
        "{} {} {}",
        render_predicate(left)?,
        op,
        render_predicate(right)?
    ))
}

fn render_literal(value: &Value) -> Result<String> {
    match value {
        Value::None => Ok("NULL".to_string()),
        Value::I64(v) => Ok(v.to_string()),
        Value::F64(v) => Ok(v.to_string()),
        Value::Bool(v) => Ok(if *v { "TRUE" } else { "FALSE" }.to_string()),
        Value::Decimal(v) => Ok(v.to_string()),
        Value::String(s) => Ok(format!("'{}'", s.replace('\'', "''"))),
        Value::DateTime(_) | Value::Date(_) => Err(RowForgeError::UnsupportedExpression(
            "temporal literals cannot be translated to SQL".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowforge_core::{Column, ColumnType};

    #[derive(Debug, Default)]
    struct User {
        id: i64,
        name: String,
        age: i64,
    }

    impl RowShaped for User {
        const SHAPE_NAME: &'static str = "User";

        fn columns() -> &'static [Column] {
            const COLUMNS: &[Column] = &[
                Column::new("Id", ColumnType::I64),
                Column::new("Name", ColumnType::String),
                Column::new("Age", ColumnType::I64),
            ];
            COLUMNS
        }

        fn apply(&mut self, field_idx: usize, value: Value) -> Result<()> {
            match field_idx {
                0 => self.id = value.as_i64().unwrap_or_default(),
                1 => self.name = value.as_str().unwrap_or_default().to_string(),
                2 => self.age = value.as_i64().unwrap_or_default(),
                _ => {}
            }
            Ok(())
        }
    }

    #[test]
    fn test_select_with_comparison() {
        let mut builder = SqlBuilder::new();
        let predicate = Expr::gt(Expr::column("Age"), Expr::int(25));
        let sql = builder.select::<User>(&predicate).unwrap();
        assert_eq!(sql, "SELECT Id, Name, Age FROM User WHERE Age > 25");
    }

    #[test]
    fn test_select_with_conjunction() {
        let mut builder = SqlBuilder::new();
        let predicate = Expr::and(
            Expr::ge(Expr::column("Age"), Expr::int(18)),
            Expr::eq(Expr::column("Name"), Expr::string("Alice")),
        );
        let sql = builder.select::<User>(&predicate).unwrap();
        assert_eq!(
            sql,
            "SELECT Id, Name, Age FROM User WHERE (Age >= 18 AND Name = 'Alice')"
        );
    }

    #[test]
    fn test_string_literal_escaping() {
        let mut builder = SqlBuilder::new();
        let predicate = Expr::eq(Expr::column("Name"), Expr::string("O'Brien"));
        let sql = builder.select::<User>(&predicate).unwrap();
        assert!(sql.contains("'O''Brien'"));
    }

    #[test]
    fn test_unsupported_node_fails() {
        let mut builder = SqlBuilder::new();
        let predicate = Expr::if_then_else(Expr::bool(true), Expr::int(1), Expr::int(0));
        let err = builder.select::<User>(&predicate).unwrap_err();
        assert!(matches!(err, RowForgeError::UnsupportedExpression(_)));
    }

    #[test]
    fn test_column_list_cached() {
        let mut builder = SqlBuilder::new();
        let predicate = Expr::is_not_null(Expr::column("Name"));
        let first = builder.select::<User>(&predicate).unwrap();
        let second = builder.select::<User>(&predicate).unwrap();
        assert_eq!(first, second);
        assert_eq!(builder.column_cache.len(), 1);
    }
}
