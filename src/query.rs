use sqlx::mysql::{MySqlQueryResult, MySqlRow};
use sqlx::{Executor, MySql};

/// Positional placeholder mark used in prepared SQL.
pub const PLACEHOLDER: &str = "?";

/// The values recovered for one (possibly multi-valued) variable occurrence,
/// in order. Always holds at least one entry; a variable that expanded to
/// nothing contributes a single empty string.
pub type ValueGroup = Vec<String>;

/// A parameterized statement recovered by reconciling a template with its
/// rendered query.
///
/// Holds the prepared SQL (literal template text with each variable region
/// replaced by positional `?` marks), one [`ValueGroup`] per variable
/// occurrence, and the original variable tokens for bookkeeping. The number
/// of `?` marks always equals the total number of recovered values.
///
/// The execution helpers bind the flattened, in-order values and run the
/// statement on any SQLx MySQL executor, so the rendered query text itself is
/// never sent to the database.
///
/// # Examples
///
/// ```rust,no_run
/// use sqlx::MySqlPool;
/// use sqlx_template_bind::build_parameterized_query;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = MySqlPool::connect("mysql://localhost/grafana").await?;
///
/// let query = build_parameterized_query(
///     "DELETE FROM sessions WHERE user_id=$uid",
///     "DELETE FROM sessions WHERE user_id=42",
/// )?;
///
/// let result = query.execute(&pool).await?;
/// println!("Deleted {} rows", result.rows_affected());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterizedQuery {
    prepared_sql: String,
    variable_inputs: Vec<ValueGroup>,
    variable_names: Vec<String>,
}

impl ParameterizedQuery {
    pub(crate) fn new(
        prepared_sql: String,
        variable_inputs: Vec<ValueGroup>,
        variable_names: Vec<String>,
    ) -> Self {
        Self {
            prepared_sql,
            variable_inputs,
            variable_names,
        }
    }

    /// The statement text with positional `?` marks in place of variables.
    pub fn prepared_sql(&self) -> &str {
        &self.prepared_sql
    }

    /// One value group per variable occurrence, left to right.
    pub fn variable_inputs(&self) -> &[ValueGroup] {
        &self.variable_inputs
    }

    /// The original variable tokens, in first-appearance order.
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    /// Flattened, in-order concatenation of all value groups — the bind
    /// parameters for [`prepared_sql`](Self::prepared_sql), one per `?` mark.
    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.variable_inputs.iter().flatten().map(String::as_str)
    }

    /// Executes the prepared statement with its recovered parameters bound
    /// positionally.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn execute<'e, E>(&self, executor: E) -> crate::Result<MySqlQueryResult>
    where
        E: Executor<'e, Database = MySql>,
    {
        let mut q = sqlx::query::<MySql>(&self.prepared_sql);
        for value in self.parameters() {
            q = q.bind(value);
        }
        Ok(q.execute(executor).await?)
    }

    /// Runs the prepared statement and returns all matching rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn fetch_all<'e, E>(&self, executor: E) -> crate::Result<Vec<MySqlRow>>
    where
        E: Executor<'e, Database = MySql>,
    {
        let mut q = sqlx::query::<MySql>(&self.prepared_sql);
        for value in self.parameters() {
            q = q.bind(value);
        }
        Ok(q.fetch_all(executor).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_flattens_groups_in_order() {
        let query = ParameterizedQuery::new(
            "SELECT * FROM t WHERE a=? AND b IN (?,?)".to_owned(),
            vec![vec!["1".to_owned()], vec!["x".to_owned(), "y".to_owned()]],
            vec!["$a".to_owned(), "$b".to_owned()],
        );
        assert_eq!(query.parameters().collect::<Vec<_>>(), ["1", "x", "y"]);
    }

    #[test]
    fn test_placeholder_count_invariant() {
        let query = ParameterizedQuery::new(
            "INSERT INTO t VALUES (?,?,?)".to_owned(),
            vec![vec!["a".to_owned()], vec!["b".to_owned(), "c".to_owned()]],
            vec!["$x".to_owned(), "$ys".to_owned()],
        );
        let marks = query.prepared_sql().matches(PLACEHOLDER).count();
        assert_eq!(marks, query.parameters().count());
    }
}
