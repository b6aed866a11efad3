//! Multi-row `INSERT ... VALUES ... RETURNING` builder.

use crate::client::{GenericClient, RowCursor};
use crate::error::{BatchError, BatchResult};
use crate::param::{Param, ParamList};

/// Builds a single `INSERT INTO table (...) VALUES (...),(...) RETURNING col;` statement that
/// inserts many rows into the same table, and executes it.
///
/// # Example
///
/// ```ignore
/// use pgmulti::{MultiInserter, params};
///
/// let mut inserter = MultiInserter::new("users", "name,age", Some("id"))?;
/// inserter.add(params!["alice", 30_i32])?;
/// inserter.add(params!["bob", 40_i32])?;
///
/// // INSERT INTO users (name,age) VALUES ($1,$2),($3,$4) RETURNING id;
/// let ids: Vec<i64> = inserter.insert(&client).await?;
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct MultiInserter {
    /// Table name
    table: String,
    /// Comma-separated column list, rendered verbatim
    fields: String,
    /// Single RETURNING column
    returning: Option<String>,
    /// Number of columns in `fields`
    field_count: usize,
    /// Accumulated rows, each exactly `field_count` long
    rows: Vec<Vec<Param>>,
}

impl MultiInserter {
    /// Create a new inserter for `table` with the comma-separated column list `fields`.
    ///
    /// `returning_column` names a column to emit in a `RETURNING` clause; it must be a
    /// `smallint`, `integer` or `bigint` column. `None` or an empty string omits the clause.
    pub fn new(table: &str, fields: &str, returning_column: Option<&str>) -> BatchResult<Self> {
        Self::with_capacity(table, fields, returning_column, 0)
    }

    /// Like [`MultiInserter::new`], reserving room for `rows` rows.
    pub fn with_capacity(
        table: &str,
        fields: &str,
        returning_column: Option<&str>,
        rows: usize,
    ) -> BatchResult<Self> {
        let field_count = fields.split(',').count();
        if table.is_empty() || fields.is_empty() || field_count == 0 {
            return Err(BatchError::configuration("empty table name or fields list"));
        }

        let returning = returning_column.filter(|col| !col.is_empty());
        if let Some(col) = returning
            && col.contains(',')
        {
            return Err(BatchError::configuration(format!(
                "return column must be singular, but got {col:?}"
            )));
        }

        Ok(Self {
            table: table.to_string(),
            fields: fields.to_string(),
            returning: returning.map(str::to_string),
            field_count,
            rows: Vec::with_capacity(rows),
        })
    }

    /// Target table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Column list as given at construction.
    pub fn fields(&self) -> &str {
        &self.fields
    }

    /// Number of values each row must carry.
    pub fn field_count(&self) -> usize {
        self.field_count
    }

    /// The `RETURNING` column, if any.
    pub fn returning(&self) -> Option<&str> {
        self.returning.as_deref()
    }

    /// Number of rows added so far.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows have been added.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Register another row to be included in the insert.
    ///
    /// Rows are inserted in the order they are added. A row with the wrong number of values is
    /// rejected and leaves previously added rows untouched.
    pub fn add(&mut self, row: Vec<Param>) -> BatchResult<()> {
        if row.len() != self.field_count {
            return Err(BatchError::FieldCountMismatch {
                got: row.len(),
                expected: self.field_count,
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Render the SQL text without parameters.
    pub fn to_sql(&self) -> String {
        self.build().0
    }

    /// Render the statement and the flattened, row-major parameter list.
    pub(crate) fn build(&self) -> (String, ParamList) {
        let mut params = ParamList::with_capacity(self.rows.len() * self.field_count);
        let mut values = String::new();

        for row in &self.rows {
            values.push('(');
            for (i, value) in row.iter().enumerate() {
                if i > 0 {
                    values.push(',');
                }
                let idx = params.push_param(value.clone());
                values.push('$');
                values.push_str(&idx.to_string());
            }
            values.push_str("),");
        }
        let values = values.trim_end_matches(',');

        let returning = match &self.returning {
            Some(col) => format!(" RETURNING {col}"),
            None => String::new(),
        };

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}{};",
            self.table, self.fields, values, returning
        );
        (sql, params)
    }

    /// Execute the insert on `client`.
    ///
    /// With a `RETURNING` column, returns the identifiers in the order the database produced
    /// them; otherwise returns an empty list. The result cursor is always drained and closed
    /// before returning, unless the client handed back no cursor at all, so errors raised while
    /// the statement runs reach the caller even without a `RETURNING` column.
    ///
    /// Fails with [`BatchError::EmptyBatch`] without touching the client if no rows were added.
    pub async fn insert<C: GenericClient>(self, client: &C) -> BatchResult<Vec<i64>> {
        if self.rows.is_empty() {
            return Err(BatchError::EmptyBatch);
        }

        let (sql, params) = self.build();
        let refs = params.as_refs();
        let Some(mut cursor) = client.query_cursor(&sql, &refs).await? else {
            return Ok(Vec::new());
        };

        let scanned = match self.returning {
            Some(_) => collect_ids(&mut cursor, self.rows.len()).await,
            None => Ok(Vec::new()),
        };
        let closed = cursor.close().await;

        let ids = scanned?;
        closed?;
        Ok(ids)
    }
}

async fn collect_ids<R: RowCursor>(cursor: &mut R, expected: usize) -> BatchResult<Vec<i64>> {
    let mut ids = Vec::with_capacity(expected);
    while cursor.advance().await? {
        ids.push(cursor.scan_id()?);
    }
    Ok(ids)
}
