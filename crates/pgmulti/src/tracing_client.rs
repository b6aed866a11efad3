use crate::client::GenericClient;
use crate::error::BatchResult;
use tokio_postgres::types::ToSql;
use tracing::Level;

/// A `tracing`-based wrapper that emits the SQL about to be executed.
///
/// One event is emitted per statement, **before** it is sent to the wrapped client, so failed
/// statements are logged too.
///
/// Enable via the crate feature: `pgmulti = { features = ["tracing"] }`.
///
/// ```ignore
/// let client = TracingClient::new(&client).level(Level::INFO);
/// let ids = inserter.insert(&client).await?;
/// ```
#[derive(Debug, Clone)]
pub struct TracingClient<C> {
    inner: C,
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl<C> TracingClient<C> {
    /// Wrap `inner`, logging at `DEBUG` and truncating SQL to 200 bytes.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Get a reference to the wrapped client.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Unwrap into the wrapped client.
    pub fn into_inner(self) -> C {
        self.inner
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    fn emit(&self, sql: &str, param_count: usize) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.truncate_sql(sql);
        emit_at_level!(
            self.level,
            target: "pgmulti.sql",
            param_count,
            sql = %sql,
        );
    }
}

impl<C: GenericClient> GenericClient for TracingClient<C> {
    type Cursor = C::Cursor;

    async fn query_cursor(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> BatchResult<Option<Self::Cursor>> {
        self.emit(sql, params.len());
        self.inner.query_cursor(sql, params).await
    }
}

/// Cut `sql` to at most `max_bytes`, backing off to the previous char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
