//! Query execution seam used by [`MultiInserter::insert`](crate::MultiInserter::insert).

use crate::error::{BatchError, BatchResult};
use futures_util::StreamExt;
use std::pin::Pin;
use tokio_postgres::Row;
use tokio_postgres::types::{ToSql, Type};

/// A cursor over the rows returned by an executed statement.
///
/// Cursors are advanced one row at a time and must be released with
/// [`RowCursor::close`] once the caller is done with them.
pub trait RowCursor {
    /// Move to the next row. Returns `false` once the result is exhausted.
    fn advance(&mut self) -> impl std::future::Future<Output = BatchResult<bool>> + Send;

    /// Read the current row's first column as an integer identifier.
    fn scan_id(&self) -> BatchResult<i64>;

    /// Release the cursor and any resources held by it.
    ///
    /// Rows not yet read are drained first, so errors the server reports while executing the
    /// statement surface here even if the caller never advanced the cursor.
    fn close(self) -> impl std::future::Future<Output = BatchResult<()>> + Send;
}

/// A trait that unifies database clients and transactions.
///
/// This allows a batch insert to run on either a direct client connection or inside a
/// transaction.
pub trait GenericClient: Send + Sync {
    /// Cursor type returned by [`GenericClient::query_cursor`].
    type Cursor: RowCursor + Send;

    /// Execute a query and return a cursor over its rows.
    ///
    /// `Ok(None)` means the client produced no cursor at all; callers treat it as an
    /// empty result that needs no release.
    fn query_cursor(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = BatchResult<Option<Self::Cursor>>> + Send;
}

impl<C: GenericClient> GenericClient for &C {
    type Cursor = C::Cursor;

    async fn query_cursor(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> BatchResult<Option<Self::Cursor>> {
        C::query_cursor(*self, sql, params).await
    }
}

/// Cursor over a streamed tokio-postgres result.
#[must_use]
pub struct PgCursor {
    stream: Pin<Box<tokio_postgres::RowStream>>,
    current: Option<Row>,
}

impl PgCursor {
    /// Wrap a `RowStream` returned by `query_raw`.
    pub fn new(stream: tokio_postgres::RowStream) -> Self {
        Self {
            stream: Box::pin(stream),
            current: None,
        }
    }
}

impl std::fmt::Debug for PgCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgCursor")
            .field("has_current", &self.current.is_some())
            .finish()
    }
}

impl RowCursor for PgCursor {
    async fn advance(&mut self) -> BatchResult<bool> {
        match self.stream.next().await {
            Some(Ok(row)) => {
                self.current = Some(row);
                Ok(true)
            }
            Some(Err(e)) => {
                self.current = None;
                Err(BatchError::from_db_error(e))
            }
            None => {
                self.current = None;
                Ok(false)
            }
        }
    }

    fn scan_id(&self) -> BatchResult<i64> {
        let row = self
            .current
            .as_ref()
            .ok_or_else(|| BatchError::decode("0", "no current row"))?;
        let Some(column) = row.columns().first() else {
            return Err(BatchError::decode("0", "row has no columns"));
        };
        let value = match IdWidth::of(column.type_()) {
            IdWidth::Int2 => row.try_get::<_, i16>(0).map(i64::from),
            IdWidth::Int4 => row.try_get::<_, i32>(0).map(i64::from),
            IdWidth::Int8 => row.try_get::<_, i64>(0),
        };
        value.map_err(|e| BatchError::decode(column.name(), e.to_string()))
    }

    async fn close(mut self) -> BatchResult<()> {
        while let Some(item) = self.stream.next().await {
            item.map_err(BatchError::from_db_error)?;
        }
        Ok(())
    }
}

/// Integer width of an identifier column; narrower ids are widened to `i64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum IdWidth {
    Int2,
    Int4,
    Int8,
}

impl IdWidth {
    /// Anything that is not `int2`/`int4` is decoded as `int8` and left to `FromSql` to reject.
    pub(crate) fn of(ty: &Type) -> Self {
        if *ty == Type::INT2 {
            Self::Int2
        } else if *ty == Type::INT4 {
            Self::Int4
        } else {
            Self::Int8
        }
    }
}

impl GenericClient for tokio_postgres::Client {
    type Cursor = PgCursor;

    async fn query_cursor(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> BatchResult<Option<PgCursor>> {
        let stream = tokio_postgres::Client::query_raw(self, sql, params.iter().copied())
            .await
            .map_err(BatchError::from_db_error)?;
        Ok(Some(PgCursor::new(stream)))
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    type Cursor = PgCursor;

    async fn query_cursor(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> BatchResult<Option<PgCursor>> {
        let stream = tokio_postgres::Transaction::query_raw(self, sql, params.iter().copied())
            .await
            .map_err(BatchError::from_db_error)?;
        Ok(Some(PgCursor::new(stream)))
    }
}

// ===== deadpool-postgres support =====

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Client {
    type Cursor = PgCursor;

    async fn query_cursor(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> BatchResult<Option<PgCursor>> {
        // Delegate to the deref target (ClientWrapper / tokio_postgres::Client).
        GenericClient::query_cursor(&**self, sql, params).await
    }
}

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::ClientWrapper {
    type Cursor = PgCursor;

    async fn query_cursor(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> BatchResult<Option<PgCursor>> {
        GenericClient::query_cursor(&**self, sql, params).await
    }
}

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Transaction<'_> {
    type Cursor = PgCursor;

    async fn query_cursor(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> BatchResult<Option<PgCursor>> {
        GenericClient::query_cursor(&**self, sql, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_width_widens_small_integers() {
        assert_eq!(IdWidth::of(&Type::INT2), IdWidth::Int2);
        assert_eq!(IdWidth::of(&Type::INT4), IdWidth::Int4);
        assert_eq!(IdWidth::of(&Type::INT8), IdWidth::Int8);
    }

    #[test]
    fn test_id_width_defers_other_types_to_int8_decode() {
        assert_eq!(IdWidth::of(&Type::TEXT), IdWidth::Int8);
        assert_eq!(IdWidth::of(&Type::NUMERIC), IdWidth::Int8);
    }
}
