//! Compile-only checks that every supported client type can run a batch insert.

#![allow(dead_code)]

use pgmulti::{BatchError, BatchResult, MultiInserter, params};

fn tags_inserter() -> BatchResult<MultiInserter> {
    let mut inserter = MultiInserter::new("tags", "name,weight", Some("id"))?;
    inserter.add(params!["rust", 3_i32])?;
    inserter.add(params!["postgres", 2_i32])?;
    Ok(inserter)
}

async fn _client_insert_compiles(client: &tokio_postgres::Client) -> BatchResult<Vec<i64>> {
    tags_inserter()?.insert(client).await
}

async fn _transaction_insert_compiles(client: &mut tokio_postgres::Client) -> BatchResult<()> {
    let tx = client.transaction().await.map_err(BatchError::from_db_error)?;
    let _ids = tags_inserter()?.insert(&tx).await?;
    tx.commit().await.map_err(BatchError::from_db_error)?;
    Ok(())
}

#[cfg(feature = "pool")]
async fn _pool_insert_compiles(client: &mut deadpool_postgres::Client) -> BatchResult<()> {
    let _ids = tags_inserter()?.insert(&*client).await?;

    let tx = client.transaction().await.map_err(BatchError::from_db_error)?;
    let _ids = tags_inserter()?.insert(&tx).await?;
    tx.rollback().await.map_err(BatchError::from_db_error)?;
    Ok(())
}

#[cfg(feature = "tracing")]
async fn _traced_insert_compiles(client: &tokio_postgres::Client) -> BatchResult<Vec<i64>> {
    let client = pgmulti::TracingClient::new(client).no_truncate();
    tags_inserter()?.insert(&client).await
}

#[test]
fn test_public_api_renders_statement() {
    let inserter = tags_inserter().unwrap();
    assert_eq!(inserter.len(), 2);
    assert_eq!(
        inserter.to_sql(),
        "INSERT INTO tags (name,weight) VALUES ($1,$2),($3,$4) RETURNING id;"
    );
}

#[test]
fn test_empty_params_macro_is_rejected_for_nonempty_fields() {
    let mut inserter = MultiInserter::new("tags", "name", None).unwrap();
    let err = inserter.add(params![]).unwrap_err();
    assert_eq!(err.to_string(), "field count mismatch, got 0, expected 1");
    assert!(inserter.is_empty());
}
