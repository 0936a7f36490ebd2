use anyhow::Result;
use sql_connection::SqlConnect;

use crate::postgres::TestPostgresContainer;

pub fn create_sql_connect(container: &TestPostgresContainer) -> SqlConnect {
    SqlConnect::new(container.pool.clone())
}

/// Insert George Franklin and return the generated id
pub async fn create_test_owner(container: &TestPostgresContainer) -> Result<i32> {
    create_test_owner_with_name(container, "George", "Franklin").await
}

pub async fn create_test_owner_with_name(
    container: &TestPostgresContainer, first_name: &str, last_name: &str,
) -> Result<i32> {
    let client = container.pool.get().await?;
    let row = client
        .query_one(
            "INSERT INTO owners (first_name, last_name, address, city, \
             telephone) VALUES ($1, $2, '110 W. Liberty St.', 'Madison', \
             '6085551023') RETURNING id",
            &[&first_name, &last_name],
        )
        .await?;
    Ok(row.get(0))
}

/// Insert two owners and return their ids
pub async fn create_test_owners(
    container: &TestPostgresContainer,
) -> Result<(i32, i32)> {
    let first = create_test_owner_with_name(container, "Betty", "Davis").await?;
    let second =
        create_test_owner_with_name(container, "Eduardo", "Rodriquez").await?;
    Ok((first, second))
}
