use std::sync::Arc;

use async_trait::async_trait;
use database_traits::dao::Repository;
use owner_errors::OwnerError;
use owner_models::Owner;
use sql_connection::SqlConnect;
use tracing::instrument;

mod memory;

pub use memory::InMemoryOwnerDao;

/// The repository the owner handlers depend on, chosen at composition time.
pub type OwnerRepository =
    Arc<dyn Repository<Model = Owner, ID = i32, Error = OwnerError>>;

const OWNER_COLUMNS: &str =
    "id, first_name, last_name, address, city, telephone";

#[derive(Clone)]
pub struct OwnerDao {
    db: SqlConnect,
}

impl OwnerDao {
    pub fn new(db: SqlConnect) -> Self { Self { db } }

    fn map_row(row: &tokio_postgres::Row) -> Owner {
        Owner {
            id: Some(row.get(0)),
            first_name: row.get(1),
            last_name: row.get(2),
            address: row.get(3),
            city: row.get(4),
            telephone: row.get(5),
        }
    }

    async fn insert(&self, owner: &Owner) -> Result<Owner, OwnerError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "INSERT INTO owners (first_name, last_name, address, city, \
                 telephone) VALUES ($1, $2, $3, $4, $5) RETURNING \
                 {OWNER_COLUMNS}"
            ))
            .await?;
        let row = client
            .query_one(
                &stmt,
                &[
                    &owner.first_name,
                    &owner.last_name,
                    &owner.address,
                    &owner.city,
                    &owner.telephone,
                ],
            )
            .await?;

        Ok(Self::map_row(&row))
    }

    async fn update(
        &self, id: i32, owner: &Owner,
    ) -> Result<Owner, OwnerError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "UPDATE owners SET first_name = $1, last_name = $2, \
                 address = $3, city = $4, telephone = $5 WHERE id = $6 \
                 RETURNING {OWNER_COLUMNS}"
            ))
            .await?;
        let rows = client
            .query(
                &stmt,
                &[
                    &owner.first_name,
                    &owner.last_name,
                    &owner.address,
                    &owner.city,
                    &owner.telephone,
                    &id,
                ],
            )
            .await?;

        rows.first()
            .map(Self::map_row)
            .ok_or(OwnerError::NotFound { owner_id: id })
    }
}

#[async_trait]
impl Repository for OwnerDao {
    type Error = OwnerError;
    type ID = i32;
    type Model = Owner;

    #[instrument(skip_all, fields(owner.id = ?owner.id))]
    async fn save(&self, owner: Owner) -> Result<Owner, OwnerError> {
        match owner.id {
            Some(id) => self.update(id, &owner).await,
            None => self.insert(&owner).await,
        }
    }

    #[instrument(skip(self))]
    async fn find_one(&self, id: i32) -> Result<Option<Owner>, OwnerError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "SELECT {OWNER_COLUMNS} FROM owners WHERE id = $1"
            ))
            .await?;
        let rows = client.query(&stmt, &[&id]).await?;

        Ok(rows.first().map(Self::map_row))
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Owner>, OwnerError> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "SELECT {OWNER_COLUMNS} FROM owners ORDER BY id ASC"
            ))
            .await?;
        let rows = client.query(&stmt, &[]).await?;

        Ok(rows.iter().map(Self::map_row).collect())
    }
}

#[cfg(test)]
mod tests {
    use database_traits::dao::Repository;
    use owner_models::Owner;
    use test_utils::*;

    use crate::{OwnerDao, OwnerError};

    async fn setup_test_dao() -> (TestPostgresContainer, OwnerDao) {
        let container = TestPostgresContainer::new().await.unwrap();
        let dao = OwnerDao::new(create_sql_connect(&container));
        (container, dao)
    }

    fn new_owner(first_name: &str, last_name: &str) -> Owner {
        Owner {
            id: None,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            address: "638 Cardinal Ave.".to_string(),
            city: "Sun Prairie".to_string(),
            telephone: "6085551749".to_string(),
        }
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_save_new_owner_assigns_id() {
        let (_container, dao) = setup_test_dao().await;

        let saved = dao.save(new_owner("Betty", "Davis")).await.unwrap();

        assert!(saved.id.unwrap() > 0);
        assert_eq!(saved.first_name, "Betty");
        assert_eq!(saved.city, "Sun Prairie");
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_find_one() {
        let (container, dao) = setup_test_dao().await;
        let id = create_test_owner(&container).await.unwrap();

        let found = dao.find_one(id).await.unwrap().unwrap();

        assert_eq!(found.id, Some(id));
        assert_eq!(found.first_name, "George");
        assert_eq!(found.last_name, "Franklin");
        assert_eq!(found.telephone, "6085551023");
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_find_one_absent() {
        let (_container, dao) = setup_test_dao().await;
        assert!(dao.find_one(999_999).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_find_all_ordered_by_id() {
        let (container, dao) = setup_test_dao().await;
        let (first, second) = create_test_owners(&container).await.unwrap();

        let all = dao.find_all().await.unwrap();

        let ids: Vec<Option<i32>> = all.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![Some(first), Some(second)]);
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_save_existing_owner_updates_row() {
        let (container, dao) = setup_test_dao().await;
        let id = create_test_owner(&container).await.unwrap();

        let mut owner = dao.find_one(id).await.unwrap().unwrap();
        owner.city = "Monona".to_string();
        let updated = dao.save(owner).await.unwrap();

        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.city, "Monona");
        assert_eq!(dao.find_one(id).await.unwrap().unwrap().city, "Monona");
        assert_eq!(dao.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_save_unknown_id_is_not_found() {
        let (_container, dao) = setup_test_dao().await;
        let mut owner = new_owner("Jean", "Coleman");
        owner.id = Some(4242);

        let result = dao.save(owner).await;

        assert!(matches!(
            result,
            Err(OwnerError::NotFound { owner_id: 4242 })
        ));
    }
}
