use database_traits::dao::Repository;
use owner_dao::OwnerRepository;
use owner_errors::OwnerError;
use owner_queries::{GetOwnerQuery, ListOwnersQuery};
use owner_responses::OwnerResponse;
use tracing::instrument;

#[derive(Clone)]
pub struct GetOwnerQueryHandler {
    owners: OwnerRepository,
}

impl GetOwnerQueryHandler {
    pub fn new(owners: OwnerRepository) -> Self { Self { owners } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: GetOwnerQuery,
    ) -> Result<OwnerResponse, OwnerError> {
        let owner = self.owners.find_one(query.owner_id).await?.ok_or(
            OwnerError::NotFound {
                owner_id: query.owner_id,
            },
        )?;

        Ok(owner.into())
    }
}

#[derive(Clone)]
pub struct ListOwnersQueryHandler {
    owners: OwnerRepository,
}

impl ListOwnersQueryHandler {
    pub fn new(owners: OwnerRepository) -> Self { Self { owners } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, _query: ListOwnersQuery,
    ) -> Result<Vec<OwnerResponse>, OwnerError> {
        let owners = self.owners.find_all().await?;
        tracing::debug!("Listing {} owners", owners.len());

        Ok(owners.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use owner_dao::InMemoryOwnerDao;
    use owner_models::Owner;

    use super::*;

    fn owner(first_name: &str, last_name: &str) -> Owner {
        Owner {
            id: None,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            address: "2335 Independence La.".to_string(),
            city: "Waunakee".to_string(),
            telephone: "6085555487".to_string(),
        }
    }

    fn setup_repository() -> (Arc<InMemoryOwnerDao>, OwnerRepository) {
        let dao = Arc::new(InMemoryOwnerDao::new());
        let repository: OwnerRepository = dao.clone();
        (dao, repository)
    }

    #[tokio::test]
    async fn test_get_owner_success() {
        let (dao, repository) = setup_repository();
        let saved = dao.save(owner("Harold", "Davis")).await.unwrap();
        let handler = GetOwnerQueryHandler::new(repository);

        let result = handler
            .execute(GetOwnerQuery {
                owner_id: saved.id.unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(result.id, saved.id);
        assert_eq!(result.last_name, "Davis");
    }

    #[tokio::test]
    async fn test_get_owner_not_found() {
        let (_dao, repository) = setup_repository();
        let handler = GetOwnerQueryHandler::new(repository);

        let result = handler.execute(GetOwnerQuery { owner_id: 999 }).await;

        match result {
            Err(OwnerError::NotFound { owner_id }) => assert_eq!(owner_id, 999),
            other => panic!("Expected NotFound error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_owners_returns_everything() {
        let (dao, repository) = setup_repository();
        dao.save(owner("Maria", "Escobito")).await.unwrap();
        dao.save(owner("David", "Schroeder")).await.unwrap();
        dao.save(owner("Carlos", "Estaban")).await.unwrap();
        let handler = ListOwnersQueryHandler::new(repository);

        let result = handler.execute(ListOwnersQuery).await.unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result[1].first_name, "David");
    }

    #[tokio::test]
    async fn test_list_owners_empty() {
        let (_dao, repository) = setup_repository();
        let handler = ListOwnersQueryHandler::new(repository);

        let result = handler.execute(ListOwnersQuery).await.unwrap();

        assert!(result.is_empty());
    }
}
