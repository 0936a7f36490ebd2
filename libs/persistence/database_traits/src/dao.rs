use std::sync::Arc;

use async_trait::async_trait;

/// Persistence boundary for an aggregate with a store-assigned identity.
///
/// `save` inserts when the model has no identity yet and overwrites the
/// stored row otherwise, returning the model as persisted.
#[async_trait]
pub trait Repository: Send + Sync {
    type Model: Send + Sync + 'static;
    type ID: Copy + Send + Sync + 'static;
    type Error: Send + 'static;

    async fn save(
        &self, model: Self::Model,
    ) -> Result<Self::Model, Self::Error>;

    async fn find_one(
        &self, id: Self::ID,
    ) -> Result<Option<Self::Model>, Self::Error>;

    async fn find_all(&self) -> Result<Vec<Self::Model>, Self::Error>;
}

#[async_trait]
impl<T> Repository for Arc<T>
where
    T: Repository + ?Sized,
{
    type Error = T::Error;
    type ID = T::ID;
    type Model = T::Model;

    async fn save(
        &self, model: Self::Model,
    ) -> Result<Self::Model, Self::Error> {
        (**self).save(model).await
    }

    async fn find_one(
        &self, id: Self::ID,
    ) -> Result<Option<Self::Model>, Self::Error> {
        (**self).find_one(id).await
    }

    async fn find_all(&self) -> Result<Vec<Self::Model>, Self::Error> {
        (**self).find_all().await
    }
}
