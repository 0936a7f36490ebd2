use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct GetOwnerQuery {
    pub owner_id: i32,
}

/// Every stored owner; there is no paging or filtering.
#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct ListOwnersQuery;
