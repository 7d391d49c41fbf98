//! 组织存储操作

use super::SeaOrmStorage;
use crate::entity::organizations::{ActiveModel, Column, Entity as Organizations};
use crate::errors::{Result, StaarError};
use crate::models::organizations::entities::Organization;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建组织
    pub async fn create_organization_impl(
        &self,
        name: &str,
        description: Option<String>,
        created_by: i64,
    ) -> Result<Organization> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(name.to_string()),
            description: Set(description),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("创建组织失败: {e}")))?;

        Ok(result.into_organization())
    }

    pub async fn get_organization_by_id_impl(&self, id: i64) -> Result<Option<Organization>> {
        let result = Organizations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("查询组织失败: {e}")))?;

        Ok(result.map(|m| m.into_organization()))
    }

    pub async fn get_organization_by_name_impl(&self, name: &str) -> Result<Option<Organization>> {
        let result = Organizations::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("查询组织失败: {e}")))?;

        Ok(result.map(|m| m.into_organization()))
    }

    /// 列出全部组织，按名称排序
    pub async fn list_organizations_impl(&self) -> Result<Vec<Organization>> {
        let models = Organizations::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("查询组织列表失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_organization()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::seed_user;

    #[tokio::test]
    async fn test_organization_create_and_list() {
        let storage = SeaOrmStorage::in_memory().await;
        let admin = seed_user(&storage, "admin", UserRole::Admin).await;

        storage
            .create_organization("Westside ISD", None, admin.id)
            .await
            .unwrap();
        let eastside = storage
            .create_organization("Eastside ISD", Some("North campus".into()), admin.id)
            .await
            .unwrap();

        let names: Vec<String> = storage
            .list_organizations()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.name)
            .collect();
        assert_eq!(names, vec!["Eastside ISD", "Westside ISD"]);

        let found = storage
            .get_organization_by_name("Eastside ISD")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, eastside.id);
        assert_eq!(found.description.as_deref(), Some("North campus"));
        assert!(
            storage
                .get_organization_by_id(eastside.id + 10)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_organization_name_fails() {
        let storage = SeaOrmStorage::in_memory().await;
        let admin = seed_user(&storage, "admin", UserRole::Admin).await;
        storage
            .create_organization("Westside ISD", None, admin.id)
            .await
            .unwrap();
        assert!(
            storage
                .create_organization("Westside ISD", None, admin.id)
                .await
                .is_err()
        );
    }
}
