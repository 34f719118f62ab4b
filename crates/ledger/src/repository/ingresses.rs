use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait};
use uuid::Uuid;

use super::{IngressRepository, sql_repository};
use crate::{DomainError, Ingress, ResultLedger, ingresses};

sql_repository!(SqlIngresses);

impl<C: ConnectionTrait + Sync> IngressRepository for SqlIngresses<'_, C> {
    async fn create(&self, ingress: &Ingress) -> ResultLedger<()> {
        ingresses::ActiveModel::from(ingress).insert(self.conn).await?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> ResultLedger<Ingress> {
        let model = ingresses::Entity::find_by_id(id.to_string())
            .one(self.conn)
            .await?
            .ok_or(DomainError::RecordNotFound)?;
        Ingress::try_from(model)
    }
}
