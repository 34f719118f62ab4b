use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use super::{TagRepository, ensure_affected, sql_repository};
use crate::{
    DomainError, LedgerError, ResultLedger, Tag, TagType, expenditure_tags, ingress_tags, tags,
};

sql_repository!(SqlTags);

impl<C: ConnectionTrait + Sync> TagRepository for SqlTags<'_, C> {
    async fn create(&self, tag: &Tag) -> ResultLedger<()> {
        tags::ActiveModel::from(tag)
            .insert(self.conn)
            .await
            .map_err(|err| {
                LedgerError::from(err)
                    .reclassify(DomainError::DuplicateKey, DomainError::TagAlreadyExists)
            })?;
        Ok(())
    }

    async fn update(&self, tag: &Tag) -> ResultLedger<()> {
        tags::ActiveModel::from(tag)
            .update(self.conn)
            .await
            .map_err(|err| {
                LedgerError::from(err)
                    .reclassify(DomainError::DuplicateKey, DomainError::TagAlreadyExists)
            })?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ResultLedger<()> {
        let result = tags::Entity::delete_by_id(id.to_string())
            .exec(self.conn)
            .await?;
        ensure_affected(result.rows_affected)
    }

    async fn get_by_id(&self, id: Uuid) -> ResultLedger<Tag> {
        let model = tags::Entity::find_by_id(id.to_string())
            .one(self.conn)
            .await?
            .ok_or(DomainError::RecordNotFound)?;
        Tag::try_from(model)
    }

    async fn list_by_type(&self, tag_type: TagType) -> ResultLedger<Vec<Tag>> {
        tags::Entity::find()
            .filter(tags::Column::TagType.eq(tag_type.as_str()))
            .order_by_asc(tags::Column::NameNorm)
            .all(self.conn)
            .await?
            .into_iter()
            .map(Tag::try_from)
            .collect()
    }

    async fn link_tags_to_type(
        &self,
        tag_type: TagType,
        target_id: Uuid,
        tag_ids: &[Uuid],
    ) -> ResultLedger<()> {
        let mut unique = tag_ids.to_vec();
        unique.sort_unstable();
        unique.dedup();
        if unique.is_empty() {
            return Ok(());
        }

        let target = target_id.to_string();
        match tag_type {
            TagType::Expenditure => {
                let links = unique.iter().map(|tag_id| expenditure_tags::ActiveModel {
                    expenditure_id: ActiveValue::Set(target.clone()),
                    tag_id: ActiveValue::Set(tag_id.to_string()),
                });
                expenditure_tags::Entity::insert_many(links)
                    .exec_without_returning(self.conn)
                    .await?;
            }
            TagType::Ingress => {
                let links = unique.iter().map(|tag_id| ingress_tags::ActiveModel {
                    ingress_id: ActiveValue::Set(target.clone()),
                    tag_id: ActiveValue::Set(tag_id.to_string()),
                });
                ingress_tags::Entity::insert_many(links)
                    .exec_without_returning(self.conn)
                    .await?;
            }
            _ => return Err(DomainError::TagTypeMismatch.into()),
        }
        Ok(())
    }

    async fn linked_to(&self, tag_type: TagType, target_id: Uuid) -> ResultLedger<Vec<Tag>> {
        let target = target_id.to_string();
        let query = match tag_type {
            TagType::Expenditure => tags::Entity::find()
                .inner_join(expenditure_tags::Entity)
                .filter(expenditure_tags::Column::ExpenditureId.eq(target)),
            TagType::Ingress => tags::Entity::find()
                .inner_join(ingress_tags::Entity)
                .filter(ingress_tags::Column::IngressId.eq(target)),
            _ => return Ok(Vec::new()),
        };

        query
            .order_by_asc(tags::Column::NameNorm)
            .all(self.conn)
            .await?
            .into_iter()
            .map(Tag::try_from)
            .collect()
    }
}
