use chrono::Utc;
use uuid::Uuid;

use crate::{
    DomainError, NewTagCmd, ResultLedger, Tag, TagChanges, TagType,
    repository::{Scope, TagRepository},
};

use super::{Ledger, with_uow};

impl Ledger {
    /// Create a tag. Name and type are validated before storage is touched.
    pub async fn create_tag(&self, cmd: NewTagCmd) -> ResultLedger<Tag> {
        let tag = Tag::new(
            &cmd.name,
            &cmd.tag_type,
            cmd.description.as_deref(),
            cmd.color.as_deref(),
            cmd.background_color.as_deref(),
            Utc::now(),
        )?;
        with_uow!(self, |scope| {
            scope.tags().create(&tag).await?;
            Ok(tag)
        })
    }

    pub async fn tag(&self, id: Uuid) -> ResultLedger<Tag> {
        load(&self.store(), id).await
    }

    pub async fn tags_by_type(&self, tag_type: TagType) -> ResultLedger<Vec<Tag>> {
        self.store().tags().list_by_type(tag_type).await
    }

    pub async fn update_tag(&self, id: Uuid, changes: TagChanges) -> ResultLedger<Tag> {
        with_uow!(self, |scope| {
            let mut tag = load(scope, id).await?;
            tag.apply(&changes, Utc::now())?;
            scope.tags().update(&tag).await?;
            Ok(tag)
        })
    }

    /// Delete a tag no record is labelled with, otherwise `TagInUse`.
    pub async fn delete_tag(&self, id: Uuid) -> ResultLedger<()> {
        with_uow!(self, |scope| {
            scope
                .tags()
                .delete(id)
                .await
                .map_err(|err| err.not_found_as(DomainError::TagNotFound))
        })
    }
}

async fn load<S: Scope>(scope: &S, id: Uuid) -> ResultLedger<Tag> {
    scope
        .tags()
        .get_by_id(id)
        .await
        .map_err(|err| err.not_found_as(DomainError::TagNotFound))
}
