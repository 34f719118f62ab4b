use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenditure_tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub expenditure_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tag_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenditures::Entity",
        from = "Column::ExpenditureId",
        to = "super::expenditures::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Expenditure,
    #[sea_orm(
        belongs_to = "super::tags::Entity",
        from = "Column::TagId",
        to = "super::tags::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Tag,
}

impl Related<super::expenditures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenditure.def()
    }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
