use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260122_000001_create_cache_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Optional parts of a unique key are stored as '' instead of NULL, otherwise
        // both SQLite and Postgres would accept duplicate "city omitted" rows.
        manager.create_table(Table::create()
            .table(Locations::Table)
            .col(
                ColumnDef::new(Locations::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Locations::Region).string_len(20).not_null())
            .col(ColumnDef::new(Locations::Prefecture).string_len(20).not_null())
            .col(ColumnDef::new(Locations::City).string_len(50).not_null().default(""))
            .col(ColumnDef::new(Locations::Ward).string_len(50).not_null().default(""))
            .col(ColumnDef::new(Locations::Town).string_len(100).not_null().default(""))
            .col(ColumnDef::new(Locations::CreatedAt).date_time().not_null().default(Expr::current_timestamp()))
            .col(ColumnDef::new(Locations::UpdatedAt).date_time().not_null().default(Expr::current_timestamp()))
            .to_owned()).await?;

        manager.create_index(Index::create().name("idx_locations_region").table(Locations::Table).col(Locations::Region).to_owned()).await?;
        manager.create_index(Index::create().name("idx_locations_prefecture").table(Locations::Table).col(Locations::Prefecture).to_owned()).await?;
        manager.create_index(Index::create().name("idx_locations_prefecture_city").table(Locations::Table).col(Locations::Prefecture).col(Locations::City).to_owned()).await?;
        manager.create_index(Index::create().name("idx_locations_prefecture_city_ward").table(Locations::Table).col(Locations::Prefecture).col(Locations::City).col(Locations::Ward).to_owned()).await?;
        manager.create_index(
            Index::create()
                .name("uq_locations_identity")
                .table(Locations::Table)
                .col(Locations::Region)
                .col(Locations::Prefecture)
                .col(Locations::City)
                .col(Locations::Ward)
                .col(Locations::Town)
                .unique()
                .to_owned(),
        ).await?;

        manager.create_table(Table::create()
            .table(Lines::Table)
            .col(
                ColumnDef::new(Lines::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Lines::Region).string_len(20).not_null())
            .col(ColumnDef::new(Lines::Prefecture).string_len(20).not_null())
            .col(ColumnDef::new(Lines::LineName).string_len(100).not_null())
            .col(ColumnDef::new(Lines::Station).string_len(50).not_null().default(""))
            .col(ColumnDef::new(Lines::StationOrder).integer())
            .col(ColumnDef::new(Lines::CreatedAt).date_time().not_null().default(Expr::current_timestamp()))
            .col(ColumnDef::new(Lines::UpdatedAt).date_time().not_null().default(Expr::current_timestamp()))
            .to_owned()).await?;

        manager.create_index(Index::create().name("idx_lines_region").table(Lines::Table).col(Lines::Region).to_owned()).await?;
        manager.create_index(Index::create().name("idx_lines_prefecture").table(Lines::Table).col(Lines::Prefecture).to_owned()).await?;
        manager.create_index(Index::create().name("idx_lines_line_name").table(Lines::Table).col(Lines::LineName).to_owned()).await?;
        manager.create_index(Index::create().name("idx_lines_prefecture_line_name").table(Lines::Table).col(Lines::Prefecture).col(Lines::LineName).to_owned()).await?;
        manager.create_index(
            Index::create()
                .name("uq_lines_identity")
                .table(Lines::Table)
                .col(Lines::Region)
                .col(Lines::Prefecture)
                .col(Lines::LineName)
                .col(Lines::Station)
                .unique()
                .to_owned(),
        ).await?;

        manager.create_table(Table::create()
            .table(Metadata::Table)
            .col(
                ColumnDef::new(Metadata::Key)
                    .string_len(50)
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Metadata::Value).text())
            .col(ColumnDef::new(Metadata::UpdatedAt).date_time().not_null().default(Expr::current_timestamp()))
            .to_owned()).await?;

        Ok(())
    }

    // Reverse order of creation, tolerating tables that are already gone.
    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Metadata::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Lines::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Locations::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Locations {
    Table,
    Id,
    Region,
    Prefecture,
    City,
    Ward,
    Town,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Lines {
    Table,
    Id,
    Region,
    Prefecture,
    LineName,
    Station,
    StationOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Metadata {
    Table,
    Key,
    Value,
    UpdatedAt,
}
