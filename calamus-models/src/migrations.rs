use crate::{Connection, Result};

#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
embed_migrations!("migrations/sqlite");
#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
embed_migrations!("migrations/postgres");

/// Brings the database up to date with the embedded migrations.
pub fn run(conn: &Connection) -> Result<()> {
    embedded_migrations::run(conn)?;
    tracing::info!("database schema is up to date");
    Ok(())
}
