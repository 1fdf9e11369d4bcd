use crate::{Connection, Result, CONFIG};
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use std::ops::Deref;

pub type DbPool = Pool<ConnectionManager<Connection>>;

// A wrapper around an r2d2 pooled connection, so that the connection can be
// handed out without exposing the pool types everywhere.
pub struct DbConn(pub PooledConnection<ConnectionManager<Connection>>);

// For the convenience of using an &DbConn as an &Connection.
impl Deref for DbConn {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(feature = "sqlite")]
#[derive(Debug)]
struct PragmaForeignKeys;

// SQLite only honors referential actions when the pragma is set on each
// connection.
#[cfg(feature = "sqlite")]
impl diesel::r2d2::CustomizeConnection<Connection, diesel::r2d2::Error> for PragmaForeignKeys {
    fn on_acquire(&self, conn: &mut Connection) -> std::result::Result<(), diesel::r2d2::Error> {
        use diesel::connection::SimpleConnection;

        conn.batch_execute("PRAGMA foreign_keys = ON;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Initializes a database pool against `CONFIG.database_url`.
pub fn init_pool(max_size: u32) -> Option<DbPool> {
    let manager = ConnectionManager::<Connection>::new(CONFIG.database_url.as_str());
    let builder = Pool::builder().max_size(max_size);
    #[cfg(feature = "sqlite")]
    let builder = builder.connection_customizer(Box::new(PragmaForeignKeys));
    let pool = builder.build(manager).ok()?;
    tracing::debug!("database pool ready (max_size = {})", max_size);
    Some(pool)
}

/// Opens a single connection against `CONFIG.database_url`.
pub fn establish() -> Result<Connection> {
    use diesel::Connection as _;

    let conn = Connection::establish(CONFIG.database_url.as_str())?;
    #[cfg(feature = "sqlite")]
    {
        use diesel::connection::SimpleConnection;

        conn.batch_execute("PRAGMA foreign_keys = ON;")?;
    }
    Ok(conn)
}
