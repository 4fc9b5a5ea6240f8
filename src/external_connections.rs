use sqlx::PgConnection;

/// A handle to an active database connection handed out by an [ExternalConnectivity]
/// implementation
pub trait ConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Owns clients for connecting to external systems. Allows business logic to be agnostic
/// of the external systems it communicates with so driven adapters can easily be swapped
/// out for other implementations.
pub trait ExternalConnectivity: Sync {
    type DbHandle<'cxn_borrow>: ConnectionHandle
    where
        Self: 'cxn_borrow;

    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}
