/// URL for accessing the PostgreSQL database (should contain a schema name in the path)
pub const DB_URL: &str = "DATABASE_URL";
/// Log level configuration for the application. For formatting info, see
/// [tracing_subscriber::EnvFilter]'s directive documentation
pub const LOG_LEVEL: &str = "LOG_LEVEL";
/// Socket address the HTTP server binds to, defaults to 0.0.0.0:8080
pub const LISTEN_ADDR: &str = "LISTEN_ADDR";

/// HS256 secret shared with the external identity provider. The provider signs session
/// tokens with this secret; this service only ever validates them.
pub const SESSION_JWT_SECRET: &str = "SESSION_JWT_SECRET";

pub mod test {
    /// URL for accessing the PostgreSQL database during integration tests (should not contain a schema name in the path)
    pub const TEST_DB_URL: &str = "TEST_DB_URL";
}
