use contracts::domain::a001_department::aggregate::Department;
use contracts::domain::a002_institute::aggregate::Institute;
use contracts::domain::a003_unit::aggregate::Unit;
use contracts::domain::a004_contact::aggregate::Contact;
use contracts::domain::common::AggregateRoot;
use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Open the SQLite file and bootstrap the schema
pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    tracing::info!("Opening database {}", db_url);
    let conn = Database::connect(&db_url).await?;

    bootstrap_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Database already initialized"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("database connection is initialized at startup")
}

async fn table_exists(conn: &DatabaseConnection, table: &str) -> anyhow::Result<bool> {
    let rows = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type='table' AND name = ?",
            [table.into()],
        ))
        .await?;
    Ok(!rows.is_empty())
}

async fn ensure_table(conn: &DatabaseConnection, table: &str, ddl: &str) -> anyhow::Result<()> {
    if table_exists(conn, table).await? {
        return Ok(());
    }
    tracing::info!("Creating {} table", table);
    conn.execute(Statement::from_string(DatabaseBackend::Sqlite, ddl.to_string()))
        .await?;
    Ok(())
}

/// Add a column to an existing table when an older database lacks it
async fn ensure_column(
    conn: &DatabaseConnection,
    table: &str,
    column: &str,
    definition: &str,
) -> anyhow::Result<()> {
    let pragma = format!("PRAGMA table_info('{}');", table);
    let cols = conn
        .query_all(Statement::from_string(DatabaseBackend::Sqlite, pragma))
        .await?;
    let present = cols
        .iter()
        .any(|row| row.try_get::<String>("", "name").unwrap_or_default() == column);
    if !present {
        tracing::info!("Adding column {}.{}", table, column);
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            format!("ALTER TABLE {} ADD COLUMN {} {};", table, column, definition),
        ))
        .await?;
    }
    Ok(())
}

async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let departments = Department::full_name();
    ensure_table(
        conn,
        &departments,
        &format!(
            r#"
            CREATE TABLE {departments} (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
            "#
        ),
    )
    .await?;

    let institutes = Institute::full_name();
    ensure_table(
        conn,
        &institutes,
        &format!(
            r#"
            CREATE TABLE {institutes} (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                department_id TEXT NOT NULL DEFAULT '',
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
            "#
        ),
    )
    .await?;

    let units = Unit::full_name();
    ensure_table(
        conn,
        &units,
        &format!(
            r#"
            CREATE TABLE {units} (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                institute_id TEXT NOT NULL DEFAULT '',
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
            "#
        ),
    )
    .await?;

    let contacts = Contact::full_name();
    ensure_table(
        conn,
        &contacts,
        &format!(
            r#"
            CREATE TABLE {contacts} (
                id TEXT PRIMARY KEY NOT NULL,
                full_name TEXT NOT NULL,
                designation TEXT NOT NULL DEFAULT '',
                department_id TEXT NOT NULL DEFAULT '',
                institute_id TEXT NOT NULL DEFAULT '',
                unit_id TEXT NOT NULL DEFAULT '',
                department TEXT NOT NULL DEFAULT '',
                institute TEXT NOT NULL DEFAULT '',
                unit TEXT NOT NULL DEFAULT '',
                official_email TEXT NOT NULL,
                personal_email TEXT,
                mobile_no1 TEXT NOT NULL DEFAULT '',
                mobile_no2 TEXT,
                land_line TEXT,
                extension TEXT,
                contact_type TEXT NOT NULL DEFAULT 'Staff',
                contact_status TEXT NOT NULL DEFAULT 'Active',
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
            "#
        ),
    )
    .await?;
    ensure_column(conn, &contacts, "profile_picture", "TEXT").await?;
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        format!("CREATE INDEX IF NOT EXISTS idx_{contacts}_department ON {contacts} (department_id);"),
    ))
    .await?;
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        format!("CREATE INDEX IF NOT EXISTS idx_{contacts}_institute ON {contacts} (institute_id);"),
    ))
    .await?;

    ensure_table(
        conn,
        "sys_users",
        r#"
        CREATE TABLE sys_users (
            id TEXT PRIMARY KEY NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            full_name TEXT NOT NULL,
            designation TEXT NOT NULL DEFAULT '',
            department_id TEXT NOT NULL DEFAULT '',
            institute_id TEXT NOT NULL DEFAULT '',
            unit_id TEXT NOT NULL DEFAULT '',
            contact_number TEXT NOT NULL DEFAULT '',
            role TEXT NOT NULL DEFAULT 'Viewer',
            is_active INTEGER NOT NULL DEFAULT 1,
            profile_picture TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            last_login_at TEXT
        );
        "#,
    )
    .await?;

    ensure_table(
        conn,
        "sys_refresh_tokens",
        r#"
        CREATE TABLE sys_refresh_tokens (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL,
            token_hash TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            revoked_at TEXT
        );
        "#,
    )
    .await?;

    ensure_table(
        conn,
        "sys_settings",
        r#"
        CREATE TABLE sys_settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .await?;

    Ok(())
}
