//! The persisted schema.
//!
//! Seven tables, one per logical entity. Every statement uses
//! `IF NOT EXISTS`, so running the whole list against an existing database
//! is a no-op and never touches stored rows.
//!
//! Uniqueness lives in the schema, not in application code: the stores
//! rely on `ON CONFLICT` against these keys for their upserts.

/// Names of every table the engine creates, in creation order.
pub const TABLES: [&str; 7] = [
    "players",
    "sessions",
    "balances",
    "homes",
    "spawn",
    "relationships",
    "audit_log",
];

pub(crate) const STATEMENTS: &[&str] = &[
    // Identity record. Restriction columns: `is_*` flag, optional reason,
    // and `*_until` where NULL means "never expires".
    r#"
    CREATE TABLE IF NOT EXISTS players (
        player_id       TEXT PRIMARY KEY,
        display_name    TEXT NOT NULL,
        credential_hash TEXT,
        last_origin     TEXT,
        registered_at   INTEGER,
        last_login      INTEGER,
        is_banned       INTEGER NOT NULL DEFAULT 0,
        ban_reason      TEXT,
        ban_until       INTEGER,
        is_muted        INTEGER NOT NULL DEFAULT 0,
        mute_reason     TEXT,
        mute_until      INTEGER,
        gender          TEXT NOT NULL DEFAULT 'male'
    )
    "#,
    // One live session per identity: the primary key makes re-issue a
    // replacement, never an accumulation.
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        player_id  TEXT PRIMARY KEY,
        origin     TEXT NOT NULL,
        expires_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS balances (
        player_id TEXT PRIMARY KEY,
        balance   REAL NOT NULL DEFAULT 0 CHECK (balance >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS homes (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        player_id TEXT NOT NULL,
        name      TEXT NOT NULL,
        world     TEXT NOT NULL,
        x         REAL NOT NULL,
        y         REAL NOT NULL,
        z         REAL NOT NULL,
        yaw       REAL NOT NULL,
        pitch     REAL NOT NULL,
        UNIQUE (player_id, name)
    )
    "#,
    // Singleton: the CHECK pins the only legal key to 1.
    r#"
    CREATE TABLE IF NOT EXISTS spawn (
        id    INTEGER PRIMARY KEY CHECK (id = 1),
        world TEXT NOT NULL,
        x     REAL NOT NULL,
        y     REAL NOT NULL,
        z     REAL NOT NULL,
        yaw   REAL NOT NULL,
        pitch REAL NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS relationships (
        player_id  TEXT NOT NULL,
        other_id   TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        PRIMARY KEY (player_id, other_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS audit_log (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        player_id   TEXT NOT NULL,
        action      TEXT NOT NULL,
        world       TEXT NOT NULL,
        x           INTEGER NOT NULL,
        y           INTEGER NOT NULL,
        z           INTEGER NOT NULL,
        object_kind TEXT NOT NULL,
        recorded_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_audit_log_block
        ON audit_log (world, x, y, z, recorded_at DESC)
    "#,
];
