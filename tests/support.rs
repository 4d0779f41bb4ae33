// Shared test harness: a temp-dir-backed database plus a CLI command builder,
// following the acceptance-framework shape used elsewhere in this lineage.

use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

use assert_cmd::Command;
use cultivar::db::DbConnection;
use rusqlite::Connection;
use tempfile::TempDir;

pub fn lock_test_env() -> MutexGuard<'static, ()> {
    static TEST_ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    TEST_ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(|err| err.into_inner())
}

pub struct TestContext {
    temp_dir: TempDir,
    #[allow(dead_code)]
    db_path: PathBuf,
    conn: Connection,
    _env_guard: MutexGuard<'static, ()>,
}

impl TestContext {
    pub fn new() -> Self {
        let env_guard = lock_test_env();
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let config_dir = temp_dir.path().join(".cultivar");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("rc"), format!("data.location={}\n", db_path.display())).unwrap();

        std::env::set_var("HOME", temp_dir.path());
        let conn = DbConnection::connect().unwrap();

        Self { temp_dir, db_path, conn, _env_guard: env_guard }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("cultivar").unwrap();
        cmd.env("HOME", self.temp_dir.path());
        cmd
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}
