//! End-to-end tests driving the `ledger` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ledger(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ledger").unwrap();
    cmd.env("LEDGER_CLI_DATA_DIR", dir.path());
    cmd
}

fn add_provider(dir: &TempDir, name: &str, street: &str) {
    ledger(dir)
        .args(["provider", "add", name, "--city", "Lima", "--neighborhood", "Centro", "--street", street])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created provider"));
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    ledger(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"));
    assert!(dir.path().join("data").join("ledger.json").exists());
    assert!(dir.path().join("config.json").exists());

    ledger(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized"));
}

#[test]
fn empty_ledger_lists_nothing() {
    let dir = TempDir::new().unwrap();
    ledger(&dir)
        .args(["provider", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No providers found."));
}

#[test]
fn provider_rename_carries_offers_and_acquisitions() {
    let dir = TempDir::new().unwrap();
    add_provider(&dir, "Bodega", "Jr. Lampa");

    ledger(&dir)
        .args(["offer", "add", "Bodega", "Rice", "3.50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added offer: Rice at $3.50"));

    ledger(&dir)
        .args(["acquisition", "record", "Bodega", "Rice", "2", "--date", "2024-05-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded: 2 x Rice from Bodega ($7.00)"));

    ledger(&dir)
        .args(["provider", "rename", "Bodega", "Bodega Lampa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed provider: 'Bodega' -> 'Bodega Lampa'"))
        .stdout(predicate::str::contains("carried 1 offer(s) and 1 acquisition(s)"));

    ledger(&dir)
        .args(["acquisition", "list", "--provider", "Bodega Lampa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rice"))
        .stdout(predicate::str::contains("1 line(s)"));

    ledger(&dir)
        .args(["offer", "list", "--provider", "Bodega"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No offers found."));
}

#[test]
fn recording_twice_merges_the_line() {
    let dir = TempDir::new().unwrap();
    add_provider(&dir, "Bodega", "Jr. Lampa");

    for _ in 0..2 {
        ledger(&dir)
            .args(["acquisition", "record", "Bodega", "Eggs", "6", "--price", "0.50", "--date", "2024-05-10"])
            .assert()
            .success();
    }

    ledger(&dir)
        .args(["acquisition", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 line(s), total $6.00"));
}

#[test]
fn record_without_price_needs_an_offer() {
    let dir = TempDir::new().unwrap();
    add_provider(&dir, "Bodega", "Jr. Lampa");

    ledger(&dir)
        .args(["acquisition", "record", "Bodega", "Milk", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn ambiguous_provider_name_needs_an_address() {
    let dir = TempDir::new().unwrap();
    add_provider(&dir, "Bodega", "Jr. Lampa");
    add_provider(&dir, "Bodega", "Jr. Cusco");

    ledger(&dir)
        .args(["offer", "add", "Bodega", "Rice", "3.50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("matches 2 providers"));

    ledger(&dir)
        .args(["offer", "add", "Bodega", "--street", "Jr. Cusco", "Rice", "3.50"])
        .assert()
        .success();
}

#[test]
fn street_collision_changes_nothing() {
    let dir = TempDir::new().unwrap();
    add_provider(&dir, "Bodega", "Jr. Lampa");
    add_provider(&dir, "Bodega", "Jr. Cusco");

    ledger(&dir)
        .args(["territory", "rename-street", "Lima", "Centro", "Jr. Lampa", "Jr. Cusco"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    ledger(&dir)
        .args(["territory", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jr. Lampa"))
        .stdout(predicate::str::contains("Jr. Cusco"));
}

#[test]
fn city_rename_moves_every_provider() {
    let dir = TempDir::new().unwrap();
    add_provider(&dir, "Bodega", "Jr. Lampa");
    add_provider(&dir, "Tambo", "Jr. Cusco");

    ledger(&dir)
        .args(["territory", "rename-city", "Lima", "Lima Metropolitana"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 provider(s) moved"));

    ledger(&dir)
        .args(["provider", "show", "Tambo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lima Metropolitana"));
}

#[test]
fn delete_with_dependents_requires_cascade() {
    let dir = TempDir::new().unwrap();
    add_provider(&dir, "Bodega", "Jr. Lampa");
    ledger(&dir)
        .args(["offer", "add", "Bodega", "Rice", "3.50"])
        .assert()
        .success();

    ledger(&dir)
        .args(["provider", "delete", "Bodega"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Use --force"));

    ledger(&dir)
        .args(["provider", "delete", "Bodega", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dependent record(s)"));

    ledger(&dir)
        .args(["provider", "delete", "Bodega", "--force", "--cascade"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted provider"));
}

#[test]
fn history_shows_audited_changes() {
    let dir = TempDir::new().unwrap();
    add_provider(&dir, "Bodega", "Jr. Lampa");

    ledger(&dir)
        .args(["history", "-n", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE"));
}

#[test]
fn config_set_changes_the_currency_symbol() {
    let dir = TempDir::new().unwrap();
    add_provider(&dir, "Bodega", "Jr. Lampa");

    ledger(&dir)
        .args(["config", "--set", "currency_symbol=S/"])
        .assert()
        .success();

    ledger(&dir)
        .args(["offer", "add", "Bodega", "Rice", "3.50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("S/3.50"));

    ledger(&dir)
        .args(["config", "--set", "colour=blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting"));
}

#[test]
fn exports_write_files() {
    let dir = TempDir::new().unwrap();
    add_provider(&dir, "Bodega", "Jr. Lampa");
    ledger(&dir)
        .args(["acquisition", "record", "Bodega", "Rice", "2", "--price", "3.50", "--date", "2024-05-10"])
        .assert()
        .success();

    let json = dir.path().join("out.json");
    ledger(&dir)
        .args(["export", "all", "--pretty"])
        .arg(&json)
        .assert()
        .success();
    let contents = std::fs::read_to_string(&json).unwrap();
    assert!(contents.contains("\"schema_version\": \"1.0.0\""));

    let csv = dir.path().join("out.csv");
    ledger(&dir)
        .args(["export", "acquisitions"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 acquisition(s)"));
    let contents = std::fs::read_to_string(&csv).unwrap();
    assert!(contents.starts_with("Date,Provider,Street,Neighborhood,City,Product,Quantity,Unit Price,Total,Memo"));
    assert!(contents.contains("2024-05-10,Bodega,Jr. Lampa,Centro,Lima,Rice,2,3.50,7.00"));
}
