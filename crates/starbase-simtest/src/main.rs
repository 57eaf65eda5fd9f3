//! StarBase Headless Economy Harness
//!
//! Validates catalog data and the upgrade/storage invariants without any
//! database or web layer. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p starbase-simtest
//!   cargo run -p starbase-simtest -- --verbose
//!   cargo run -p starbase-simtest -- --config economy.json --seed 7

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use starbase_logic::catalog::{ComponentKind, InMemoryCatalog, LevelCatalog};
use starbase_logic::config::{validate_config, EconomyConfig};
use starbase_logic::orchestration::{
    move_resources_from_ship, upgrade_ship_part, upgrade_station_part,
};
use starbase_logic::persistence::{load_snapshot, save_snapshot};
use starbase_logic::resources::{ResourceKind, ResourceMap};
use starbase_logic::ship::{ShipColor, ShipKind, ShipPart, SpaceShip};
use starbase_logic::station::{SpaceStation, StationPart};
use starbase_logic::storage::ResourceStorage;
use starbase_logic::upgradeable::Upgradeable;
use starbase_logic::EconomyError;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

struct Args {
    verbose: bool,
    config: Option<PathBuf>,
    seed: u64,
}

fn parse_args(argv: impl IntoIterator<Item = String>) -> Args {
    let mut args = Args {
        verbose: false,
        config: None,
        seed: 42,
    };
    let mut iter = argv.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--verbose" => args.verbose = true,
            "--config" => match iter.next() {
                Some(path) => args.config = Some(PathBuf::from(path)),
                None => eprintln!("--config needs a path, using defaults"),
            },
            "--seed" => match iter.next().map(|s| s.parse::<u64>()) {
                Some(Ok(seed)) => args.seed = seed,
                Some(Err(e)) => eprintln!("bad --seed ({e}), using {}", args.seed),
                None => eprintln!("--seed needs a value, using {}", args.seed),
            },
            other => eprintln!("ignoring unknown argument {other}"),
        }
    }
    args
}

fn main() {
    let args = parse_args(std::env::args().skip(1));
    println!("=== StarBase Economy Harness ===\n");

    let config = match &args.config {
        Some(path) => match EconomyConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("config error: {e}");
                std::process::exit(2);
            }
        },
        None => EconomyConfig::default(),
    };
    let catalog = match config.load_catalog() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("catalog error: {e}");
            std::process::exit(2);
        }
    };

    let mut results = Vec::new();

    // 1. Catalog and config
    results.extend(validate_catalog(&catalog, &config));

    // 2. Upgradeable walk
    results.extend(validate_upgradeables(&catalog));

    // 3. Storage scenarios
    results.extend(validate_storage(&catalog));

    // 4. Ships and stations
    results.extend(validate_containers(&catalog, &config));

    // 5. Randomized economy sweep
    results.extend(validate_random_sweep(&catalog, &config, args.seed));

    // 6. Snapshot round trip
    results.extend(validate_snapshots(&catalog, &config));

    if args.verbose {
        dump_station(&catalog, &config);
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn dump_station(catalog: &InMemoryCatalog, config: &EconomyConfig) {
    let station = SpaceStation::create_new(
        catalog,
        0,
        "Sample",
        config.starting_level,
        config.station_starting_resources.clone(),
    );
    match station.map(|s| serde_json::to_string_pretty(&s.detailed_projection())) {
        Ok(Ok(json)) => println!("\n--- Sample station ---\n{json}"),
        Ok(Err(e)) => eprintln!("projection encode error: {e}"),
        Err(e) => eprintln!("sample station error: {e}"),
    }
}

// ── 1. Catalog ──────────────────────────────────────────────────────────

fn validate_catalog(catalog: &InMemoryCatalog, config: &EconomyConfig) -> Vec<TestResult> {
    println!("--- Catalog ---");
    let mut results = Vec::new();

    let missing: Vec<_> = ComponentKind::all()
        .iter()
        .filter(|&&c| catalog.max_level(c).is_none())
        .map(|c| c.name())
        .collect();
    results.push(TestResult::new(
        "catalog_covers_components",
        missing.is_empty(),
        if missing.is_empty() {
            format!("{} levels across {} components", catalog.len(), ComponentKind::all().len())
        } else {
            format!("no levels for {}", missing.join(", "))
        },
    ));

    let dead_ends: Vec<_> = catalog
        .components()
        .filter(|&c| catalog.max_level(c) == Some(1))
        .map(|c| c.name())
        .collect();
    results.push(TestResult::new(
        "catalog_upgradeable",
        dead_ends.is_empty(),
        if dead_ends.is_empty() {
            "every component has a level 2".to_string()
        } else {
            format!("single-level components: {}", dead_ends.join(", "))
        },
    ));

    let free_upgrades: Vec<_> = catalog
        .components()
        .flat_map(|c| {
            let max = catalog.max_level(c).unwrap_or(0);
            (2..=max).map(move |n| (c, n))
        })
        .filter(|&(c, n)| catalog.level(c, n).is_some_and(|l| l.costs.is_empty()))
        .map(|(c, n)| format!("{c} {n}"))
        .collect();
    results.push(TestResult::new(
        "catalog_upgrades_cost_something",
        free_upgrades.is_empty(),
        if free_upgrades.is_empty() {
            "every level above 1 has a price".to_string()
        } else {
            format!("free levels: {}", free_upgrades.join(", "))
        },
    ));

    let errors = validate_config(config, catalog);
    results.push(TestResult::new(
        "config_valid",
        errors.is_empty(),
        if errors.is_empty() {
            format!("starting level {}", config.starting_level)
        } else {
            format!("{:?}", errors)
        },
    ));

    results
}

// ── 2. Upgradeable ──────────────────────────────────────────────────────

fn validate_upgradeables(catalog: &InMemoryCatalog) -> Vec<TestResult> {
    println!("--- Upgradeable ---");
    let mut results = Vec::new();

    for component in catalog.components() {
        let name = format!("walk_{}", component.name().to_lowercase());
        let mut part = match Upgradeable::new(catalog, component, 1) {
            Ok(p) => p,
            Err(e) => {
                results.push(TestResult::new(&name, false, e.to_string()));
                continue;
            }
        };

        let mut problems = Vec::new();
        let mut last_effect = part.effect();
        while !part.is_fully_upgraded() {
            let level = part.level();
            let cost = part.upgrade_cost(catalog);
            if part.level() != level {
                problems.push(format!("cost query moved level {level}"));
            }
            if let Err(e) = part.upgrade(catalog) {
                problems.push(format!("upgrade from {level}: {e}"));
                break;
            }
            if let Ok(cost) = cost {
                if catalog.level(component, level + 1).map(|l| l.costs) != Some(cost) {
                    problems.push(format!("cost for {} does not match catalog", level + 1));
                }
            }
            if part.effect() <= last_effect {
                problems.push(format!("effect did not rise at {}", part.level()));
            }
            last_effect = part.effect();
        }
        if !matches!(
            part.upgrade_cost(catalog),
            Err(EconomyError::UpgradeNotAvailable { .. })
        ) {
            problems.push("max level still quotes a cost".to_string());
        }

        results.push(TestResult::new(
            &name,
            problems.is_empty(),
            if problems.is_empty() {
                format!("1 → {} (effect {})", part.level(), part.effect())
            } else {
                problems.join("; ")
            },
        ));
    }

    results
}

// ── 3. Storage ──────────────────────────────────────────────────────────

fn validate_storage(catalog: &InMemoryCatalog) -> Vec<TestResult> {
    println!("--- Storage ---");
    let mut results = Vec::new();

    let capacity = catalog
        .level(ComponentKind::ShipStorage, 1)
        .map(|l| l.effect)
        .unwrap_or(0);

    let mut over = ResourceMap::new();
    over.insert(ResourceKind::Plutonium, capacity);
    over.insert(ResourceKind::Crystal, 1);
    let rejected = matches!(
        ResourceStorage::new(catalog, ComponentKind::ShipStorage, 1, over),
        Err(EconomyError::ResourceCapacityExceeded { .. })
    );
    results.push(TestResult::new(
        "storage_rejects_overfull_construction",
        rejected,
        format!("capacity {capacity}, offered {}", capacity as u64 + 1),
    ));

    let mut initial = ResourceMap::new();
    initial.insert(ResourceKind::Crystal, 0);
    initial.insert(ResourceKind::Plutonium, 0);
    match ResourceStorage::new(catalog, ComponentKind::ShipStorage, 1, initial) {
        Ok(mut storage) => {
            let first = capacity * 3 / 5;
            let second = capacity / 2;
            let ok = storage.add_resource(ResourceKind::Crystal, first).is_ok();
            let overflow = matches!(
                storage.add_resource(ResourceKind::Crystal, second),
                Err(EconomyError::InsufficientStorageSpace { .. })
            );
            let kept = storage.amount(ResourceKind::Crystal) == first;
            results.push(TestResult::new(
                "storage_add_is_atomic",
                ok && overflow && kept,
                format!(
                    "+{first} ok={ok}, +{second} rejected={overflow}, held {}",
                    storage.amount(ResourceKind::Crystal)
                ),
            ));
        }
        Err(e) => results.push(TestResult::new("storage_add_is_atomic", false, e.to_string())),
    }

    results
}

// ── 4. Ships and stations ───────────────────────────────────────────────

fn validate_containers(catalog: &InMemoryCatalog, config: &EconomyConfig) -> Vec<TestResult> {
    println!("--- Ships & Stations ---");
    let mut results = Vec::new();

    for kind in [ShipKind::Miner, ShipKind::Scout] {
        let name = format!("ship_{:?}_parts", kind).to_lowercase();
        match SpaceShip::create_new(catalog, 1, "Probe", ShipColor::Red, kind, config.starting_level)
        {
            Ok(ship) => {
                let projection = ship.detailed_projection();
                let owned = kind
                    .parts()
                    .iter()
                    .all(|&p| ship.upgrade_cost(catalog, p).is_ok());
                let foreign = [ShipPart::Drill, ShipPart::Scanner]
                    .into_iter()
                    .filter(|&p| p != kind.tool())
                    .all(|p| {
                        matches!(
                            ship.upgrade_cost(catalog, p),
                            Err(EconomyError::UnknownPart { .. })
                        )
                    });
                results.push(TestResult::new(
                    &name,
                    owned && foreign && projection.parts.len() == 3,
                    format!(
                        "{} parts + storage {}, shield {}",
                        projection.parts.len(),
                        projection.storage.capacity,
                        projection.shield_energy
                    ),
                ));
            }
            Err(e) => results.push(TestResult::new(&name, false, e.to_string())),
        }
    }

    match SpaceStation::create_new(
        catalog,
        1,
        "Harness",
        config.starting_level,
        config.station_starting_resources.clone(),
    ) {
        Ok(mut station) => {
            let docks = station.hangar().docks();
            let mut docked = 0;
            for id in 0..docks as u64 + 1 {
                if station.hangar_mut().dock(id).is_ok() {
                    docked += 1;
                }
            }
            results.push(TestResult::new(
                "station_hangar_limit",
                docked == docks,
                format!("{docked} of {docks} docks filled, extra ship refused"),
            ));
        }
        Err(e) => results.push(TestResult::new("station_hangar_limit", false, e.to_string())),
    }

    results
}

// ── 5. Randomized sweep ─────────────────────────────────────────────────

fn validate_random_sweep(
    catalog: &InMemoryCatalog,
    config: &EconomyConfig,
    seed: u64,
) -> Vec<TestResult> {
    println!("--- Random Sweep (seed {seed}) ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(seed);

    let built = SpaceStation::create_new(
        catalog,
        1,
        "Sweep",
        config.starting_level,
        config.station_starting_resources.clone(),
    )
    .and_then(|station| {
        SpaceShip::create_new(
            catalog,
            2,
            "Sweeper",
            ShipColor::Blue,
            ShipKind::Miner,
            config.starting_level,
        )
        .map(|ship| (station, ship))
    });
    let (mut station, mut ship) = match built {
        Ok(pair) => pair,
        Err(e) => {
            results.push(TestResult::new("sweep_setup", false, e.to_string()));
            return results;
        }
    };
    if let Err(e) = station.hangar_mut().dock(ship.id()) {
        results.push(TestResult::new("sweep_setup", false, e.to_string()));
        return results;
    }

    let mut violations = 0;
    let mut upgrades = 0;
    let mut unexpected = Vec::new();
    for _ in 0..5000 {
        let kind = ResourceKind::all()[rng.gen_range(0..ResourceKind::all().len())];
        let outcome = match rng.gen_range(0..4) {
            0 => ship
                .storage_mut()
                .add_resource(kind, rng.gen_range(1..50))
                .map(|_| ()),
            1 => {
                let mut moves = ResourceMap::new();
                moves.insert(kind, ship.storage().amount(kind));
                move_resources_from_ship(&mut station, &mut ship, &moves).map(|_| ())
            }
            2 => {
                let parts = ShipKind::Miner.parts();
                let part = parts[rng.gen_range(0..parts.len())];
                upgrade_ship_part(catalog, &mut station, &mut ship, part).map(|_| upgrades += 1)
            }
            _ => {
                let part = StationPart::all()[rng.gen_range(0..StationPart::all().len())];
                upgrade_station_part(catalog, &mut station, part).map(|_| upgrades += 1)
            }
        };
        match outcome {
            Ok(())
            | Err(EconomyError::InsufficientStorageSpace { .. })
            | Err(EconomyError::InsufficientResources { .. })
            | Err(EconomyError::UpgradeNotAvailable { .. }) => {}
            Err(e) => unexpected.push(e.to_string()),
        }
        for storage in [ship.storage(), station.storage()] {
            if storage.used() > storage.capacity() {
                violations += 1;
            }
        }
    }

    results.push(TestResult::new(
        "sweep_capacity_invariant",
        violations == 0,
        format!("{violations} violations, {upgrades} paid upgrades"),
    ));
    results.push(TestResult::new(
        "sweep_expected_errors_only",
        unexpected.is_empty(),
        if unexpected.is_empty() {
            "only capacity, funds and max-level refusals".to_string()
        } else {
            unexpected.join("; ")
        },
    ));

    results
}

// ── 6. Snapshots ────────────────────────────────────────────────────────

fn validate_snapshots(catalog: &InMemoryCatalog, config: &EconomyConfig) -> Vec<TestResult> {
    println!("--- Snapshots ---");
    let mut results = Vec::new();

    let built = SpaceStation::create_new(
        catalog,
        3,
        "Saved",
        config.starting_level,
        config.station_starting_resources.clone(),
    )
    .and_then(|station| {
        SpaceShip::create_new(
            catalog,
            4,
            "Stored",
            ShipColor::Purple,
            ShipKind::Scout,
            config.starting_level,
        )
        .map(|ship| (station, ship))
    });
    let (mut station, ship) = match built {
        Ok(pair) => pair,
        Err(e) => {
            results.push(TestResult::new("snapshot_roundtrip", false, e.to_string()));
            return results;
        }
    };
    if let Err(e) = station.hangar_mut().dock(ship.id()) {
        results.push(TestResult::new("snapshot_roundtrip", false, e.to_string()));
        return results;
    }

    let mut buffer = Vec::new();
    let outcome = save_snapshot(&mut buffer, &station, std::slice::from_ref(&ship))
        .and_then(|_| load_snapshot(&buffer[..], catalog));
    match outcome {
        Ok(loaded) => {
            let same = loaded.station.detailed_projection() == station.detailed_projection()
                && loaded.ships.len() == 1
                && loaded.ships[0].detailed_projection() == ship.detailed_projection();
            results.push(TestResult::new(
                "snapshot_roundtrip",
                same,
                format!("{} bytes", buffer.len()),
            ));
        }
        Err(e) => results.push(TestResult::new("snapshot_roundtrip", false, e.to_string())),
    }

    results
}
