//! AgentOffice Headless Simulation Harness
//!
//! Sweeps layout generation, pathfinding and raster helpers, then drives a
//! seeded scheduler through a scripted team session. Runs entirely
//! in-process against an off-screen surface.
//!
//! Usage:
//!   cargo run -p agentoffice-simtest
//!   cargo run -p agentoffice-simtest -- --verbose
//!   cargo run -p agentoffice-simtest -- --config office.json
//!
//! Set `RUST_LOG=debug` to see the scheduler's own logging.

use agentoffice_core::effects::{EffectKind, EffectsLayer};
use agentoffice_core::placeholder::placeholder_book;
use agentoffice_core::prelude::*;
use agentoffice_core::systems::{is_walking, state_of};
use agentoffice_logic::animation::{persona_label, CharacterState};
use agentoffice_logic::geometry::{validate_layout, Severity};
use agentoffice_logic::layout::{generate, room_size};
use agentoffice_logic::palette::PaletteTable;
use agentoffice_logic::pathfinding::{find_path, reachable_cells, Cell, WalkGrid};
use agentoffice_logic::raster::{colorize, flip_horizontal, remap_palette, Color, PixelGrid, Tint};
use agentoffice_logic::surface::Surface;
use std::collections::HashSet;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load config: {}", e);
            std::process::exit(2);
        }
    };
    println!("=== AgentOffice Simulation Harness ===\n");
    log::info!("Harness seed {:?}", config.seed);
    if verbose {
        println!(
            "config: {}\n",
            serde_json::to_string(&config).unwrap_or_default()
        );
    }

    let mut results = Vec::new();

    // 1. Layout sweep over every supported headcount
    results.extend(validate_layouts(verbose));

    // 2. Pathfinding on a synthetic grid
    results.extend(validate_pathfinding(verbose));

    // 3. Raster primitives
    results.extend(validate_raster(verbose));

    // 4. Outfit palettes
    results.extend(validate_palettes(verbose));

    // 5. Scripted team session
    results.extend(validate_session(config, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
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

fn load_config(args: &[String]) -> Result<OfficeConfig, OfficeError> {
    match args.iter().position(|a| a == "--config") {
        Some(i) => {
            let path = args
                .get(i + 1)
                .ok_or_else(|| OfficeError::InvalidConfig("--config needs a path".into()))?;
            let file = std::fs::File::open(path)?;
            let mut config = OfficeConfig::from_reader(file)?;
            config.seed.get_or_insert(7);
            Ok(config)
        }
        None => Ok(OfficeConfig::seeded(7)),
    }
}

// ── 1. Layouts ──────────────────────────────────────────────────────────

fn validate_layouts(verbose: bool) -> Vec<TestResult> {
    println!("--- Layouts ---");
    let mut results = Vec::new();

    for n in 2..=8 {
        let layout = generate(n);
        let issues = validate_layout(&layout);
        let errors: Vec<_> = issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .collect();
        let warnings = issues.len() - errors.len();
        if verbose {
            println!(
                "  n={}: {}x{} room, {} desks, {} decorations, {} warning(s)",
                n,
                layout.cols,
                layout.rows,
                layout.desks.len(),
                layout.decorations.len(),
                warnings
            );
        }
        results.push(TestResult {
            name: format!("layout_valid_{}", n),
            passed: errors.is_empty(),
            detail: if errors.is_empty() {
                format!("{} desks, {} warning(s)", layout.desks.len(), warnings)
            } else {
                errors
                    .iter()
                    .map(|e| format!("[{}] {}", e.category, e.message))
                    .collect::<Vec<_>>()
                    .join("; ")
            },
        });

        results.push(TestResult {
            name: format!("layout_capacity_{}", n),
            passed: layout.member_capacity() == n,
            detail: format!("{} desks for {} members", layout.member_capacity(), n),
        });

        let approach = layout.coffee_station.approach();
        let stranded: Vec<usize> = layout
            .desks
            .iter()
            .enumerate()
            .filter(|(_, d)| {
                d.chair != approach && find_path(&layout.grid, d.chair, approach).is_empty()
            })
            .map(|(i, _)| i)
            .collect();
        results.push(TestResult {
            name: format!("layout_coffee_reachable_{}", n),
            passed: stranded.is_empty(),
            detail: if stranded.is_empty() {
                "every chair reaches the coffee machine".into()
            } else {
                format!("desks {:?} cannot reach coffee", stranded)
            },
        });
    }

    // Headcounts outside 2..=8 are clamped
    let small = generate(0);
    let large = generate(20);
    results.push(TestResult {
        name: "layout_headcount_clamped".into(),
        passed: small.desks.len() == 2 && large.desks.len() == 8,
        detail: format!("0 → {} desks, 20 → {} desks", small.desks.len(), large.desks.len()),
    });

    // Room grows with the team
    let (c2, r2) = room_size(2);
    let (c8, r8) = room_size(8);
    results.push(TestResult {
        name: "layout_room_grows".into(),
        passed: c8 * r8 > c2 * r2 && generate(8).is_double_row() && !generate(3).is_double_row(),
        detail: format!("2 → {}x{}, 8 → {}x{}", c2, r2, c8, r8),
    });

    results
}

// ── 2. Pathfinding ──────────────────────────────────────────────────────

fn validate_pathfinding(_verbose: bool) -> Vec<TestResult> {
    println!("--- Pathfinding ---");
    let mut results = Vec::new();

    // 7x5 room with a wall down column 3, open at the bottom row
    let mut grid = WalkGrid::new(7, 5);
    grid.block_area(3, 0, 1, 4);

    let same = find_path(&grid, Cell::new(1, 1), Cell::new(1, 1));
    results.push(TestResult {
        name: "pathfind_same_cell".into(),
        passed: same.is_empty(),
        detail: "start == goal → empty path".into(),
    });

    let adj = find_path(&grid, Cell::new(1, 1), Cell::new(2, 1));
    results.push(TestResult {
        name: "pathfind_adjacent".into(),
        passed: adj == vec![Cell::new(2, 1)],
        detail: format!("{} step(s)", adj.len()),
    });

    // Around the wall: down 4, across 4, up 4
    let around = find_path(&grid, Cell::new(1, 0), Cell::new(5, 0));
    let contiguous = around
        .windows(2)
        .all(|w| (w[0].col - w[1].col).abs() + (w[0].row - w[1].row).abs() == 1);
    results.push(TestResult {
        name: "pathfind_detour".into(),
        passed: around.len() == 12
            && contiguous
            && around.last() == Some(&Cell::new(5, 0))
            && around.iter().all(|c| grid.is_walkable(*c)),
        detail: format!("{} steps around the wall", around.len()),
    });

    let mut sealed = grid.clone();
    sealed.set(Cell::new(3, 4), false);
    let blocked = find_path(&sealed, Cell::new(1, 0), Cell::new(5, 0));
    results.push(TestResult {
        name: "pathfind_unreachable".into(),
        passed: blocked.is_empty(),
        detail: "sealed wall → empty path".into(),
    });

    let into_wall = find_path(&grid, Cell::new(1, 1), Cell::new(3, 1));
    let out_of_bounds = find_path(&grid, Cell::new(1, 1), Cell::new(9, 9));
    results.push(TestResult {
        name: "pathfind_bad_goal".into(),
        passed: into_wall.is_empty() && out_of_bounds.is_empty(),
        detail: "blocked or off-grid goal → empty path".into(),
    });

    let left: HashSet<Cell> = reachable_cells(&sealed, Cell::new(0, 0)).into_iter().collect();
    results.push(TestResult {
        name: "pathfind_flood_fill".into(),
        passed: left.len() == 15 && !left.contains(&Cell::new(5, 0)),
        detail: format!("{} cells reachable left of the wall", left.len()),
    });

    results
}

// ── 3. Raster ───────────────────────────────────────────────────────────

fn validate_raster(_verbose: bool) -> Vec<TestResult> {
    println!("--- Raster ---");
    let mut results = Vec::new();

    let red = Color::rgb(200, 40, 40);
    let blue = Color::rgb(40, 40, 200);
    let grey = Color::rgb(128, 128, 128);
    let sprite = PixelGrid::from_rows(&[
        vec![Some(red), None, Some(blue)],
        vec![Some(grey), Some(red), None],
    ]);

    let flipped = flip_horizontal(&sprite);
    results.push(TestResult {
        name: "raster_flip".into(),
        passed: flipped.get(0, 0) == Some(blue)
            && flipped.get(2, 0) == Some(red)
            && flipped.get(0, 1).is_none()
            && flip_horizontal(&flipped) == sprite,
        detail: "columns mirrored, double flip is identity".into(),
    });

    let remapped = remap_palette(&sprite, &[red], &[blue]);
    results.push(TestResult {
        name: "raster_remap".into(),
        passed: remapped.get(0, 0) == Some(blue)
            && remapped.get(1, 1) == Some(blue)
            && remapped.get(0, 1) == Some(grey)
            && remapped.get(1, 0).is_none(),
        detail: "listed colors swapped, others and transparency kept".into(),
    });

    let tinted = colorize(&sprite, Tint::new(120.0, 60.0, 1.0, 0.0));
    let greenish = tinted
        .get(0, 1)
        .map(|c| c.g > c.r && c.g > c.b)
        .unwrap_or(false);
    results.push(TestResult {
        name: "raster_colorize".into(),
        passed: greenish && tinted.get(1, 0).is_none(),
        detail: format!("grey at hue 120 → {:?}", tinted.get(0, 1).map(Color::to_hex)),
    });

    results
}

// ── 4. Palettes ─────────────────────────────────────────────────────────

fn validate_palettes(_verbose: bool) -> Vec<TestResult> {
    println!("--- Palettes ---");
    let mut results = Vec::new();

    let table = PaletteTable::standard();
    let outfits: Vec<_> = (0..8).map(|i| table.get(i)).collect();
    let distinct: HashSet<_> = outfits.iter().map(|o| (o.hair, o.shirt, o.pants)).collect();
    results.push(TestResult {
        name: "palette_distinct_outfits".into(),
        passed: distinct.len() == outfits.len(),
        detail: format!("{} distinct outfits for 8 seats", distinct.len()),
    });

    let n = table.curated_len();
    let skin_kept = (n..n + 4).all(|i| table.get(i).skin == table.get(i % n).skin);
    results.push(TestResult {
        name: "palette_overflow_keeps_skin".into(),
        passed: skin_kept,
        detail: "overflow seats keep the skin of the outfit they rotate".into(),
    });

    let labels = [
        ("agent-code-reviewer", "Code Rev.."),
        ("agent-planner", "Planner"),
        ("writer", "Writer"),
    ];
    let bad: Vec<_> = labels
        .iter()
        .filter(|(name, want)| persona_label(name) != *want)
        .collect();
    results.push(TestResult {
        name: "persona_labels".into(),
        passed: bad.is_empty(),
        detail: if bad.is_empty() {
            "labels trimmed and title-cased".into()
        } else {
            format!("mismatched: {:?}", bad)
        },
    });

    results
}

// ── 5. Session ──────────────────────────────────────────────────────────

const TEAM: [&str; 6] = [
    "agent-planner",
    "agent-coder",
    "agent-code-reviewer",
    "agent-tester",
    "agent-writer",
    "agent-ops",
];

fn state(s: &Scheduler, name: &str) -> Option<CharacterState> {
    let e = s.office()?.character(name)?;
    state_of(s.world(), e)
}

fn validate_session(config: OfficeConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Session ---");
    let mut results = Vec::new();

    let mut s = Scheduler::new(config, placeholder_book());
    s.start(Surface::new(960, 768));

    // Events arrive from another thread, the way a transport would feed them
    let tx = s.event_sender();
    let feeder = std::thread::spawn(move || {
        let roster = OfficeEvent::Roster {
            members: TEAM.iter().map(|n| Member::new(*n)).collect(),
            statuses: vec![StatusEvent::new("agent-writer", "reading")],
        };
        let _ = tx.send(roster);
        let _ = tx.send(OfficeEvent::Status(StatusEvent::new("agent-coder", "typing")));
    });
    let _ = feeder.join();
    let applied = s.pump_events();

    let headcount = s.office().map(|o| o.headcount()).unwrap_or(0);
    results.push(TestResult {
        name: "session_roster".into(),
        passed: applied == 2 && headcount == TEAM.len(),
        detail: format!("{} events applied, {} characters seated", applied, headcount),
    });
    results.push(TestResult {
        name: "session_initial_status".into(),
        passed: state(&s, "agent-writer") == Some(CharacterState::Reading)
            && state(&s, "agent-coder") == Some(CharacterState::Working),
        detail: format!(
            "writer {:?}, coder {:?}",
            state(&s, "agent-writer"),
            state(&s, "agent-coder")
        ),
    });

    // Coffee run
    s.dispatch(OfficeEvent::Status(StatusEvent::new("agent-tester", "coffee")));
    let walking = state(&s, "agent-tester") == Some(CharacterState::Walking);
    s.advance(20.0);
    let tester = s.office().and_then(|o| o.character("agent-tester"));
    let arrived = tester
        .map(|e| !is_walking(s.world(), e))
        .unwrap_or(false);
    let at_machine = match (tester, s.office()) {
        (Some(e), Some(office)) => s
            .world()
            .get::<&Body>(e)
            .map(|b| b.tile == office.layout.coffee_station.approach())
            .unwrap_or(false),
        _ => false,
    };
    results.push(TestResult {
        name: "session_coffee_run".into(),
        passed: walking
            && arrived
            && at_machine
            && state(&s, "agent-tester") == Some(CharacterState::Coffee),
        detail: format!("tester ends {:?} at the machine", state(&s, "agent-tester")),
    });

    // Interactions
    s.dispatch(OfficeEvent::Message {
        from_agent: "agent-planner".into(),
        to_agent: "agent-coder".into(),
        summary: "plan ready".into(),
    });
    s.dispatch(OfficeEvent::TaskAssigned {
        agent: "agent-code-reviewer".into(),
        task: "review PR".into(),
    });
    s.dispatch(OfficeEvent::Completed {
        agent: "agent-coder".into(),
    });
    let celebrating = state(&s, "agent-coder") == Some(CharacterState::Celebrate);
    s.advance(2.0);
    results.push(TestResult {
        name: "session_celebration".into(),
        passed: celebrating && state(&s, "agent-coder") == Some(CharacterState::Working),
        detail: "completed → celebrate → back to working".into(),
    });

    // Frame loop at 60 Hz, with one long stall
    let mut now = 0.0;
    let mut stepped = 0;
    for i in 0..120 {
        now += if i == 60 { 2_000.0 } else { 1000.0 / 60.0 };
        stepped += s.frame(now);
    }
    let max = s.config().max_catch_up_steps as usize;
    results.push(TestResult {
        name: "session_frame_loop".into(),
        passed: stepped > 0 && stepped <= 120 / 2 + max + 2,
        detail: format!("{} fixed steps over 120 host frames", stepped),
    });

    let drawn = s
        .surface()
        .map(|surface| surface.pixels().iter().filter(|c| c.a > 0).count())
        .unwrap_or(0);
    results.push(TestResult {
        name: "session_render".into(),
        passed: drawn > 0,
        detail: format!("{} pixels drawn", drawn),
    });

    let reviewer = s.office().and_then(|o| o.character("agent-code-reviewer"));
    let card = reviewer
        .and_then(|e| s.world().get::<&Body>(e).ok().map(|b| b.pos))
        .and_then(|pos| s.hit_test(pos.x + 24.0, pos.y + 36.0));
    if verbose {
        if let Some(card) = &card {
            println!(
                "  card: {} ({}) {} task={:?}",
                card.name, card.label, card.status_line, card.task
            );
        }
    }
    results.push(TestResult {
        name: "session_hit_test".into(),
        passed: card
            .as_ref()
            .map(|c| c.name == "agent-code-reviewer" && c.task.as_deref() == Some("review PR"))
            .unwrap_or(false),
        detail: "clicking the reviewer shows their card".into(),
    });

    // Shutdown pulses the whole office
    s.dispatch(OfficeEvent::Shutdown);
    s.advance(1.0);
    let flashing = s
        .office()
        .and_then(|o| s.world().get::<&EffectsLayer>(o.effects_entity()).ok())
        .map(|layer| {
            layer
                .effects()
                .iter()
                .any(|e| matches!(e.kind, EffectKind::Flash))
        })
        .unwrap_or(false);
    results.push(TestResult {
        name: "session_shutdown_flash".into(),
        passed: flashing,
        detail: "shutdown starts the office flash".into(),
    });

    s.teardown();
    results.push(TestResult {
        name: "session_teardown".into(),
        passed: !s.is_running() && s.office().is_none() && s.surface().is_none(),
        detail: "scheduler released scene and surface".into(),
    });

    results
}
