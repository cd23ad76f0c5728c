//! CLI tool to run lineup detection on a saved screenshot.
//! Usage: cargo run --features cli --bin scan_frame -- <frame.png> <roster_dir> [output_dir]

use std::path::PathBuf;

use hud_data::Roster;
use hud_vision::{crop_slot, slot_region, LineupDetector, SLOT_COUNT};

fn main() {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <frame.png> <roster_dir> [output_dir]", args[0]);
        std::process::exit(1);
    }

    let frame_path = PathBuf::from(&args[1]);
    let roster_dir = PathBuf::from(&args[2]);
    let output_dir = args.get(3).map(PathBuf::from);

    println!("Loading frame: {}", frame_path.display());
    let frame = image::open(&frame_path)
        .expect("Failed to open frame")
        .to_rgb8();
    println!("Frame size: {}x{}", frame.width(), frame.height());

    let roster = Roster::load(&roster_dir).expect("Failed to load roster");
    println!("Roster: {} reference icons", roster.len());

    if let Some(ref dir) = output_dir {
        let _ = std::fs::create_dir_all(dir);
        for slot in 1..=SLOT_COUNT {
            match crop_slot(&frame, slot_region(slot)) {
                Ok(crop) => {
                    let _ = crop.save(dir.join(format!("slot_{:02}.png", slot)));
                }
                Err(e) => eprintln!("slot {}: {}", slot, e),
            }
        }
        println!("Slot crops saved to: {}", dir.display());
    }

    println!("\n=== Lineup ===");
    let detector = LineupDetector::new(&roster).expect("Empty roster");
    let lineup = detector.detect(&frame).expect("Detection failed");

    for m in &lineup.slots {
        println!("  Slot {:2}: {} (score {:.3})", m.slot, m.name, m.score);
    }

    println!(
        "\n{}",
        serde_json::to_string_pretty(&lineup).expect("Failed to serialize lineup")
    );
}
