//! RehabOS CLI — loads the signed-in user's dashboard and prints a text
//! summary. The graphical shell consumes the same library surface.

use std::process::ExitCode;

use rehabos::config;
use rehabos::services::dashboard;
use rehabos::store::postgrest::PostgrestStore;
use rehabos::store::session::{FileSession, SessionGuard};
use rehabos::CoreError;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_auth() => {
            eprintln!("{}", e.user_message());
            eprintln!("Sign in first, then re-run.");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), CoreError> {
    let config = config::load_config()?;

    let guard = FileSession;
    let (who, session) = guard.resolve()?;
    log::info!("signed in as {}", who.email);

    let store = PostgrestStore::new(&config, session.access_token)?;
    let data = dashboard::load_dashboard(&store, &who).await?;

    println!("Welcome back, {}!", data.display_name);
    println!();
    println!(
        "Range of motion: {:.0} deg flexion / {:.0} deg extension  [{:>3.0}%]",
        data.stats.rom_flexion,
        data.stats.rom_extension,
        data.bars.rom_fraction * 100.0
    );
    println!(
        "Strength:        {:.0}% of unaffected leg",
        data.bars.strength_pct
    );
    println!(
        "Pain level:      {} / 10  [{:>3.0}%]",
        data.stats.pain_level,
        data.bars.pain_fraction * 100.0
    );
    println!();

    match &data.goal {
        Some(goal) => println!(
            "Goal: {} (target {})",
            goal.goal_description, goal.target_date
        ),
        None => println!("Goal: no goal set yet."),
    }

    println!();
    if data.events.is_empty() {
        println!("Upcoming: no events added yet.");
    } else {
        println!("Upcoming:");
        for event in data.events.iter().take(4) {
            match &event.description {
                Some(desc) => {
                    println!("  {}  {} - {}", event.event_date, event.event_name, desc)
                }
                None => println!("  {}  {}", event.event_date, event.event_name),
            }
        }
    }
    Ok(())
}
