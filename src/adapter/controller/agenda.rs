use agenda::adapter::gateway::config::{load_config_from_file, AgendaConfig};
use agenda::adapter::gateway::schedule_repository::ScheduleRepository;
use agenda::adapter::gateway::unit_repository::UnitRepository;
use agenda::adapter::presenter::text::{
    calendar_or_message, hours_or_message, render_months_dropdown,
};
use agenda::application::list_available_slots::list_available_slots;
use agenda::application::list_selectable_months::list_selectable_months;
use agenda::application::render_month_grid::render_month_grid;
use std::env;
use std::path::Path;
use std::process;

const USAGE: &str = "usage: agenda <config.yaml> months | calendar <month> | hours <unit_id> <month> <day>";

// "7" and "07" are both accepted
fn parse_number(s: &str) -> Option<u32> {
    s.trim().parse().ok()
}

#[test]
fn test_parse_number_with_and_without_padding() {
    assert_eq!(parse_number("7"), Some(7));
    assert_eq!(parse_number("07"), Some(7));
    assert_eq!(parse_number("julho"), None);
}

fn execute(config: &AgendaConfig, tokens: &[String]) -> Option<String> {
    let clock = config.clock();

    match tokens {
        [command] if command == "months" => {
            let options = list_selectable_months(clock.as_ref());
            Some(render_months_dropdown(&options))
        }
        [command, month] if command == "calendar" => {
            let month = parse_number(month)?;
            Some(calendar_or_message(render_month_grid(clock.as_ref(), month)))
        }
        [command, unit_id, month, day] if command == "hours" => {
            let month = parse_number(month)?;
            let day = parse_number(day)?;
            let unit_repository = UnitRepository::new(config.get_units_dir().to_path_buf());
            let schedule_repository =
                ScheduleRepository::new(config.get_schedules_file().to_path_buf());

            let result = list_available_slots(
                &unit_repository,
                &schedule_repository,
                clock.as_ref(),
                unit_id,
                month,
                day,
            );
            Some(hours_or_message(result))
        }
        _ => None,
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("{}", USAGE);
        process::exit(2);
    }

    let config = match load_config_from_file(Path::new(&args[1])) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    match execute(&config, &args[2..]) {
        Some(output) => println!("{}", output),
        None => {
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    }
}
