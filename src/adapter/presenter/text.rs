use crate::entity::error::AgendaResult;
use crate::entity::month::{DayCell, MonthGrid, MonthOption};
use crate::entity::time_slot::TimeSlot;

#[cfg(test)]
use crate::entity::error::AgendaError;
#[cfg(test)]
use crate::entity::month::{render_month_grid, render_month_options};
#[cfg(test)]
use chrono::NaiveDate;

pub const CALENDAR_FAILURE_MESSAGE: &str =
    "Não foi possível gerar o calendário para o mês informado";
pub const HOURS_FAILURE_MESSAGE: &str = "Não foi possível recuperar os horários disponíveis";

const WEEKDAY_HEADER: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

pub fn render_months_dropdown(options: &[MonthOption]) -> String {
    options
        .iter()
        .map(|option| match option.get_value() {
            Some(month) => format!("{}\t{}", month, option.get_label()),
            None => format!("-\t{}", option.get_label()),
        })
        .collect::<Vec<String>>()
        .join("\n")
}

fn render_cell(cell: &DayCell) -> String {
    match cell {
        DayCell::Blank => format!("{:>4}", ""),
        DayCell::Day {
            day,
            is_selectable: true,
            ..
        } => format!("{:>4}", day),
        // disabled days are shown in parentheses
        DayCell::Day { day, .. } => format!("{:>4}", format!("({})", day)),
    }
}

pub fn render_calendar(grid: &MonthGrid) -> String {
    let mut lines = vec![];

    let header: String = WEEKDAY_HEADER
        .iter()
        .map(|name| format!("{:>4}", name))
        .collect();
    lines.push(header);

    for week in grid.get_weeks() {
        let row: String = week.iter().map(render_cell).collect();
        lines.push(row.trim_end().to_string());
    }

    lines.join("\n")
}

pub fn render_hours(slots: &[TimeSlot]) -> String {
    slots
        .iter()
        .map(|slot| slot.to_string())
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn calendar_or_message(result: AgendaResult<MonthGrid>) -> String {
    match result {
        Ok(grid) => render_calendar(&grid),
        Err(e) => {
            log::error!("[ERROR] {}", e);
            CALENDAR_FAILURE_MESSAGE.to_string()
        }
    }
}

pub fn hours_or_message(result: AgendaResult<Vec<TimeSlot>>) -> String {
    match result {
        Ok(slots) => render_hours(&slots),
        Err(e) => {
            log::error!("[ERROR] {}", e);
            HOURS_FAILURE_MESSAGE.to_string()
        }
    }
}

#[cfg(test)]
fn june_15() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 6, 15)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

#[test]
fn test_render_months_dropdown() {
    let options = render_month_options(&june_15());
    let actual = render_months_dropdown(&options[..3]);
    let expected = "-\t--- Escolha ---\n6\tJunho / 2023\n7\tJulho / 2023";
    assert_eq!(actual, expected);
}

#[test]
fn test_render_calendar_july_2023() {
    let grid = render_month_grid(&june_15(), 7).unwrap();
    let actual = render_calendar(&grid);
    let lines: Vec<&str> = actual.lines().collect();

    assert_eq!(lines[0], " Dom Seg Ter Qua Qui Sex Sáb");
    // 2023-07-01 is a Saturday
    assert_eq!(lines[1], "                         (1)");
    assert_eq!(lines[2], " (2)   3   4   5   6   7 (8)");
    assert_eq!(lines[6], "(30)  31");
    assert_eq!(lines.len(), 7);
}

#[test]
fn test_render_calendar_current_month_disables_past_days() {
    let grid = render_month_grid(&june_15(), 6).unwrap();
    let actual = render_calendar(&grid);
    let lines: Vec<&str> = actual.lines().collect();

    // 2023-06-11 Sunday .. 2023-06-17 Saturday
    assert_eq!(lines[3], "(11)(12)(13)(14)  15  16(17)");
}

#[test]
fn test_render_hours() {
    let slots: Vec<TimeSlot> = ["08:00", "08:30", "09:00"]
        .iter()
        .map(|l| TimeSlot::parse(l).unwrap())
        .collect();
    assert_eq!(render_hours(&slots), "08:00 08:30 09:00");
    assert_eq!(render_hours(&[]), "");
}

#[test]
fn test_calendar_or_message_on_failure() {
    let actual = calendar_or_message(Err(AgendaError::InvalidMonth(5)));
    assert_eq!(actual, CALENDAR_FAILURE_MESSAGE);
}

#[test]
fn test_hours_or_message_on_failure() {
    let actual = hours_or_message(Err(AgendaError::UnitNotFound("9".to_string())));
    assert_eq!(actual, HOURS_FAILURE_MESSAGE);

    let actual = hours_or_message(Ok(vec![TimeSlot::from_hm(8, 30).unwrap()]));
    assert_eq!(actual, "08:30");
}
