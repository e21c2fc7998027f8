pub mod interface;
pub mod list_available_slots;
pub mod list_selectable_months;
pub mod render_month_grid;
