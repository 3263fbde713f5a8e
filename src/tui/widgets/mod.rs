pub mod calendar_grid;
pub mod color;
pub mod confirm_delete;
pub mod day_drawer;
pub mod editor;
pub mod form;
pub mod help;
pub mod status_bar;
pub mod tabs;
pub mod upcoming;
